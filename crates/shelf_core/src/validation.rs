//! Field validation.
//!
//! Primitive validators check one property of a string. A
//! [`CompositeValidator`] runs an ordered list of validators and reports
//! either the first failure ([`CompositeValidator::validate`]) or every
//! result ([`CompositeValidator::validate_all`]). [`FormValidation`] applies
//! one composite per form field and renders the combined message.

use chrono::NaiveDate;
use thiserror::Error;

pub const MIN_CREDENTIAL_LENGTH: usize = 6;
pub const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please enter {field}.")]
    Empty { field: String },
    #[error("{field} must be at least {min} characters.")]
    TooShort { field: String, min: usize },
    #[error("The email address is not valid.")]
    InvalidEmail,
    #[error("Password and confirmation password do not match.")]
    PasswordMismatch,
    #[error("Price must be a number.")]
    NotANumber,
    #[error("Purchase date must be a date (YYYY-MM-DD).")]
    NotADate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationResult {
    Valid,
    Invalid(ValidationError),
}

impl ValidationResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, ValidationResult::Valid)
    }

    pub fn error(&self) -> Option<&ValidationError> {
        match self {
            ValidationResult::Valid => None,
            ValidationResult::Invalid(err) => Some(err),
        }
    }
}

pub trait Validator {
    fn validate(&self, value: &str) -> ValidationResult;
}

impl<F> Validator for F
where
    F: Fn(&str) -> ValidationResult,
{
    fn validate(&self, value: &str) -> ValidationResult {
        self(value)
    }
}

/// Rejects the empty string.
#[derive(Debug, Clone)]
pub struct NonEmpty {
    field: String,
}

impl NonEmpty {
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
        }
    }
}

impl Validator for NonEmpty {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.is_empty() {
            ValidationResult::Invalid(ValidationError::Empty {
                field: self.field.clone(),
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Rejects values shorter than `min` characters.
#[derive(Debug, Clone)]
pub struct MinLength {
    field: String,
    min: usize,
}

impl MinLength {
    pub fn new(field: impl Into<String>, min: usize) -> Self {
        Self {
            field: field.into(),
            min,
        }
    }
}

impl Validator for MinLength {
    fn validate(&self, value: &str) -> ValidationResult {
        if value.chars().count() < self.min {
            ValidationResult::Invalid(ValidationError::TooShort {
                field: self.field.clone(),
                min: self.min,
            })
        } else {
            ValidationResult::Valid
        }
    }
}

/// Full match of `[A-Za-z0-9._+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,4}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailFormat;

impl Validator for EmailFormat {
    fn validate(&self, value: &str) -> ValidationResult {
        if is_email(value) {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::InvalidEmail)
        }
    }
}

fn is_email(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '+' | '-'));
    if !local_ok {
        return false;
    }
    // The top-level label is letters only, so it always follows the last dot.
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };
    !host.is_empty()
        && host
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'))
        && (2..=4).contains(&tld.len())
        && tld.chars().all(|c| c.is_ascii_alphabetic())
}

/// Requires the value to equal a reference captured at construction.
#[derive(Debug, Clone)]
pub struct MatchesPassword {
    password: String,
}

impl MatchesPassword {
    pub fn new(password: impl Into<String>) -> Self {
        Self {
            password: password.into(),
        }
    }
}

impl Validator for MatchesPassword {
    fn validate(&self, value: &str) -> ValidationResult {
        if self.password == value {
            ValidationResult::Valid
        } else {
            ValidationResult::Invalid(ValidationError::PasswordMismatch)
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Integer;

impl Validator for Integer {
    fn validate(&self, value: &str) -> ValidationResult {
        match value.parse::<i64>() {
            Ok(_) => ValidationResult::Valid,
            Err(_) => ValidationResult::Invalid(ValidationError::NotANumber),
        }
    }
}

/// Accepts `YYYY-MM-DD` calendar dates.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalendarDate;

impl Validator for CalendarDate {
    fn validate(&self, value: &str) -> ValidationResult {
        match NaiveDate::parse_from_str(value, DATE_FORMAT) {
            Ok(_) => ValidationResult::Valid,
            Err(_) => ValidationResult::Invalid(ValidationError::NotADate),
        }
    }
}

/// Ordered list of validators applied to one value.
///
/// Earlier validators shadow later ones in [`validate`](Self::validate):
/// when several would fail, only the first failure is returned.
#[derive(Default)]
pub struct CompositeValidator {
    validators: Vec<Box<dyn Validator>>,
}

impl CompositeValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, validator: impl Validator + 'static) -> Self {
        self.validators.push(Box::new(validator));
        self
    }

    pub fn len(&self) -> usize {
        self.validators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }

    pub fn validate_all(&self, value: &str) -> Vec<ValidationResult> {
        self.validators
            .iter()
            .map(|validator| validator.validate(value))
            .collect()
    }

    pub fn email() -> Self {
        Self::new()
            .with(NonEmpty::new("email address"))
            .with(MinLength::new("email address", MIN_CREDENTIAL_LENGTH))
            .with(EmailFormat)
    }

    pub fn password() -> Self {
        Self::new()
            .with(NonEmpty::new("password"))
            .with(MinLength::new("password", MIN_CREDENTIAL_LENGTH))
    }

    /// `password` is captured now; later edits to the password field do not
    /// affect this validator.
    pub fn confirm_password(password: impl Into<String>) -> Self {
        Self::new()
            .with(NonEmpty::new("confirmation password"))
            .with(MinLength::new("confirmation password", MIN_CREDENTIAL_LENGTH))
            .with(MatchesPassword::new(password))
    }

    pub fn book_name() -> Self {
        Self::new().with(NonEmpty::new("book name"))
    }

    pub fn book_price() -> Self {
        Self::new().with(NonEmpty::new("price")).with(Integer)
    }

    pub fn book_purchase_date() -> Self {
        Self::new()
            .with(NonEmpty::new("purchase date"))
            .with(CalendarDate)
    }
}

impl Validator for CompositeValidator {
    fn validate(&self, value: &str) -> ValidationResult {
        self.validators
            .iter()
            .map(|validator| validator.validate(value))
            .find(|result| !result.is_valid())
            .unwrap_or(ValidationResult::Valid)
    }
}

impl std::fmt::Debug for CompositeValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CompositeValidator")
            .field("validators", &self.validators.len())
            .finish()
    }
}

/// Screen-level check over a fixed, ordered list of fields.
#[derive(Debug, Default)]
pub struct FormValidation {
    fields: Vec<(CompositeValidator, String)>,
}

impl FormValidation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn field(mut self, validator: CompositeValidator, value: impl Into<String>) -> Self {
        self.fields.push((validator, value.into()));
        self
    }

    /// One result per field, in field order.
    pub fn results(&self) -> Vec<ValidationResult> {
        self.fields
            .iter()
            .map(|(validator, value)| validator.validate(value))
            .collect()
    }

    pub fn is_valid(&self) -> bool {
        self.fields
            .iter()
            .all(|(validator, value)| validator.validate(value).is_valid())
    }

    pub fn errors(&self) -> Vec<ValidationError> {
        self.results()
            .into_iter()
            .filter_map(|result| match result {
                ValidationResult::Valid => None,
                ValidationResult::Invalid(err) => Some(err),
            })
            .collect()
    }

    /// Every failing field's message, one per line; `None` when all pass.
    pub fn message(&self) -> Option<String> {
        let errors = self.errors();
        if errors.is_empty() {
            return None;
        }
        Some(
            errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("\n"),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_pattern_edges() {
        assert!(is_email("first.last+tag@mail.example.org"));
        assert!(is_email("A@B.COM"));
        assert!(!is_email("a@b.c"));
        assert!(!is_email("a@b.comma"));
        assert!(!is_email("@b.com"));
        assert!(!is_email("a@.com"));
        assert!(!is_email("a@b@c.com"));
        assert!(!is_email("a b@c.com"));
    }

    #[test]
    fn length_counts_characters_not_bytes() {
        let validator = MinLength::new("password", 3);
        assert!(validator.validate("äöü").is_valid());
        assert!(!validator.validate("äö").is_valid());
    }

    #[test]
    fn integer_accepts_signs_but_not_whitespace() {
        assert!(Integer.validate("-42").is_valid());
        assert!(Integer.validate("+7").is_valid());
        assert!(!Integer.validate(" 7").is_valid());
        assert!(!Integer.validate("7.5").is_valid());
    }

    #[test]
    fn calendar_date_rejects_impossible_days() {
        assert!(CalendarDate.validate("2020-02-29").is_valid());
        assert!(!CalendarDate.validate("2021-02-29").is_valid());
        assert!(!CalendarDate.validate("2020/01/01").is_valid());
    }

    #[test]
    fn closures_are_validators() {
        let composite = CompositeValidator::new()
            .with(|value: &str| {
                if value.starts_with('x') {
                    ValidationResult::Valid
                } else {
                    ValidationResult::Invalid(ValidationError::NotANumber)
                }
            })
            .with(NonEmpty::new("field"));
        assert_eq!(composite.len(), 2);
        assert!(composite.validate("xyz").is_valid());
        assert_eq!(
            composite.validate("abc"),
            ValidationResult::Invalid(ValidationError::NotANumber)
        );
    }
}
