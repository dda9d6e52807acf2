use crate::screen::unexpected_outcome;
use crate::validation::{CompositeValidator, FormValidation};
use crate::wire::Credentials;
use crate::{ApiOutcome, ApiRequest, Effect, NetworkState, Screen, ScreenError};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LoginState {
    pub email: String,
    pub password: String,
    pub network: NetworkState<ScreenError>,
    /// Rendered validation failures of the last rejected submit.
    pub validation_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginMsg {
    EmailChanged(String),
    PasswordChanged(String),
    Submit,
    Completed(Result<ApiOutcome, ScreenError>),
}

impl LoginState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn validation(&self) -> FormValidation {
        FormValidation::new()
            .field(CompositeValidator::email(), self.email.clone())
            .field(CompositeValidator::password(), self.password.clone())
    }
}

pub fn update_login(mut state: LoginState, msg: LoginMsg) -> (LoginState, Vec<Effect>) {
    let effects = match msg {
        LoginMsg::EmailChanged(email) => {
            state.email = email;
            Vec::new()
        }
        LoginMsg::PasswordChanged(password) => {
            state.password = password;
            Vec::new()
        }
        LoginMsg::Submit => {
            let validation = state.validation();
            submit(
                &mut state.network,
                &mut state.validation_message,
                &validation,
                || {
                    ApiRequest::Login(Credentials {
                        email: state.email.clone(),
                        password: state.password.clone(),
                    })
                },
            )
        }
        LoginMsg::Completed(result) => complete_auth(&mut state.network, result),
    };
    (state, effects)
}

impl Screen for LoginState {
    type Msg = LoginMsg;
    const ONE_SHOT: bool = true;

    fn update(self, msg: LoginMsg) -> (Self, Vec<Effect>) {
        update_login(self, msg)
    }

    fn completed(result: Result<ApiOutcome, ScreenError>) -> LoginMsg {
        LoginMsg::Completed(result)
    }

    fn network(&self) -> &NetworkState<ScreenError> {
        &self.network
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SignUpState {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub network: NetworkState<ScreenError>,
    pub validation_message: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignUpMsg {
    EmailChanged(String),
    PasswordChanged(String),
    ConfirmPasswordChanged(String),
    Submit,
    Completed(Result<ApiOutcome, ScreenError>),
}

impl SignUpState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The confirmation check compares against the password as it is now.
    pub fn validation(&self) -> FormValidation {
        FormValidation::new()
            .field(CompositeValidator::email(), self.email.clone())
            .field(CompositeValidator::password(), self.password.clone())
            .field(
                CompositeValidator::confirm_password(self.password.clone()),
                self.confirm_password.clone(),
            )
    }
}

pub fn update_sign_up(mut state: SignUpState, msg: SignUpMsg) -> (SignUpState, Vec<Effect>) {
    let effects = match msg {
        SignUpMsg::EmailChanged(email) => {
            state.email = email;
            Vec::new()
        }
        SignUpMsg::PasswordChanged(password) => {
            state.password = password;
            Vec::new()
        }
        SignUpMsg::ConfirmPasswordChanged(confirm) => {
            state.confirm_password = confirm;
            Vec::new()
        }
        SignUpMsg::Submit => {
            let validation = state.validation();
            submit(
                &mut state.network,
                &mut state.validation_message,
                &validation,
                || {
                    ApiRequest::SignUp(Credentials {
                        email: state.email.clone(),
                        password: state.password.clone(),
                    })
                },
            )
        }
        SignUpMsg::Completed(result) => complete_auth(&mut state.network, result),
    };
    (state, effects)
}

impl Screen for SignUpState {
    type Msg = SignUpMsg;
    const ONE_SHOT: bool = true;

    fn update(self, msg: SignUpMsg) -> (Self, Vec<Effect>) {
        update_sign_up(self, msg)
    }

    fn completed(result: Result<ApiOutcome, ScreenError>) -> SignUpMsg {
        SignUpMsg::Completed(result)
    }

    fn network(&self) -> &NetworkState<ScreenError> {
        &self.network
    }
}

/// Shared submit path for form screens: single-flight first, then the
/// form check, then the request.
pub(crate) fn submit(
    network: &mut NetworkState<ScreenError>,
    validation_message: &mut Option<String>,
    validation: &FormValidation,
    request: impl FnOnce() -> ApiRequest,
) -> Vec<Effect> {
    if network.is_loading() {
        return Vec::new();
    }
    if let Some(message) = validation.message() {
        *validation_message = Some(message);
        return Vec::new();
    }
    *validation_message = None;
    network.begin();
    vec![Effect::Request(request())]
}

fn complete_auth(
    network: &mut NetworkState<ScreenError>,
    result: Result<ApiOutcome, ScreenError>,
) -> Vec<Effect> {
    let result = match result {
        Ok(ApiOutcome::Authenticated(user)) => Ok(user),
        Ok(_) => Err(unexpected_outcome()),
        Err(err) => Err(err),
    };
    network.complete(&result);
    match result {
        Ok(user) => vec![Effect::StoreToken(user.token)],
        Err(_) => Vec::new(),
    }
}
