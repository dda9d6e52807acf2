//! Declarative endpoint descriptors.
//!
//! A [`RequestDescriptor<P, R>`] names one endpoint call: where it goes, how,
//! with which headers and parameters, and which type `R` its response
//! decodes into. Building the wire request from it is the codec's job.

use std::fmt;
use std::marker::PhantomData;

use serde::Serialize;
use shelf_core::wire::Credentials;
use shelf_core::BookPayload;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters a descriptor can carry.
///
/// Every parameter type is a JSON body. Types usable with `GET` also list
/// their fields as query pairs, in declaration order and with their declared
/// names.
pub trait RequestParams: Serialize {
    fn query_items(&self) -> Option<Vec<(&'static str, String)>> {
        None
    }
}

impl RequestParams for () {}

impl RequestParams for Credentials {}

impl RequestParams for BookPayload {}

/// Query of `GET /books`. Values are already strings so the query form is
/// total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: String,
    pub limit: String,
}

impl PageQuery {
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.to_string(),
            limit: limit.to_string(),
        }
    }
}

impl RequestParams for PageQuery {
    fn query_items(&self) -> Option<Vec<(&'static str, String)>> {
        Some(vec![("page", self.page.clone()), ("limit", self.limit.clone())])
    }
}

pub struct RequestDescriptor<P, R> {
    method: HttpMethod,
    path: String,
    headers: Vec<(String, String)>,
    params: Option<P>,
    response: PhantomData<fn() -> R>,
}

impl<P, R> RequestDescriptor<P, R> {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: Vec::new(),
            params: None,
            response: PhantomData,
        }
    }

    pub fn with_params(mut self, params: P) -> Self {
        self.params = Some(params);
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn method(&self) -> HttpMethod {
        self.method
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn headers(&self) -> &[(String, String)] {
        &self.headers
    }

    pub fn params(&self) -> Option<&P> {
        self.params.as_ref()
    }
}

impl<P: Clone, R> Clone for RequestDescriptor<P, R> {
    fn clone(&self) -> Self {
        Self {
            method: self.method,
            path: self.path.clone(),
            headers: self.headers.clone(),
            params: self.params.clone(),
            response: PhantomData,
        }
    }
}

impl<P: fmt::Debug, R> fmt::Debug for RequestDescriptor<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestDescriptor")
            .field("method", &self.method)
            .field("path", &self.path)
            .field("headers", &self.headers)
            .field("params", &self.params)
            .field("response", &std::any::type_name::<R>())
            .finish()
    }
}
