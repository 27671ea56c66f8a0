// src/handlers/error.rs
use std::fmt;
use warp::reject::Reject;

/// Carried through warp rejection and turned into a JSON error body by the
/// recovery handler. The message names the stage that failed so the
/// frontend can show a single blocking notification.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn new(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}

/// The request's date path segment was not a YYYY-MM-DD date.
#[derive(Debug, Clone)]
pub struct InvalidDate {
    pub raw: String,
}

impl Reject for InvalidDate {}
