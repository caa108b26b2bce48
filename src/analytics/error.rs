use std::fmt::{Display, Formatter};

use serde_json::Value;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalyticsErrorCode {
    /// A required argument was missing; raised before any channel is contacted.
    InvalidArgument,
    /// The browser library handle could not be obtained.
    Unavailable,
    /// The native bridge or browser library reported a failure.
    Downstream,
}

impl AnalyticsErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnalyticsErrorCode::InvalidArgument => "amplitude/invalid-argument",
            AnalyticsErrorCode::Unavailable => "amplitude/unavailable",
            AnalyticsErrorCode::Downstream => "amplitude/downstream",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnalyticsError {
    pub code: AnalyticsErrorCode,
    message: String,
}

impl AnalyticsError {
    pub fn new(code: AnalyticsErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    pub fn code_str(&self) -> &'static str {
        self.code.as_str()
    }

    /// The rejection reason exactly as produced locally or reported downstream.
    pub fn message(&self) -> &str {
        &self.message
    }
}

impl Display for AnalyticsError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code_str())
    }
}

impl std::error::Error for AnalyticsError {}

pub type AnalyticsResult<T> = Result<T, AnalyticsError>;

pub fn invalid_argument(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::InvalidArgument, message)
}

pub fn unavailable(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Unavailable, message)
}

pub fn downstream_error(message: impl Into<String>) -> AnalyticsError {
    AnalyticsError::new(AnalyticsErrorCode::Downstream, message)
}

/// Wraps a rejection payload from the native side without altering its text.
pub(crate) fn from_rejection(payload: Value) -> AnalyticsError {
    downstream_error(payload_text(payload))
}

/// String payloads are returned as-is, anything else as its JSON text.
pub(crate) fn payload_text(payload: Value) -> String {
    match payload {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
