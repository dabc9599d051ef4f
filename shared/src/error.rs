use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use crate::form::{FormField, FormPhase};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorSeverity {
    Transient,
    Permanent,
    Fatal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    Network,
    Timeout,
    Validation,
    Precondition,
    NotFound,
    Deserialization,
    InvalidState,
    Internal,
    Unknown,
}

impl ErrorKind {
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::Network => "NETWORK_ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Validation => "VALIDATION_ERROR",
            Self::Precondition => "PRECONDITION_FAILED",
            Self::NotFound => "NOT_FOUND",
            Self::Deserialization => "DESERIALIZATION_ERROR",
            Self::InvalidState => "INVALID_STATE",
            Self::Internal => "INTERNAL_ERROR",
            Self::Unknown => "UNKNOWN_ERROR",
        }
    }

    #[must_use]
    pub const fn default_severity(self) -> ErrorSeverity {
        match self {
            Self::Network | Self::Timeout | Self::Internal => ErrorSeverity::Transient,

            Self::Deserialization | Self::InvalidState => ErrorSeverity::Fatal,

            Self::Validation | Self::Precondition | Self::NotFound | Self::Unknown => {
                ErrorSeverity::Permanent
            }
        }
    }

    #[must_use]
    pub const fn is_retryable(self) -> bool {
        matches!(self, Self::Network | Self::Timeout | Self::Internal)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AppError {
    pub kind: ErrorKind,
    pub severity: ErrorSeverity,
    pub message: String,
    pub internal_message: Option<String>,
    pub context: HashMap<String, String>,
}

impl AppError {
    #[must_use]
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity: kind.default_severity(),
            message: message.into(),
            internal_message: None,
            context: HashMap::new(),
        }
    }

    #[must_use]
    pub fn with_internal(mut self, internal: impl Into<String>) -> Self {
        self.internal_message = Some(internal.into());
        self
    }

    #[must_use]
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.kind.code()
    }

    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        self.kind.is_retryable() && !matches!(self.severity, ErrorSeverity::Fatal)
    }

    #[must_use]
    pub fn user_facing_message(&self) -> String {
        match self.kind {
            ErrorKind::Network => {
                "Unable to connect. Please check your internet connection and try again.".into()
            }
            ErrorKind::Timeout => "The request timed out. Please try again.".into(),
            ErrorKind::Validation | ErrorKind::Precondition => self.message.clone(),
            ErrorKind::NotFound => "The requested item could not be found.".into(),
            ErrorKind::Deserialization => {
                "The server sent data we could not read. Please try again later.".into()
            }
            ErrorKind::InvalidState => {
                "The app is in an invalid state. Please reload the page.".into()
            }
            ErrorKind::Internal | ErrorKind::Unknown => {
                "An unexpected error occurred. Please try again.".into()
            }
        }
    }

    #[must_use]
    pub fn from_http_status(status: u16) -> Self {
        let kind = match status {
            400 => ErrorKind::Validation,
            404 => ErrorKind::NotFound,
            408 => ErrorKind::Timeout,
            500..=599 => ErrorKind::Internal,
            _ => ErrorKind::Unknown,
        };

        Self::new(kind, format!("HTTP error: {status}"))
            .with_context("http_status", status.to_string())
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code(), self.message)?;
        if let Some(internal) = &self.internal_message {
            write!(f, " (internal: {internal})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AppError {}

/// Any failure talking to the image service.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum NetworkError {
    #[error("transport failure: {0}")]
    Transport(String),
    #[error("request timed out")]
    Timeout,
    #[error("unexpected status {code}")]
    Status { code: u16 },
    #[error("response body could not be decoded: {0}")]
    Decode(String),
    #[error("response body was empty")]
    EmptyBody,
    #[error("invalid request url: {0}")]
    InvalidUrl(String),
}

impl From<NetworkError> for AppError {
    fn from(e: NetworkError) -> Self {
        match &e {
            NetworkError::Status { code } => {
                AppError::from_http_status(*code).with_internal(e.to_string())
            }
            NetworkError::Timeout => AppError::new(ErrorKind::Timeout, e.to_string()),
            NetworkError::Decode(_) | NetworkError::EmptyBody => {
                AppError::new(ErrorKind::Deserialization, e.to_string())
            }
            NetworkError::InvalidUrl(_) => AppError::new(ErrorKind::Internal, e.to_string()),
            NetworkError::Transport(_) => AppError::new(ErrorKind::Network, e.to_string()),
        }
    }
}

/// Field-level rejection. The `Display` text is shown inline next to the field.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: FormField },
    #[error("The file must be smaller than {limit}")]
    FileTooLarge {
        size_bytes: u64,
        max_bytes: u64,
        limit: String,
    },
    #[error("Only {accepted} files are accepted")]
    UnsupportedMediaType { media_type: String, accepted: String },
    #[error("{field} must be at least {min} characters")]
    TooShort { field: FormField, len: usize, min: usize },
    #[error("{field} must be at most {max} characters")]
    TooLong { field: FormField, len: usize, max: usize },
    #[error("Image upload failed")]
    UploadFailed { reason: String },
}

impl From<ValidationError> for AppError {
    fn from(e: ValidationError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}

/// An action guard that is not met yet.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum PreconditionError {
    #[error("You need to add an image and wait for its upload to finish before submitting.")]
    ImageNotUploaded,
}

impl From<PreconditionError> for AppError {
    fn from(e: PreconditionError) -> Self {
        AppError::new(ErrorKind::Precondition, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransitionError {
    #[error("Invalid form transition from {from:?} to {to:?}")]
    InvalidTransition { from: FormPhase, to: FormPhase },
}

impl From<TransitionError> for AppError {
    fn from(e: TransitionError) -> Self {
        AppError::new(ErrorKind::InvalidState, e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("config could not be parsed: {0}")]
    Parse(String),
    #[error("invalid api base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("invalid limit {name}: {reason}")]
    InvalidLimit { name: &'static str, reason: String },
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::new(ErrorKind::Validation, e.to_string())
    }
}
