use std::fmt;

use thiserror::Error;

use crate::domain::validation::FieldErrors;
use crate::infra::api::ApiError;
use crate::session::SessionError;

/// What a controller was doing when a request failed; drives the generic
/// fallback message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Load,
    Fetch,
    Create,
    Update,
    Delete,
    Login,
    Register,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Load | Self::Fetch => "load",
            Self::Create => "create",
            Self::Update => "update",
            Self::Delete => "delete",
            Self::Login => "log in",
            Self::Register => "register",
        })
    }
}

/// Message shown to the user for a failed request: the server's own text
/// when it sent one, a generic sentence otherwise.
#[must_use]
pub fn user_message(action: Action, subject: &str, error: &ApiError) -> String {
    if let Some(message) = error.server_message() {
        return message.to_string();
    }
    match action {
        Action::Login => "Could not log in".to_string(),
        Action::Register => "Could not create the account".to_string(),
        _ => format!("Failed to {action} {subject}"),
    }
}

#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("cannot {action} while the form is {state}")]
    InvalidState {
        action: &'static str,
        state: &'static str,
    },
    #[error("validation failed: {0}")]
    Validation(#[from] FieldErrors),
    #[error("{message}")]
    Request {
        message: String,
        #[source]
        source: ApiError,
    },
    #[error("{0}")]
    Rejected(String),
    #[error("session storage failed: {0}")]
    Session(#[from] SessionError),
    #[error("operation cancelled")]
    Cancelled,
}

impl ControllerError {
    pub fn request(action: Action, subject: &str, source: ApiError) -> Self {
        if source.is_cancelled() {
            return Self::Cancelled;
        }
        Self::Request {
            message: user_message(action, subject, &source),
            source,
        }
    }

    pub(crate) fn invalid_state(action: &'static str, state: &'static str) -> Self {
        Self::InvalidState { action, state }
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }

    #[must_use]
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}
