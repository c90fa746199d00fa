use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("failed to read upload `{path}`: {source}")]
    Upload {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("domain validation failed: {message}")]
    Validation { message: String },
}

impl DomainError {
    pub fn upload(path: impl Into<String>, source: std::io::Error) -> Self {
        Self::Upload {
            path: path.into(),
            source,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }
}
