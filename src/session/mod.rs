//! Session holder: the access/refresh pair issued at login.
//!
//! A [`Session`] is an explicit context handed to every authorized call.
//! The token is read from its store at call time, so a logout in one place
//! is seen by the next request everywhere else.

mod file;
mod memory;

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

pub use file::FileSessionStore;
pub use memory::MemorySessionStore;

#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionTokens {
    pub access: String,
    pub refresh: String,
}

impl fmt::Debug for SessionTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionTokens")
            .field("access", &"<redacted>")
            .field("refresh", &"<redacted>")
            .finish()
    }
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("session storage io error at `{path}`: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("session storage holds malformed data: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("session storage lock poisoned")]
    Poisoned,
}

/// Persistent key-value storage for the session tokens. Each call is one
/// whole read or write; there is no partial update.
pub trait SessionStore: fmt::Debug + Send + Sync {
    fn load(&self) -> Result<Option<SessionTokens>, SessionError>;
    fn save(&self, tokens: &SessionTokens) -> Result<(), SessionError>;
    fn clear(&self) -> Result<(), SessionError>;
}

#[derive(Clone, Debug)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: impl SessionStore + 'static) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// A session backed by process memory only.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemorySessionStore::default())
    }

    pub fn set_session(
        &self,
        access: impl Into<String>,
        refresh: impl Into<String>,
    ) -> Result<(), SessionError> {
        self.store.save(&SessionTokens {
            access: access.into(),
            refresh: refresh.into(),
        })
    }

    /// The current access token. Storage failures are logged and treated as
    /// "no token"; the server then answers unauthorized.
    #[must_use]
    pub fn access_token(&self) -> Option<String> {
        self.tokens().map(|tokens| tokens.access)
    }

    /// Stored alongside the access token. Nothing renews sessions with it.
    #[must_use]
    pub fn refresh_token(&self) -> Option<String> {
        self.tokens().map(|tokens| tokens.refresh)
    }

    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.access_token().is_some()
    }

    pub fn clear(&self) -> Result<(), SessionError> {
        self.store.clear()
    }

    fn tokens(&self) -> Option<SessionTokens> {
        match self.store.load() {
            Ok(tokens) => tokens.filter(|tokens| !tokens.access.is_empty()),
            Err(error) => {
                warn!(error = %error, "failed to read session storage");
                None
            }
        }
    }
}
