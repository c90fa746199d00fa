use std::sync::Mutex;

use super::{SessionError, SessionStore, SessionTokens};

/// Process-local store, used by tests and one-shot tooling.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    tokens: Mutex<Option<SessionTokens>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn with_tokens(tokens: SessionTokens) -> Self {
        Self {
            tokens: Mutex::new(Some(tokens)),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> Result<Option<SessionTokens>, SessionError> {
        let guard = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        Ok(guard.clone())
    }

    fn save(&self, tokens: &SessionTokens) -> Result<(), SessionError> {
        let mut guard = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), SessionError> {
        let mut guard = self.tokens.lock().map_err(|_| SessionError::Poisoned)?;
        *guard = None;
        Ok(())
    }
}
