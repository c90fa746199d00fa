//! Resource List Loader: holds one remote collection and replaces it in full
//! on every successful load.

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::infra::lifetime::Lifetime;

use super::error::{Action, ControllerError};
use super::resources::{Identified, ListSource};

/// Something that can re-fetch the state it displays. Create and edit
/// controllers call this on their owner after every successful mutation.
#[async_trait]
pub trait Reload: Send {
    async fn reload(&mut self) -> Result<(), ControllerError>;
}

#[derive(Debug)]
pub struct ListLoader<S: ListSource> {
    source: S,
    lifetime: Lifetime,
    items: Vec<S::Item>,
    loading: bool,
    error: Option<String>,
}

impl<S: ListSource> ListLoader<S> {
    pub fn new(source: S, lifetime: Lifetime) -> Self {
        Self {
            source,
            lifetime,
            items: Vec::new(),
            loading: false,
            error: None,
        }
    }

    /// Fetch the collection once. On success the local copy is replaced and
    /// any previous error cleared; on failure the previous items stay and
    /// the error is recorded for a manual retry. A result arriving after the
    /// lifetime ended is dropped.
    pub async fn load(&mut self) -> Result<&[S::Item], ControllerError> {
        self.loading = true;
        let outcome = self.source.list(&self.lifetime).await;
        self.loading = false;

        if self.lifetime.is_ended() {
            debug!(collection = S::COLLECTION, "load finished after unmount; discarded");
            return Err(ControllerError::Cancelled);
        }

        match outcome {
            Ok(items) => {
                info!(collection = S::COLLECTION, count = items.len(), "collection loaded");
                self.items = items;
                self.error = None;
                Ok(&self.items)
            }
            Err(err) => {
                let err = ControllerError::request(Action::Load, S::COLLECTION, err);
                if !err.is_cancelled() {
                    warn!(collection = S::COLLECTION, error = %err, "collection load failed");
                    self.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    /// Same request as [`Self::load`]; offered after a failed attempt.
    pub async fn retry(&mut self) -> Result<&[S::Item], ControllerError> {
        self.load().await
    }

    #[must_use]
    pub fn items(&self) -> &[S::Item] {
        &self.items
    }

    #[must_use]
    pub fn find(&self, id: i64) -> Option<&S::Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub fn can_retry(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub fn source(&self) -> &S {
        &self.source
    }

    #[must_use]
    pub fn lifetime(&self) -> &Lifetime {
        &self.lifetime
    }

    /// End the loader's lifetime; in-flight loads are abandoned.
    pub fn unmount(&self) {
        self.lifetime.end();
    }
}

#[async_trait]
impl<S: ListSource> Reload for ListLoader<S> {
    async fn reload(&mut self) -> Result<(), ControllerError> {
        self.load().await.map(|_| ())
    }
}
