//! The posts screen: posts, categories and authors are fetched together and
//! joined before anything is shown.

use async_trait::async_trait;
use entradas_api_types::{Category, Entrada, Usuario};
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::lookup::{Directory, PostCard};
use crate::infra::lifetime::Lifetime;

use super::error::{Action, ControllerError};
use super::loader::Reload;
use super::resources::{Authors, BlogApi, Categories, ListSource, Posts};

const SUBJECT: &str = "posts data";

#[derive(Debug)]
pub struct PostsBoard {
    posts: Posts,
    categories: Categories,
    authors: Authors,
    media_base: Url,
    lifetime: Lifetime,
    entries: Vec<Entrada>,
    category_list: Vec<Category>,
    author_list: Vec<Usuario>,
    directory: Directory,
    loading: bool,
    error: Option<String>,
}

impl PostsBoard {
    #[must_use]
    pub fn new(api: &BlogApi, lifetime: Lifetime) -> Self {
        Self {
            posts: api.posts(),
            categories: api.categories(),
            authors: api.authors(),
            media_base: api.client().base().clone(),
            lifetime,
            entries: Vec::new(),
            category_list: Vec::new(),
            author_list: Vec::new(),
            directory: Directory::default(),
            loading: false,
            error: None,
        }
    }

    /// Fetch the three collections concurrently. One failure fails the whole
    /// load with a single message and leaves the previous data in place.
    pub async fn load(&mut self) -> Result<(), ControllerError> {
        self.loading = true;
        let lifetime = &self.lifetime;
        let joined = tokio::try_join!(
            self.posts.list(lifetime),
            self.categories.list(lifetime),
            self.authors.list(lifetime),
        );
        self.loading = false;

        if self.lifetime.is_ended() {
            debug!("posts board load finished after unmount; discarded");
            return Err(ControllerError::Cancelled);
        }

        match joined {
            Ok((entries, categories, authors)) => {
                info!(
                    posts = entries.len(),
                    categories = categories.len(),
                    authors = authors.len(),
                    "posts board loaded"
                );
                self.directory = Directory::new(&authors, &categories);
                self.entries = entries;
                self.category_list = categories;
                self.author_list = authors;
                self.error = None;
                Ok(())
            }
            Err(err) => {
                let err = ControllerError::request(Action::Load, SUBJECT, err);
                if !err.is_cancelled() {
                    warn!(error = %err, "posts board load failed");
                    self.error = Some(err.to_string());
                }
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn entries(&self) -> &[Entrada] {
        &self.entries
    }

    #[must_use]
    pub fn categories(&self) -> &[Category] {
        &self.category_list
    }

    #[must_use]
    pub fn authors(&self) -> &[Usuario] {
        &self.author_list
    }

    #[must_use]
    pub fn directory(&self) -> &Directory {
        &self.directory
    }

    /// Display cards with author and category references resolved.
    #[must_use]
    pub fn cards(&self) -> Vec<PostCard> {
        self.entries
            .iter()
            .map(|entrada| self.directory.card(entrada, &self.media_base))
            .collect()
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

    pub fn unmount(&self) {
        self.lifetime.end();
    }
}

#[async_trait]
impl Reload for PostsBoard {
    async fn reload(&mut self) -> Result<(), ControllerError> {
        self.load().await
    }
}
