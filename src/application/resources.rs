//! Remote collections and the endpoints behind them.

use std::fmt::Debug;

use async_trait::async_trait;
use entradas_api_types::{Category, Entrada, Usuario};
use reqwest::Method;
use serde::Serialize;

use crate::domain::forms::{CategoryDraft, CategoryForm, Form, PostDraft, PostForm};
use crate::infra::api::{ApiClient, ApiError, Auth, Body, MultipartFields};
use crate::infra::lifetime::Lifetime;
use crate::session::Session;

use super::auth::Accounts;

pub const CATEGORIES_PATH: &str = "categorias/";
pub const POSTS_PATH: &str = "entradas/";
pub const AUTHORS_PATH: &str = "cuenta/usuarios/";

/// Anything carrying the server-assigned numeric id.
pub trait Identified {
    fn id(&self) -> i64;
}

impl Identified for Category {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Entrada {
    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Usuario {
    fn id(&self) -> i64 {
        self.id
    }
}

/// A collection that can be fetched as a whole.
#[async_trait]
pub trait ListSource: Send + Sync {
    type Item: Identified + Debug + Clone + Serialize + Send + Sync + 'static;

    /// Plural noun used in messages and logs.
    const COLLECTION: &'static str;

    async fn list(&self, lifetime: &Lifetime) -> Result<Vec<Self::Item>, ApiError>;
}

/// A collection with per-item read, create, update and delete, all keyed by
/// id.
#[async_trait]
pub trait Resource: ListSource {
    type Form: Form;

    /// Singular noun used in messages and logs.
    const SINGULAR: &'static str;

    fn form_for(item: &Self::Item) -> Self::Form;

    async fn fetch(&self, id: i64, lifetime: &Lifetime) -> Result<Self::Item, ApiError>;

    async fn create(
        &self,
        draft: &<Self::Form as Form>::Output,
        lifetime: &Lifetime,
    ) -> Result<Option<Self::Item>, ApiError>;

    async fn update(
        &self,
        id: i64,
        draft: &<Self::Form as Form>::Output,
        lifetime: &Lifetime,
    ) -> Result<Option<Self::Item>, ApiError>;

    async fn delete(&self, id: i64, lifetime: &Lifetime) -> Result<(), ApiError>;
}

/// Entry point bundling the transport with the session every authorized
/// call reads its token from.
#[derive(Clone, Debug)]
pub struct BlogApi {
    client: ApiClient,
    session: Session,
}

impl BlogApi {
    #[must_use]
    pub fn new(client: ApiClient, session: Session) -> Self {
        Self { client, session }
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn categories(&self) -> Categories {
        Categories {
            client: self.client.clone(),
            session: self.session.clone(),
        }
    }

    #[must_use]
    pub fn posts(&self) -> Posts {
        Posts {
            client: self.client.clone(),
            session: self.session.clone(),
        }
    }

    #[must_use]
    pub fn authors(&self) -> Authors {
        Authors {
            client: self.client.clone(),
            session: self.session.clone(),
        }
    }

    #[must_use]
    pub fn accounts(&self) -> Accounts {
        Accounts::new(self.client.clone(), self.session.clone())
    }
}

#[derive(Clone, Debug)]
pub struct Categories {
    client: ApiClient,
    session: Session,
}

fn category_fields(draft: &CategoryDraft) -> MultipartFields {
    MultipartFields::new().text("nombre", draft.nombre.clone())
}

#[async_trait]
impl ListSource for Categories {
    type Item = Category;

    const COLLECTION: &'static str = "categories";

    async fn list(&self, lifetime: &Lifetime) -> Result<Vec<Category>, ApiError> {
        self.client
            .fetch(CATEGORIES_PATH, Auth::Bearer(&self.session), lifetime)
            .await
    }
}

#[async_trait]
impl Resource for Categories {
    type Form = CategoryForm;

    const SINGULAR: &'static str = "category";

    fn form_for(item: &Category) -> CategoryForm {
        CategoryForm::from(item)
    }

    async fn fetch(&self, id: i64, lifetime: &Lifetime) -> Result<Category, ApiError> {
        let path = format!("{CATEGORIES_PATH}{id}");
        self.client
            .fetch(&path, Auth::Bearer(&self.session), lifetime)
            .await
    }

    async fn create(
        &self,
        draft: &CategoryDraft,
        lifetime: &Lifetime,
    ) -> Result<Option<Category>, ApiError> {
        self.client
            .send(
                Method::POST,
                CATEGORIES_PATH,
                Auth::Bearer(&self.session),
                Body::Multipart(category_fields(draft)),
                lifetime,
            )
            .await
    }

    async fn update(
        &self,
        id: i64,
        draft: &CategoryDraft,
        lifetime: &Lifetime,
    ) -> Result<Option<Category>, ApiError> {
        let path = format!("{CATEGORIES_PATH}{id}");
        self.client
            .send(
                Method::PUT,
                &path,
                Auth::Bearer(&self.session),
                Body::Multipart(category_fields(draft)),
                lifetime,
            )
            .await
    }

    async fn delete(&self, id: i64, lifetime: &Lifetime) -> Result<(), ApiError> {
        let path = format!("{CATEGORIES_PATH}{id}");
        self.client
            .send_unit(
                Method::DELETE,
                &path,
                Auth::Bearer(&self.session),
                Body::Empty,
                lifetime,
            )
            .await
    }
}

#[derive(Clone, Debug)]
pub struct Posts {
    client: ApiClient,
    session: Session,
}

impl Posts {
    /// Detail lookup by the human-readable slug.
    pub async fn by_slug(&self, slug: &str, lifetime: &Lifetime) -> Result<Entrada, ApiError> {
        let path = self.client.segment_path(POSTS_PATH, &["slug", slug])?;
        self.client
            .fetch(&path, Auth::Bearer(&self.session), lifetime)
            .await
    }
}

pub(crate) fn post_fields(draft: &PostDraft) -> MultipartFields {
    MultipartFields::new()
        .text("titulo", draft.titulo.clone())
        .opt_text("slug", draft.slug.clone())
        .opt_text("resumen", draft.resumen.clone())
        .text("contenido", draft.contenido.clone())
        .opt_text("categoria", draft.categoria.map(|id| id.to_string()))
        .opt_file("imagen", draft.imagen.as_ref())
}

#[async_trait]
impl ListSource for Posts {
    type Item = Entrada;

    const COLLECTION: &'static str = "posts";

    async fn list(&self, lifetime: &Lifetime) -> Result<Vec<Entrada>, ApiError> {
        self.client
            .fetch(POSTS_PATH, Auth::Bearer(&self.session), lifetime)
            .await
    }
}

#[async_trait]
impl Resource for Posts {
    type Form = PostForm;

    const SINGULAR: &'static str = "post";

    fn form_for(item: &Entrada) -> PostForm {
        PostForm::from(item)
    }

    async fn fetch(&self, id: i64, lifetime: &Lifetime) -> Result<Entrada, ApiError> {
        let path = format!("{POSTS_PATH}{id}");
        self.client
            .fetch(&path, Auth::Bearer(&self.session), lifetime)
            .await
    }

    async fn create(
        &self,
        draft: &PostDraft,
        lifetime: &Lifetime,
    ) -> Result<Option<Entrada>, ApiError> {
        self.client
            .send(
                Method::POST,
                POSTS_PATH,
                Auth::Bearer(&self.session),
                Body::Multipart(post_fields(draft)),
                lifetime,
            )
            .await
    }

    async fn update(
        &self,
        id: i64,
        draft: &PostDraft,
        lifetime: &Lifetime,
    ) -> Result<Option<Entrada>, ApiError> {
        let path = format!("{POSTS_PATH}{id}");
        self.client
            .send(
                Method::PUT,
                &path,
                Auth::Bearer(&self.session),
                Body::Multipart(post_fields(draft)),
                lifetime,
            )
            .await
    }

    async fn delete(&self, id: i64, lifetime: &Lifetime) -> Result<(), ApiError> {
        let path = format!("{POSTS_PATH}{id}");
        self.client
            .send_unit(
                Method::DELETE,
                &path,
                Auth::Bearer(&self.session),
                Body::Empty,
                lifetime,
            )
            .await
    }
}

/// Read-only author directory.
#[derive(Clone, Debug)]
pub struct Authors {
    client: ApiClient,
    session: Session,
}

#[async_trait]
impl ListSource for Authors {
    type Item = Usuario;

    const COLLECTION: &'static str = "authors";

    async fn list(&self, lifetime: &Lifetime) -> Result<Vec<Usuario>, ApiError> {
        self.client
            .fetch(AUTHORS_PATH, Auth::Bearer(&self.session), lifetime)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::uploads::Upload;

    #[test]
    fn post_fields_skip_absent_optionals() {
        let draft = PostDraft {
            titulo: "Hola".into(),
            slug: None,
            resumen: Some("breve".into()),
            contenido: "texto".into(),
            categoria: Some(4),
            imagen: Some(Upload::new("p.jpg", "image/jpeg", vec![1])),
        };
        let fields = post_fields(&draft);
        let names: Vec<_> = fields.names().collect();
        assert_eq!(
            names,
            vec!["titulo", "resumen", "contenido", "categoria", "imagen"]
        );
        assert_eq!(fields.text_value("categoria"), Some("4"));
    }

    #[tokio::test]
    async fn slug_lookup_rejects_dot_segments() {
        let client = ApiClient::new("http://127.0.0.1:8000/").expect("client");
        let posts = BlogApi::new(client, Session::in_memory()).posts();
        let err = posts
            .by_slug("..", &Lifetime::new())
            .await
            .expect_err("rejected");
        assert!(matches!(err, ApiError::InvalidSegment(_)));
    }
}
