//! HTTP transport for the blog API.

mod error;
mod payload;

use entradas_api_types::ErrorBody;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::{Client, Method, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

pub use error::ApiError;
pub use payload::{Body, MultipartFields};

use crate::infra::lifetime::Lifetime;
use crate::session::Session;

/// Credentials attached to one request.
#[derive(Debug, Clone, Copy)]
pub enum Auth<'a> {
    Anonymous,
    /// Read the access token from the session at send time.
    Bearer(&'a Session),
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    /// Build a client rooted at `base`. A path prefix on the base URL is kept.
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let http = Client::builder().user_agent(Self::user_agent()).build()?;
        Self::with_client(http, base)
    }

    pub fn with_client(http: Client, base: &str) -> Result<Self, ApiError> {
        let mut base = Url::parse(base)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.set_query(None);
        base.set_fragment(None);
        Ok(Self { http, base })
    }

    #[must_use]
    pub fn user_agent() -> &'static str {
        concat!("entradas-cli/", env!("CARGO_PKG_VERSION"))
    }

    #[must_use]
    pub fn base(&self) -> &Url {
        &self.base
    }

    pub fn url(&self, path: &str) -> Result<Url, ApiError> {
        self.base
            .join(path.trim_start_matches('/'))
            .map_err(ApiError::Url)
    }

    /// Relative path made of `prefix` followed by `segments`, each encoded as
    /// exactly one path segment.
    pub fn segment_path(&self, prefix: &str, segments: &[&str]) -> Result<String, ApiError> {
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(ApiError::InvalidSegment((*bad).to_string()));
        }
        let mut url = self.url(prefix)?;
        url.path_segments_mut()
            .map_err(|()| ApiError::InvalidSegment(prefix.to_string()))?
            .pop_if_empty()
            .extend(segments);
        let relative = url
            .path()
            .strip_prefix(self.base.path())
            .unwrap_or_else(|| url.path());
        Ok(relative.to_string())
    }

    pub fn bearer(session: &Session) -> Result<Option<HeaderValue>, ApiError> {
        session
            .access_token()
            .map(|token| {
                HeaderValue::from_str(&format!("Bearer {token}"))
                    .map_err(|e| ApiError::InvalidHeader(e.to_string()))
            })
            .transpose()
    }

    /// `GET path` and decode the JSON response.
    pub async fn fetch<T: DeserializeOwned>(
        &self,
        path: &str,
        auth: Auth<'_>,
        lifetime: &Lifetime,
    ) -> Result<T, ApiError> {
        let bytes = self
            .execute(Method::GET, path, auth, Body::Empty, lifetime)
            .await?;
        decode(&bytes)
    }

    /// Send a request whose response may legitimately be empty.
    pub async fn send<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
        body: Body,
        lifetime: &Lifetime,
    ) -> Result<Option<T>, ApiError> {
        let bytes = self.execute(method, path, auth, body, lifetime).await?;
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(None);
        }
        decode(&bytes).map(Some)
    }

    /// Send a request and ignore any response body.
    pub async fn send_unit(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
        body: Body,
        lifetime: &Lifetime,
    ) -> Result<(), ApiError> {
        self.execute(method, path, auth, body, lifetime).await?;
        Ok(())
    }

    async fn execute(
        &self,
        method: Method,
        path: &str,
        auth: Auth<'_>,
        body: Body,
        lifetime: &Lifetime,
    ) -> Result<Vec<u8>, ApiError> {
        let url = self.url(path)?;
        debug!(method = %method, url = %url, "api request");

        let mut req = self.http.request(method.clone(), url.clone());
        if let Auth::Bearer(session) = auth {
            match Self::bearer(session)? {
                Some(value) => req = req.header(AUTHORIZATION, value),
                None => debug!(url = %url, "no access token in session; sending unauthenticated"),
            }
        }
        req = match body {
            Body::Empty => req,
            Body::Json(value) => req.json(&value),
            Body::Multipart(fields) => req.multipart(fields.into_form()?),
        };

        let (status, bytes) = lifetime
            .guard(async move {
                let resp = req.send().await?;
                let status = resp.status();
                let bytes = resp.bytes().await?;
                Ok::<_, reqwest::Error>((status, bytes.to_vec()))
            })
            .await??;

        if !status.is_success() {
            let message = server_message(&bytes);
            warn!(
                method = %method,
                url = %url,
                status = status.as_u16(),
                message = message.as_deref().unwrap_or(""),
                "api request rejected"
            );
            return Err(ApiError::Server { status, message });
        }
        Ok(bytes)
    }
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    serde_json::from_slice(bytes).map_err(|e| ApiError::Decode(e.to_string()))
}

fn server_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.text().map(str::to_string))
}

#[cfg(test)]
mod tests {
    use httpmock::MockServer;
    use serde_json::json;

    use reqwest::StatusCode;

    use super::*;
    use crate::domain::uploads::Upload;

    #[test]
    fn base_path_prefix_is_preserved() {
        let client = ApiClient::new("https://blog.example.com/api?x=1").expect("client");
        assert_eq!(client.base().as_str(), "https://blog.example.com/api/");
        assert_eq!(
            client.url("/categorias/3").expect("url").as_str(),
            "https://blog.example.com/api/categorias/3"
        );
    }

    #[test]
    fn segment_path_encodes_reserved_characters() {
        let client = ApiClient::new("https://blog.example.com/api/").expect("client");
        let path = client
            .segment_path("entradas/", &["slug", "a?b/c#d"])
            .expect("path");
        assert_eq!(path, "entradas/slug/a%3Fb%2Fc%23d");
        assert_eq!(
            client.url(&path).expect("url").as_str(),
            "https://blog.example.com/api/entradas/slug/a%3Fb%2Fc%23d"
        );
        assert!(matches!(
            client.segment_path("entradas/", &["slug", ".."]),
            Err(ApiError::InvalidSegment(_))
        ));
        assert!(matches!(
            client.segment_path("entradas/", &["slug", ""]),
            Err(ApiError::InvalidSegment(_))
        ));
    }

    #[test]
    fn bearer_reads_token_at_call_time() {
        let session = Session::in_memory();
        assert!(ApiClient::bearer(&session).expect("header").is_none());
        session.set_session("tok1", "ref1").expect("set");
        let header = ApiClient::bearer(&session).expect("header").expect("present");
        assert_eq!(header.to_str().expect("header str"), "Bearer tok1");
    }

    #[tokio::test]
    async fn fetch_attaches_bearer_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET")
                    .path("/cuenta/perfil/")
                    .header("authorization", "Bearer tok1");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"username": "ana", "es_autor": true}));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let session = Session::in_memory();
        session.set_session("tok1", "ref1").expect("set");
        let perfil: entradas_api_types::Perfil = client
            .fetch("cuenta/perfil/", Auth::Bearer(&session), &Lifetime::new())
            .await
            .expect("profile");

        assert_eq!(perfil.username, "ana");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn server_message_is_surfaced() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("POST").path("/categorias/");
                then.status(400)
                    .header("content-type", "application/json")
                    .json_body(json!({"message": "La categoría ya existe"}));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let err = client
            .send::<serde_json::Value>(
                Method::POST,
                "categorias/",
                Auth::Anonymous,
                Body::Multipart(MultipartFields::new().text("nombre", "Viajes")),
                &Lifetime::new(),
            )
            .await
            .expect_err("rejected");

        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
        assert_eq!(err.server_message(), Some("La categoría ya existe"));
    }

    #[tokio::test]
    async fn non_json_error_has_no_message() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("DELETE").path("/categorias/9");
                then.status(500).body("<html>boom</html>");
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let err = client
            .send_unit(
                Method::DELETE,
                "categorias/9",
                Auth::Anonymous,
                Body::Empty,
                &Lifetime::new(),
            )
            .await
            .expect_err("rejected");
        assert_eq!(err.server_message(), None);
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    }

    #[tokio::test]
    async fn empty_success_body_decodes_to_none() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method("PUT").path("/categorias/3");
                then.status(204);
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let out: Option<serde_json::Value> = client
            .send(
                Method::PUT,
                "categorias/3",
                Auth::Anonymous,
                Body::Multipart(MultipartFields::new().text("nombre", "Cocina")),
                &Lifetime::new(),
            )
            .await
            .expect("ok");
        assert!(out.is_none());
    }

    #[tokio::test]
    async fn multipart_file_part_reaches_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("PUT")
                    .path("/cuenta/perfil/")
                    .body_includes("filename=\"yo.png\"")
                    .body_includes("es_autor");
                then.status(200)
                    .header("content-type", "application/json")
                    .json_body(json!({"username": "ana"}));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let upload = Upload::new("yo.png", "image/png", vec![0x89, 0x50]);
        let fields = MultipartFields::new()
            .text("descripcion", "hola")
            .text("es_autor", "true")
            .opt_file("avatar", Some(&upload));
        client
            .send::<serde_json::Value>(
                Method::PUT,
                "cuenta/perfil/",
                Auth::Anonymous,
                Body::Multipart(fields),
                &Lifetime::new(),
            )
            .await
            .expect("ok");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn ended_lifetime_cancels_without_sending() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method("GET").path("/categorias/");
                then.status(200).json_body(json!([]));
            })
            .await;

        let client = ApiClient::new(&server.base_url()).expect("client");
        let lifetime = Lifetime::new();
        lifetime.end();
        let err = client
            .fetch::<Vec<serde_json::Value>>("categorias/", Auth::Anonymous, &lifetime)
            .await
            .expect_err("cancelled");
        assert!(err.is_cancelled());
        mock.assert_calls_async(0).await;
    }
}
