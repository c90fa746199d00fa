//! Wire types for the Entradas blog HTTP API.
//!
//! Field names follow the server's JSON exactly, which is why most of them
//! are Spanish. Optional fields default when the server omits them so older
//! deployments keep deserializing.

#![deny(clippy::all, clippy::pedantic)]

use serde::{Deserialize, Serialize};

/// Body of `POST /api/token/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRequest {
    pub username: String,
    pub password: String,
}

/// Access/refresh pair issued by the token endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenPair {
    #[serde(default)]
    pub access: String,
    #[serde(default)]
    pub refresh: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub nombre: String,
}

/// A blog post ("entrada").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entrada {
    pub id: i64,
    pub titulo: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub resumen: Option<String>,
    #[serde(default)]
    pub contenido: String,
    /// Server-relative path of the cover image.
    #[serde(default)]
    pub imagen: Option<String>,
    #[serde(default)]
    pub fecha_publicacion: Option<String>,
    #[serde(default)]
    pub autor: Option<i64>,
    #[serde(default)]
    pub categoria: Option<i64>,
}

/// Entry of the author directory (`GET /cuenta/usuarios/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usuario {
    pub id: i64,
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// The authenticated user's own record (`GET /cuenta/perfil/`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perfil {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub descripcion: Option<String>,
    #[serde(default)]
    pub es_autor: bool,
    /// Server-relative path of the avatar image.
    #[serde(default)]
    pub avatar: Option<String>,
}

/// Body of `POST /cuenta/registro/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub first_name: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub last_name: String,
}

/// Error envelope. The API reports failures through either `message` or
/// the framework default `detail`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub detail: Option<String>,
}

impl ErrorBody {
    /// The server-provided message, preferring `message` over `detail`.
    #[must_use]
    pub fn text(&self) -> Option<&str> {
        self.message
            .as_deref()
            .or(self.detail.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_body_prefers_message_over_detail() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"nombre duplicado","detail":"otro"}"#)
                .expect("parse");
        assert_eq!(body.text(), Some("nombre duplicado"));
    }

    #[test]
    fn error_body_falls_back_to_detail_and_ignores_blank() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"message":"  ","detail":"No active account found"}"#)
                .expect("parse");
        assert_eq!(body.text(), Some("No active account found"));

        let empty = ErrorBody::default();
        assert_eq!(empty.text(), None);
    }

    #[test]
    fn entrada_tolerates_missing_optional_fields() {
        let entrada: Entrada = serde_json::from_str(r#"{"id":7,"titulo":"Hola"}"#).expect("parse");
        assert_eq!(entrada.id, 7);
        assert!(entrada.slug.is_empty());
        assert_eq!(entrada.autor, None);
        assert_eq!(entrada.categoria, None);
    }

    #[test]
    fn registration_omits_empty_names() {
        let req = RegistrationRequest {
            username: "ana".into(),
            email: "ana@example.com".into(),
            password: "secret-pass".into(),
            first_name: String::new(),
            last_name: "Ruiz".into(),
        };
        let value = serde_json::to_value(&req).expect("serialize");
        assert!(value.get("first_name").is_none());
        assert_eq!(value["last_name"], "Ruiz");
    }
}
