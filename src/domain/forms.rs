//! Editable forms and the validated drafts they produce.

use std::fmt::Debug;

use entradas_api_types::{Category, Entrada, Perfil, RegistrationRequest, TokenRequest};

use super::uploads::Upload;
use super::validation::{FieldErrors, FieldSpec, Rule};

/// A form that validates into a draft ready for submission.
pub trait Form: Debug + Clone + Default + PartialEq + Send + Sync + 'static {
    type Output: Debug + Send + Sync;

    fn validate(&self) -> Result<Self::Output, FieldErrors>;

    /// Names of the fields whose values differ from `original`.
    fn changed_fields(&self, original: &Self) -> Vec<&'static str>;
}

macro_rules! diff_fields {
    ($current:expr, $original:expr, [$($field:ident),+ $(,)?]) => {{
        let mut changed = Vec::new();
        $(
            if $current.$field != $original.$field {
                changed.push(stringify!($field));
            }
        )+
        changed
    }};
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryForm {
    pub nombre: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryDraft {
    pub nombre: String,
}

impl CategoryForm {
    pub const NOMBRE: FieldSpec = FieldSpec::new(
        "nombre",
        &[Rule::Required, Rule::MinChars(3), Rule::MaxChars(50)],
    );

    pub fn new(nombre: impl Into<String>) -> Self {
        Self {
            nombre: nombre.into(),
        }
    }
}

impl From<&Category> for CategoryForm {
    fn from(category: &Category) -> Self {
        Self::new(category.nombre.clone())
    }
}

impl Form for CategoryForm {
    type Output = CategoryDraft;

    fn validate(&self) -> Result<CategoryDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let nombre = Self::NOMBRE.check(&self.nombre, &mut errors);
        errors.into_result(CategoryDraft { nombre })
    }

    fn changed_fields(&self, original: &Self) -> Vec<&'static str> {
        diff_fields!(self, original, [nombre])
    }
}

/// Post editor. `categoria` is kept as text the way a select/input hands it
/// over and is parsed during validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostForm {
    pub titulo: String,
    pub slug: String,
    pub resumen: String,
    pub contenido: String,
    pub categoria: String,
    pub imagen: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostDraft {
    pub titulo: String,
    pub slug: Option<String>,
    pub resumen: Option<String>,
    pub contenido: String,
    pub categoria: Option<i64>,
    pub imagen: Option<Upload>,
}

impl PostForm {
    pub const TITULO: FieldSpec = FieldSpec::new(
        "titulo",
        &[Rule::Required, Rule::MinChars(3), Rule::MaxChars(200)],
    );
    pub const SLUG: FieldSpec = FieldSpec::new("slug", &[Rule::MaxChars(200)]);
    pub const RESUMEN: FieldSpec = FieldSpec::new("resumen", &[Rule::MaxChars(500)]);
    pub const CONTENIDO: FieldSpec = FieldSpec::new("contenido", &[Rule::Required]);
    pub const CATEGORIA: FieldSpec = FieldSpec::new("categoria", &[Rule::Numeric]);
}

impl From<&Entrada> for PostForm {
    fn from(entrada: &Entrada) -> Self {
        Self {
            titulo: entrada.titulo.clone(),
            slug: entrada.slug.clone(),
            resumen: entrada.resumen.clone().unwrap_or_default(),
            contenido: entrada.contenido.clone(),
            categoria: entrada.categoria.map(|id| id.to_string()).unwrap_or_default(),
            imagen: None,
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

impl Form for PostForm {
    type Output = PostDraft;

    fn validate(&self) -> Result<PostDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let titulo = Self::TITULO.check(&self.titulo, &mut errors);
        let slug = Self::SLUG.check(&self.slug, &mut errors);
        let resumen = Self::RESUMEN.check(&self.resumen, &mut errors);
        let contenido = Self::CONTENIDO.check(&self.contenido, &mut errors);
        let categoria = Self::CATEGORIA.check(&self.categoria, &mut errors);
        if self.imagen.as_ref().is_some_and(Upload::is_empty) {
            errors.push("imagen", "must not be an empty file");
        }

        let categoria = categoria.parse::<i64>().ok();
        errors.into_result(PostDraft {
            titulo,
            slug: non_empty(slug),
            resumen: non_empty(resumen),
            contenido,
            categoria,
            imagen: self.imagen.clone(),
        })
    }

    fn changed_fields(&self, original: &Self) -> Vec<&'static str> {
        diff_fields!(self, original, [titulo, slug, resumen, contenido, categoria, imagen])
    }
}

/// The authenticated user's editable profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileForm {
    pub descripcion: String,
    pub es_autor: bool,
    pub avatar: Option<Upload>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileDraft {
    pub descripcion: String,
    pub es_autor: bool,
    pub avatar: Option<Upload>,
}

impl ProfileForm {
    pub const DESCRIPCION: FieldSpec = FieldSpec::new("descripcion", &[Rule::MaxChars(500)]);
}

impl From<&Perfil> for ProfileForm {
    fn from(perfil: &Perfil) -> Self {
        Self {
            descripcion: perfil.descripcion.clone().unwrap_or_default(),
            es_autor: perfil.es_autor,
            avatar: None,
        }
    }
}

impl Form for ProfileForm {
    type Output = ProfileDraft;

    fn validate(&self) -> Result<ProfileDraft, FieldErrors> {
        let mut errors = FieldErrors::new();
        let descripcion = Self::DESCRIPCION.check(&self.descripcion, &mut errors);
        if self.avatar.as_ref().is_some_and(Upload::is_empty) {
            errors.push("avatar", "must not be an empty file");
        }
        errors.into_result(ProfileDraft {
            descripcion,
            es_autor: self.es_autor,
            avatar: self.avatar.clone(),
        })
    }

    fn changed_fields(&self, original: &Self) -> Vec<&'static str> {
        diff_fields!(self, original, [descripcion, es_autor, avatar])
    }
}

/// Credentials as typed. Only emptiness is checked; the values are sent
/// untrimmed because whitespace may be part of a password.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

impl Debug for LoginForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginForm")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl LoginForm {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl Form for LoginForm {
    type Output = TokenRequest;

    fn validate(&self) -> Result<TokenRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        if self.username.trim().is_empty() {
            errors.push("username", "is required");
        }
        if self.password.trim().is_empty() {
            errors.push("password", "is required");
        }
        errors.into_result(TokenRequest {
            username: self.username.clone(),
            password: self.password.clone(),
        })
    }

    fn changed_fields(&self, original: &Self) -> Vec<&'static str> {
        diff_fields!(self, original, [username, password])
    }
}

#[derive(Clone, Default, PartialEq, Eq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl Debug for RegistrationForm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistrationForm")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

impl RegistrationForm {
    pub const USERNAME: FieldSpec = FieldSpec::new(
        "username",
        &[Rule::Required, Rule::MinChars(3), Rule::MaxChars(150)],
    );
    pub const EMAIL: FieldSpec = FieldSpec::new("email", &[Rule::Required, Rule::Email]);
    pub const FIRST_NAME: FieldSpec = FieldSpec::new("first_name", &[Rule::MaxChars(150)]);
    pub const LAST_NAME: FieldSpec = FieldSpec::new("last_name", &[Rule::MaxChars(150)]);
    pub const MIN_PASSWORD_CHARS: usize = 8;
}

impl Form for RegistrationForm {
    type Output = RegistrationRequest;

    fn validate(&self) -> Result<RegistrationRequest, FieldErrors> {
        let mut errors = FieldErrors::new();
        let username = Self::USERNAME.check(&self.username, &mut errors);
        let email = Self::EMAIL.check(&self.email, &mut errors);
        let first_name = Self::FIRST_NAME.check(&self.first_name, &mut errors);
        let last_name = Self::LAST_NAME.check(&self.last_name, &mut errors);
        if self.password.chars().count() < Self::MIN_PASSWORD_CHARS {
            errors.push(
                "password",
                format!("must be at least {} characters", Self::MIN_PASSWORD_CHARS),
            );
        }
        errors.into_result(RegistrationRequest {
            username,
            email,
            password: self.password.clone(),
            first_name,
            last_name,
        })
    }

    fn changed_fields(&self, original: &Self) -> Vec<&'static str> {
        diff_fields!(self, original, [username, email, password, first_name, last_name])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_name_bounds() {
        assert!(CategoryForm::new("").validate().is_err());
        assert!(CategoryForm::new("ab").validate().is_err());
        assert!(CategoryForm::new("x".repeat(51)).validate().is_err());
        let draft = CategoryForm::new(" Viajes ").validate().expect("valid");
        assert_eq!(draft.nombre, "Viajes");
    }

    #[test]
    fn post_form_collects_every_error() {
        let form = PostForm {
            titulo: "ab".into(),
            categoria: "x".into(),
            ..PostForm::default()
        };
        let errors = form.validate().expect_err("invalid");
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["titulo", "contenido", "categoria"]);
    }

    #[test]
    fn post_form_maps_blank_optionals_to_none() {
        let form = PostForm {
            titulo: "Rust en producción".into(),
            contenido: "cuerpo".into(),
            ..PostForm::default()
        };
        let draft = form.validate().expect("valid");
        assert_eq!(draft.slug, None);
        assert_eq!(draft.resumen, None);
        assert_eq!(draft.categoria, None);
    }

    #[test]
    fn post_form_round_trips_from_entrada_and_reports_changes() {
        let entrada = Entrada {
            id: 4,
            titulo: "Viaje a Lima".into(),
            slug: "viaje-a-lima".into(),
            resumen: Some("Notas".into()),
            contenido: "Texto".into(),
            imagen: Some("/media/lima.jpg".into()),
            fecha_publicacion: None,
            autor: Some(1),
            categoria: Some(2),
        };
        let original = PostForm::from(&entrada);
        assert_eq!(original.categoria, "2");

        let mut edited = original.clone();
        edited.titulo = "Viaje a Cusco".into();
        assert_eq!(edited.changed_fields(&original), vec!["titulo"]);
    }

    #[test]
    fn login_requires_both_fields_but_keeps_raw_values() {
        let errors = LoginForm::new(" ", "").validate().expect_err("empty");
        assert_eq!(errors.len(), 2);

        let req = LoginForm::new("ana", " secret ").validate().expect("valid");
        assert_eq!(req.password, " secret ");
    }

    #[test]
    fn login_debug_redacts_password() {
        let rendered = format!("{:?}", LoginForm::new("ana", "secret"));
        assert!(!rendered.contains("secret"));
    }

    #[test]
    fn registration_rules() {
        let form = RegistrationForm {
            username: "ana".into(),
            email: "ana-at-example".into(),
            password: "short".into(),
            ..RegistrationForm::default()
        };
        let errors = form.validate().expect_err("invalid");
        assert_eq!(errors.for_field("email").count(), 1);
        assert_eq!(errors.for_field("password").count(), 1);
    }

    #[test]
    fn profile_rejects_empty_avatar() {
        let form = ProfileForm {
            avatar: Some(Upload::new("a.png", "image/png", Vec::new())),
            ..ProfileForm::default()
        };
        assert!(form.validate().is_err());
    }
}
