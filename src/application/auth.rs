//! Account endpoints plus the login, logout and registration flows.

use entradas_api_types::{Perfil, RegistrationRequest, TokenPair, TokenRequest};
use reqwest::Method;
use serde::Serialize;
use tracing::{info, warn};

use crate::domain::forms::{Form, LoginForm, ProfileDraft, RegistrationForm};
use crate::domain::validation::FieldErrors;
use crate::infra::api::{ApiClient, ApiError, Auth, Body, MultipartFields};
use crate::infra::lifetime::Lifetime;
use crate::session::Session;

use super::error::{Action, ControllerError};
use super::notice::Notice;

pub const TOKEN_PATH: &str = "api/token/";
pub const PROFILE_PATH: &str = "cuenta/perfil/";
pub const REGISTER_PATH: &str = "cuenta/registro/";

const ALL_FIELDS_REQUIRED: &str = "All fields are required";
const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Where the front-end goes after an authentication change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Destination {
    Landing,
    Login,
}

#[derive(Clone, Debug)]
pub struct Accounts {
    client: ApiClient,
    session: Session,
}

impl Accounts {
    #[must_use]
    pub fn new(client: ApiClient, session: Session) -> Self {
        Self { client, session }
    }

    #[must_use]
    pub fn session(&self) -> &Session {
        &self.session
    }

    #[must_use]
    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub async fn obtain_token(
        &self,
        credentials: &TokenRequest,
        lifetime: &Lifetime,
    ) -> Result<TokenPair, ApiError> {
        let body = serde_json::to_value(credentials).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.client
            .send(Method::POST, TOKEN_PATH, Auth::Anonymous, Body::Json(body), lifetime)
            .await?
            .ok_or_else(|| ApiError::Decode("token endpoint returned an empty body".into()))
    }

    pub async fn register(
        &self,
        request: &RegistrationRequest,
        lifetime: &Lifetime,
    ) -> Result<(), ApiError> {
        let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
        self.client
            .send_unit(Method::POST, REGISTER_PATH, Auth::Anonymous, Body::Json(body), lifetime)
            .await
    }

    pub async fn profile(&self, lifetime: &Lifetime) -> Result<Perfil, ApiError> {
        self.client
            .fetch(PROFILE_PATH, Auth::Bearer(&self.session), lifetime)
            .await
    }

    pub async fn update_profile(
        &self,
        draft: &ProfileDraft,
        lifetime: &Lifetime,
    ) -> Result<Option<Perfil>, ApiError> {
        let fields = MultipartFields::new()
            .text("descripcion", draft.descripcion.clone())
            .text("es_autor", draft.es_autor.to_string())
            .opt_file("avatar", draft.avatar.as_ref());
        self.client
            .send(
                Method::PUT,
                PROFILE_PATH,
                Auth::Bearer(&self.session),
                Body::Multipart(fields),
                lifetime,
            )
            .await
    }

    /// Drop the stored tokens.
    pub fn logout(&self) -> Result<Destination, ControllerError> {
        self.session.clear()?;
        info!("logged out");
        Ok(Destination::Login)
    }
}

#[derive(Debug)]
pub struct LoginController {
    accounts: Accounts,
    lifetime: Lifetime,
    form: LoginForm,
    loading: bool,
    error: Option<String>,
}

impl LoginController {
    #[must_use]
    pub fn new(accounts: Accounts, lifetime: Lifetime) -> Self {
        Self {
            accounts,
            lifetime,
            form: LoginForm::default(),
            loading: false,
            error: None,
        }
    }

    pub fn form_mut(&mut self) -> &mut LoginForm {
        &mut self.form
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Exchange the credentials for a token pair, store it once, and point
    /// at the landing view.
    pub async fn submit(&mut self) -> Result<Destination, ControllerError> {
        self.error = None;
        let credentials = match self.form.validate() {
            Ok(credentials) => credentials,
            Err(errors) => {
                self.error = Some(ALL_FIELDS_REQUIRED.to_string());
                return Err(errors.into());
            }
        };

        self.loading = true;
        let outcome = self
            .accounts
            .obtain_token(&credentials, &self.lifetime)
            .await;
        self.loading = false;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        let pair = match outcome {
            Ok(pair) => pair,
            Err(err) => {
                let err = ControllerError::request(Action::Login, "", err);
                if !err.is_cancelled() {
                    warn!(username = %credentials.username, error = %err, "login failed");
                    self.error = Some(err.to_string());
                }
                return Err(err);
            }
        };
        if pair.access.is_empty() {
            self.error = Some(INVALID_CREDENTIALS.to_string());
            return Err(ControllerError::Rejected(INVALID_CREDENTIALS.to_string()));
        }

        if let Err(err) = self.accounts.session().set_session(pair.access, pair.refresh) {
            self.error = Some(err.to_string());
            return Err(err.into());
        }
        info!(username = %credentials.username, "logged in");
        Ok(Destination::Landing)
    }
}

#[derive(Debug)]
pub struct RegistrationController {
    accounts: Accounts,
    lifetime: Lifetime,
    form: RegistrationForm,
    field_errors: FieldErrors,
    notice: Option<Notice>,
}

impl RegistrationController {
    #[must_use]
    pub fn new(accounts: Accounts, lifetime: Lifetime) -> Self {
        Self {
            accounts,
            lifetime,
            form: RegistrationForm::default(),
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    pub fn form_mut(&mut self) -> &mut RegistrationForm {
        &mut self.form
    }

    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    /// Create the account. On success the form is cleared and the user is
    /// sent to log in.
    pub async fn submit(&mut self) -> Result<Destination, ControllerError> {
        self.notice = None;
        let request = match self.form.validate() {
            Ok(request) => {
                self.field_errors = FieldErrors::new();
                request
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(errors.into());
            }
        };

        let outcome = self.accounts.register(&request, &self.lifetime).await;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }
        match outcome {
            Ok(()) => {
                info!(username = %request.username, "account registered");
                self.form = RegistrationForm::default();
                self.notice = Some(Notice::success("Account created"));
                Ok(Destination::Login)
            }
            Err(err) => {
                let err = ControllerError::request(Action::Register, "", err);
                if !err.is_cancelled() {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                Err(err)
            }
        }
    }
}
