#![deny(clippy::all, clippy::pedantic)]

use entradas_admin::application::error::ControllerError;
use entradas_admin::application::resources::BlogApi;
use entradas_admin::config::{self, LoadError, Settings};
use entradas_admin::domain::error::DomainError;
use entradas_admin::infra::api::{ApiClient, ApiError};
use entradas_admin::infra::error::InfraError;
use entradas_admin::infra::lifetime::Lifetime;
use entradas_admin::session::{FileSessionStore, Session};
use thiserror::Error;

use crate::args::Cli;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Telemetry(#[from] InfraError),
    #[error("password is required (use --password-file or ENTRADAS_PASSWORD)")]
    MissingPassword,
    #[error("failed to read password file: {0}")]
    PasswordFile(std::io::Error),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("refusing to delete {subject} {id} without --yes")]
    ConfirmationRequired { subject: &'static str, id: i64 },
    #[error("not found: {0}")]
    NotFound(String),
    #[error(transparent)]
    Upload(#[from] DomainError),
    #[error(transparent)]
    Api(#[from] ApiError),
    #[error(transparent)]
    Controller(#[from] ControllerError),
    #[error("failed to render output: {0}")]
    Output(String),
}

/// Everything a handler needs: the API bundle, the session it writes to,
/// and the lifetime that Ctrl-C ends.
#[derive(Clone, Debug)]
pub struct Ctx {
    pub api: BlogApi,
    pub lifetime: Lifetime,
}

impl Ctx {
    pub fn new(settings: &Settings) -> Result<Self, CliError> {
        let client = ApiClient::new(settings.api.base_url.as_str())?;
        let session = Session::new(FileSessionStore::new(settings.session.path.clone()));
        Ok(Self::with_parts(client, session))
    }

    pub fn with_parts(client: ApiClient, session: Session) -> Self {
        Self {
            api: BlogApi::new(client, session),
            lifetime: Lifetime::new(),
        }
    }

    /// A fresh child scope for one controller.
    pub fn scope(&self) -> Lifetime {
        self.lifetime.child()
    }
}

pub fn load_settings(cli: &Cli) -> Result<Settings, CliError> {
    Ok(config::load(&cli.config)?)
}
