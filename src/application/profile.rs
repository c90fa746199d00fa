//! The authenticated user's own profile.

use entradas_api_types::Perfil;
use tracing::{debug, info, warn};
use url::Url;

use crate::domain::forms::{Form, ProfileForm};
use crate::domain::lookup::media_url;
use crate::domain::validation::FieldErrors;
use crate::infra::lifetime::Lifetime;

use super::auth::Accounts;
use super::error::{Action, ControllerError};
use super::notice::Notice;

const SUBJECT: &str = "profile";

#[derive(Debug)]
pub struct ProfileController {
    accounts: Accounts,
    lifetime: Lifetime,
    perfil: Option<Perfil>,
    editing: bool,
    saving: bool,
    form: ProfileForm,
    field_errors: FieldErrors,
    notice: Option<Notice>,
}

impl ProfileController {
    #[must_use]
    pub fn new(accounts: Accounts, lifetime: Lifetime) -> Self {
        Self {
            accounts,
            lifetime,
            perfil: None,
            editing: false,
            saving: false,
            form: ProfileForm::default(),
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    /// Fetch the profile and reset the form to its values.
    pub async fn load(&mut self) -> Result<&Perfil, ControllerError> {
        self.fetch(true).await
    }

    async fn fetch(&mut self, announce: bool) -> Result<&Perfil, ControllerError> {
        let outcome = self.accounts.profile(&self.lifetime).await;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }
        match outcome {
            Ok(perfil) => {
                debug!(username = %perfil.username, "profile loaded");
                self.form = ProfileForm::from(&perfil);
                self.field_errors = FieldErrors::new();
                if announce {
                    self.notice = Some(Notice::success("Profile loaded"));
                }
                let perfil = &*self.perfil.insert(perfil);
                Ok(perfil)
            }
            Err(err) => {
                let err = ControllerError::request(Action::Load, SUBJECT, err);
                if !err.is_cancelled() {
                    warn!(error = %err, "profile load failed");
                    self.notice = Some(Notice::error(err.to_string()));
                }
                Err(err)
            }
        }
    }

    #[must_use]
    pub fn perfil(&self) -> Option<&Perfil> {
        self.perfil.as_ref()
    }

    /// Enter edit mode. Requires a loaded profile.
    pub fn begin_edit(&mut self) -> Result<(), ControllerError> {
        let Some(perfil) = &self.perfil else {
            return Err(ControllerError::invalid_state("edit", "unloaded"));
        };
        self.form = ProfileForm::from(perfil);
        self.editing = true;
        Ok(())
    }

    pub fn cancel_edit(&mut self) {
        self.editing = false;
        if let Some(perfil) = &self.perfil {
            self.form = ProfileForm::from(perfil);
        }
        self.field_errors = FieldErrors::new();
    }

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.editing
    }

    #[must_use]
    pub fn is_saving(&self) -> bool {
        self.saving
    }

    #[must_use]
    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    /// The editable form; only available while editing.
    pub fn form_mut(&mut self) -> Option<&mut ProfileForm> {
        self.editing.then_some(&mut self.form)
    }

    #[must_use]
    pub fn field_errors(&self) -> &FieldErrors {
        &self.field_errors
    }

    #[must_use]
    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Avatar resolved against the API base, if the profile has one.
    #[must_use]
    pub fn avatar_url(&self) -> Option<String> {
        let avatar = self.perfil.as_ref()?.avatar.as_deref()?;
        media_url(self.media_base(), avatar)
    }

    fn media_base(&self) -> &Url {
        self.accounts.client().base()
    }

    /// Send the edited profile as multipart and re-read it from the server.
    pub async fn save(&mut self) -> Result<&Perfil, ControllerError> {
        if !self.editing {
            return Err(ControllerError::invalid_state("save", "viewing"));
        }
        let draft = match self.form.validate() {
            Ok(draft) => {
                self.field_errors = FieldErrors::new();
                draft
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                return Err(errors.into());
            }
        };
        debug!(changed = ?self.changed_fields(), "saving profile");

        self.saving = true;
        let outcome = self.accounts.update_profile(&draft, &self.lifetime).await;
        self.saving = false;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        if let Err(err) = outcome {
            let err = ControllerError::request(Action::Update, SUBJECT, err);
            if !err.is_cancelled() {
                self.notice = Some(Notice::error(err.to_string()));
            }
            return Err(err);
        }

        info!("profile updated");
        self.editing = false;
        if self.fetch(false).await.is_err() {
            warn!("profile saved but could not be reloaded");
        }
        self.notice = Some(Notice::success("Profile updated"));
        self.perfil
            .as_ref()
            .ok_or_else(|| ControllerError::invalid_state("save", "unloaded"))
    }

    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        match &self.perfil {
            Some(perfil) => self.form.changed_fields(&ProfileForm::from(perfil)),
            None => Vec::new(),
        }
    }
}
