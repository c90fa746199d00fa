//! Create Form Controller.

use tracing::{info, warn};

use crate::domain::forms::Form;
use crate::domain::validation::FieldErrors;
use crate::infra::lifetime::Lifetime;

use super::error::{Action, ControllerError};
use super::loader::Reload;
use super::notice::Notice;
use super::resources::Resource;

#[derive(Debug)]
pub struct CreateController<R: Resource> {
    resource: R,
    lifetime: Lifetime,
    open: bool,
    submitting: bool,
    form: R::Form,
    field_errors: FieldErrors,
    notice: Option<Notice>,
}

impl<R: Resource> CreateController<R> {
    pub fn new(resource: R, lifetime: Lifetime) -> Self {
        Self {
            resource,
            lifetime,
            open: false,
            submitting: false,
            form: R::Form::default(),
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    pub fn open(&mut self) {
        self.open = true;
        self.notice = None;
    }

    /// Close and reset the form to its defaults.
    pub fn close(&mut self) {
        self.open = false;
        self.form = R::Form::default();
        self.field_errors = FieldErrors::new();
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    #[must_use]
    pub fn form(&self) -> &R::Form {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut R::Form {
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

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// Run the field rules, recording the errors inline.
    pub fn validate(&mut self) -> Result<<R::Form as Form>::Output, FieldErrors> {
        match self.form.validate() {
            Ok(draft) => {
                self.field_errors = FieldErrors::new();
                Ok(draft)
            }
            Err(errors) => {
                self.field_errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Validate and submit. Invalid input never reaches the network. On
    /// success the form closes and `owner` reloads; on failure the form stays
    /// open and populated.
    pub async fn submit<O>(&mut self, owner: &mut O) -> Result<Option<R::Item>, ControllerError>
    where
        O: Reload + ?Sized,
    {
        if !self.open {
            return Err(ControllerError::invalid_state("submit", "closed"));
        }
        let draft = self.validate()?;

        self.submitting = true;
        let outcome = self.resource.create(&draft, &self.lifetime).await;
        self.submitting = false;

        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        match outcome {
            Ok(created) => {
                info!(resource = R::SINGULAR, "resource created");
                self.notice = Some(Notice::success(format!("{} created", capitalize(R::SINGULAR))));
                self.close();
                if let Err(err) = owner.reload().await {
                    warn!(resource = R::SINGULAR, error = %err, "reload after create failed");
                }
                Ok(created)
            }
            Err(err) => {
                let err = ControllerError::request(Action::Create, R::SINGULAR, err);
                if !err.is_cancelled() {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                Err(err)
            }
        }
    }
}

pub(crate) fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
