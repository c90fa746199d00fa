//! Edit/Delete Form Controller.
//!
//! ```text
//! Closed -> Loading -> Ready -> Submitting -> Closed | Ready
//!                           -> Deleting   -> Closed | Ready
//! ```

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::forms::Form;
use crate::domain::validation::FieldErrors;
use crate::infra::api::ApiError;
use crate::infra::lifetime::Lifetime;

use super::create::capitalize;
use super::error::{Action, ControllerError};
use super::loader::Reload;
use super::notice::Notice;
use super::resources::{Identified, Resource};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EditState {
    Closed,
    Loading,
    Ready,
    Submitting,
    Deleting,
}

impl EditState {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Closed => "closed",
            Self::Loading => "loading",
            Self::Ready => "ready",
            Self::Submitting => "submitting",
            Self::Deleting => "deleting",
        }
    }
}

/// Proof that the user confirmed deleting one specific resource. Only
/// [`EditController::request_delete`] hands these out.
#[derive(Debug, PartialEq, Eq)]
pub struct DeleteConfirmation {
    id: i64,
}

impl DeleteConfirmation {
    #[must_use]
    pub fn id(&self) -> i64 {
        self.id
    }
}

#[derive(Debug)]
pub struct EditController<R: Resource> {
    resource: R,
    lifetime: Lifetime,
    state: EditState,
    current: Option<R::Item>,
    original: R::Form,
    form: R::Form,
    field_errors: FieldErrors,
    notice: Option<Notice>,
}

impl<R: Resource> EditController<R> {
    pub fn new(resource: R, lifetime: Lifetime) -> Self {
        Self {
            resource,
            lifetime,
            state: EditState::Closed,
            current: None,
            original: R::Form::default(),
            form: R::Form::default(),
            field_errors: FieldErrors::new(),
            notice: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> EditState {
        self.state
    }

    /// The resource as last fetched from the server.
    #[must_use]
    pub fn current(&self) -> Option<&R::Item> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.current.as_ref().map(Identified::id)
    }

    #[must_use]
    pub fn form(&self) -> &R::Form {
        &self.form
    }

    /// The editable form; only available in `Ready`.
    pub fn form_mut(&mut self) -> Option<&mut R::Form> {
        (self.state == EditState::Ready).then_some(&mut self.form)
    }

    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        self.form.changed_fields(&self.original)
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

    /// Fetch the resource's current values and populate the form. A failed
    /// fetch closes the controller again with an error notice.
    pub async fn open(&mut self, id: i64) -> Result<&R::Item, ControllerError> {
        if !matches!(self.state, EditState::Closed | EditState::Ready) {
            return Err(ControllerError::invalid_state("open", self.state.as_str()));
        }
        self.reset();
        self.notice = None;
        self.state = EditState::Loading;

        let outcome = self.resource.fetch(id, &self.lifetime).await;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        match outcome {
            Ok(item) => {
                debug!(resource = R::SINGULAR, id, "edit form ready");
                self.original = R::form_for(&item);
                self.form = self.original.clone();
                self.state = EditState::Ready;
                let item = &*self.current.insert(item);
                Ok(item)
            }
            Err(err) => {
                let err = ControllerError::request(Action::Fetch, R::SINGULAR, err);
                if !err.is_cancelled() {
                    self.notice = Some(Notice::error(err.to_string()));
                }
                self.state = EditState::Closed;
                Err(err)
            }
        }
    }

    /// Validate the edited form and send the update. Success closes the
    /// controller and reloads `owner`; failure returns to `Ready`.
    pub async fn submit<O>(&mut self, owner: &mut O) -> Result<Option<R::Item>, ControllerError>
    where
        O: Reload + ?Sized,
    {
        let id = self.ready_id("submit")?;
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
        debug!(resource = R::SINGULAR, id, changed = ?self.changed_fields(), "submitting update");

        self.state = EditState::Submitting;
        let outcome = self.resource.update(id, &draft, &self.lifetime).await;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        match outcome {
            Ok(updated) => {
                info!(resource = R::SINGULAR, id, "resource updated");
                self.finish(owner, format!("{} updated", capitalize(R::SINGULAR)))
                    .await;
                Ok(updated)
            }
            Err(err) => Err(self.fail(Action::Update, err)),
        }
    }

    /// First step of deletion: hand out a confirmation for the loaded
    /// resource. Nothing is sent yet.
    pub fn request_delete(&self) -> Result<DeleteConfirmation, ControllerError> {
        let id = self.ready_id("delete")?;
        Ok(DeleteConfirmation { id })
    }

    /// Second step of deletion. The confirmation must match the resource
    /// currently loaded.
    pub async fn confirm_delete<O>(
        &mut self,
        confirmation: DeleteConfirmation,
        owner: &mut O,
    ) -> Result<(), ControllerError>
    where
        O: Reload + ?Sized,
    {
        let id = self.ready_id("delete")?;
        if confirmation.id != id {
            return Err(ControllerError::Rejected(format!(
                "confirmation was issued for {} {}, not {id}",
                R::SINGULAR,
                confirmation.id
            )));
        }

        self.state = EditState::Deleting;
        let outcome = self.resource.delete(id, &self.lifetime).await;
        if self.lifetime.is_ended() {
            return Err(ControllerError::Cancelled);
        }

        match outcome {
            Ok(()) => {
                info!(resource = R::SINGULAR, id, "resource deleted");
                self.finish(owner, format!("{} deleted", capitalize(R::SINGULAR)))
                    .await;
                Ok(())
            }
            Err(err) => Err(self.fail(Action::Delete, err)),
        }
    }

    pub fn close(&mut self) {
        self.reset();
        self.state = EditState::Closed;
    }

    fn reset(&mut self) {
        self.current = None;
        self.original = R::Form::default();
        self.form = R::Form::default();
        self.field_errors = FieldErrors::new();
    }

    fn ready_id(&self, action: &'static str) -> Result<i64, ControllerError> {
        match (self.state, self.id()) {
            (EditState::Ready, Some(id)) => Ok(id),
            (state, _) => Err(ControllerError::invalid_state(action, state.as_str())),
        }
    }

    async fn finish<O>(&mut self, owner: &mut O, message: String)
    where
        O: Reload + ?Sized,
    {
        self.notice = Some(Notice::success(message));
        self.close();
        if let Err(err) = owner.reload().await {
            warn!(resource = R::SINGULAR, error = %err, "reload after mutation failed");
        }
    }

    fn fail(&mut self, action: Action, err: ApiError) -> ControllerError {
        let err = ControllerError::request(action, R::SINGULAR, err);
        if !err.is_cancelled() {
            self.notice = Some(Notice::error(err.to_string()));
            self.state = EditState::Ready;
        }
        err
    }
}
