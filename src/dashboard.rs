use log::*;

use crate::{
    attachments::AttachmentPicker,
    errors::{AppError, AppResult},
    form::{Attachment, FieldEdit, FormAction, FormState},
    session::{self, SessionSnapshot},
    storage::KeyValueStore,
    submission::{RequestKind, RequestSubmitter, SubmissionOutcome},
    validation::FieldErrors,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestModal {
    pub kind: RequestKind,
    pub form: FormState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitResult {
    /// Nothing was sent; the form now shows these errors.
    Blocked(FieldErrors),
    Completed(SubmissionOutcome),
}

/// Screen state behind the signed-in landing page.
#[derive(Debug, Default)]
pub struct Dashboard {
    session: SessionSnapshot,
    modal: Option<RequestModal>,
}

impl Dashboard {
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self {
            session: session::load(store),
            modal: None,
        }
    }

    pub fn session(&self) -> &SessionSnapshot {
        &self.session
    }

    pub fn modal(&self) -> Option<&RequestModal> {
        self.modal.as_ref()
    }

    /// Always starts from a blank form.
    pub fn open_modal(&mut self, kind: RequestKind) {
        debug!("Opening {kind} form");

        self.modal = Some(RequestModal {
            kind,
            form: FormState::default(),
        });
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
    }

    fn update(&mut self, action: FormAction) {
        if let Some(modal) = self.modal.as_mut() {
            modal.form = std::mem::take(&mut modal.form).apply(action);
        }
    }

    /// Returns whether the edit got through the field's input filter.
    pub fn edit(&mut self, edit: FieldEdit) -> bool {
        if self.modal.is_none() || !edit.is_accepted() {
            return false;
        }

        self.update(FormAction::Edit(edit));
        true
    }

    pub fn take_photo(&mut self, picker: &dyn AttachmentPicker) -> AppResult<()> {
        if let Some(uri) = picker.capture_photo()? {
            self.update(FormAction::Attach(Attachment::photo(uri)));
        }

        Ok(())
    }

    pub fn pick_document(&mut self, picker: &dyn AttachmentPicker) -> AppResult<()> {
        if let Some(doc) = picker.pick_document()? {
            self.update(FormAction::Attach(doc.into()));
        }

        Ok(())
    }

    pub fn remove_attachment(&mut self) {
        self.update(FormAction::Detach);
    }

    pub async fn submit(&mut self, submitter: &RequestSubmitter) -> AppResult<SubmitResult> {
        let Some(modal) = self.modal.as_mut() else {
            return Err(AppError::InvalidInput("No request form is open"));
        };

        modal.form = std::mem::take(&mut modal.form).apply(FormAction::Validate);

        let validated = match modal.form.validated() {
            Ok(validated) => validated,
            Err(errors) => return Ok(SubmitResult::Blocked(errors)),
        };

        let kind = modal.kind;
        let outcome = submitter.submit(kind, &validated).await?;

        if kind.closes_after_submit() {
            self.close_modal();
        }

        Ok(SubmitResult::Completed(outcome))
    }

    /// Clears the stored session; navigating away is up to the caller.
    pub fn logout(self, store: &dyn KeyValueStore) -> AppResult<()> {
        crate::auth::logout(store)
    }
}
