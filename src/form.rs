use crate::validation::{self, Field, FieldErrors, PHONE_LENGTH};

pub const PHOTO_FILE_NAME: &str = "camera.jpg";
pub const PHOTO_MIME_TYPE: &str = "image/jpeg";
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// The single optional file sent along with a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Attachment {
    /// Camera capture. Always sent as `camera.jpg`, whatever the real format.
    Photo { uri: String },
    /// File picker result.
    Document {
        uri: String,
        name: String,
        mime_type: String,
    },
}

impl Attachment {
    pub fn photo(uri: impl Into<String>) -> Self {
        Self::Photo { uri: uri.into() }
    }

    pub fn document(uri: impl Into<String>, name: impl Into<String>, mime_type: Option<String>) -> Self {
        Self::Document {
            uri: uri.into(),
            name: name.into(),
            mime_type: mime_type
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_owned()),
        }
    }

    pub fn uri(&self) -> &str {
        match self {
            Self::Photo { uri } | Self::Document { uri, .. } => uri,
        }
    }

    pub fn file_name(&self) -> &str {
        match self {
            Self::Photo { .. } => PHOTO_FILE_NAME,
            Self::Document { name, .. } => name,
        }
    }

    pub fn mime_type(&self) -> &str {
        match self {
            Self::Photo { .. } => PHOTO_MIME_TYPE,
            Self::Document { mime_type, .. } => mime_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub title: String,
    pub enquiry_type: String,
    pub attachment: Option<Attachment>,
}

/// A form that passed [`validation::validate`]. Only these can be submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedForm(RequestForm);

impl ValidatedForm {
    pub fn new(form: RequestForm) -> Result<Self, FieldErrors> {
        let errors = validation::validate(&form);

        if errors.is_empty() {
            Ok(Self(form))
        } else {
            Err(errors)
        }
    }

    pub fn form(&self) -> &RequestForm {
        &self.0
    }

    pub fn attachment(&self) -> Option<&Attachment> {
        self.0.attachment.as_ref()
    }
}

/// A single keystroke-level change to one text field, carrying the full new value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldEdit {
    Name(String),
    Email(String),
    Phone(String),
    Title(String),
    EnquiryType(String),
}

impl FieldEdit {
    pub fn field(&self) -> Field {
        match self {
            Self::Name(..) => Field::Name,
            Self::Email(..) => Field::Email,
            Self::Phone(..) => Field::Phone,
            Self::Title(..) => Field::Title,
            Self::EnquiryType(..) => Field::EnquiryType,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Name(v) | Self::Email(v) | Self::Phone(v) | Self::Title(v) | Self::EnquiryType(v) => v,
        }
    }

    /// Input filter. Looser than the submit gate: partial values pass.
    pub fn is_accepted(&self) -> bool {
        match self {
            Self::Name(v) | Self::Title(v) | Self::EnquiryType(v) => validation::is_text_only(v),
            Self::Phone(v) => validation::is_digits_only(v) && v.len() <= PHONE_LENGTH,
            Self::Email(..) => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormAction {
    Edit(FieldEdit),
    /// Replaces any attachment already present.
    Attach(Attachment),
    Detach,
    /// Records the submit-time errors of the current values.
    Validate,
    Reset,
}

/// Immutable snapshot of a request form and its visible errors.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormState {
    form: RequestForm,
    errors: FieldErrors,
}

impl FormState {
    pub fn form(&self) -> &RequestForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    #[must_use]
    pub fn apply(self, action: FormAction) -> Self {
        let Self { mut form, mut errors } = self;

        match action {
            FormAction::Edit(edit) => {
                if !edit.is_accepted() {
                    return Self { form, errors };
                }

                errors.remove(&edit.field());

                match edit {
                    FieldEdit::Name(v) => form.name = v,
                    FieldEdit::Email(v) => form.email = v,
                    FieldEdit::Phone(v) => form.phone = v,
                    FieldEdit::Title(v) => form.title = v,
                    FieldEdit::EnquiryType(v) => form.enquiry_type = v,
                }
            }
            FormAction::Attach(attachment) => form.attachment = Some(attachment),
            FormAction::Detach => form.attachment = None,
            FormAction::Validate => errors = validation::validate(&form),
            FormAction::Reset => return Self::default(),
        }

        Self { form, errors }
    }

    pub fn validated(&self) -> Result<ValidatedForm, FieldErrors> {
        ValidatedForm::new(self.form.clone())
    }
}
