use std::{collections::BTreeMap, fmt, sync::LazyLock};

use regex::Regex;

use crate::{
    errors::{AppError, AppResult},
    form::RequestForm,
};

// `\d` would also match non-ASCII digits in the regex crate
static TEXT_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Za-z\s]*$").unwrap());
static DIGITS_ONLY: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]*$").unwrap());
static PHONE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]{10}$").unwrap());
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());
// the sign-in screen has always been more lenient than the rest
static LOGIN_EMAIL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\S+@\S+\.\S+$").unwrap());

pub const PHONE_LENGTH: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Name,
    Email,
    Phone,
    Title,
    EnquiryType,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name => write!(f, "name"),
            Self::Email => write!(f, "email"),
            Self::Phone => write!(f, "phone"),
            Self::Title => write!(f, "title"),
            Self::EnquiryType => write!(f, "enquiryType"),
        }
    }
}

/// Per-field error messages. A field missing from the map has no error.
pub type FieldErrors = BTreeMap<Field, &'static str>;

pub fn is_text_only(s: &str) -> bool {
    TEXT_ONLY.is_match(s)
}

pub fn is_valid_email(s: &str) -> bool {
    EMAIL.is_match(s)
}

pub fn is_valid_phone(s: &str) -> bool {
    PHONE.is_match(s)
}

/// Keystroke filter for the phone field; see [`is_valid_phone`] for the submit gate.
pub fn is_digits_only(s: &str) -> bool {
    DIGITS_ONLY.is_match(s)
}

fn is_blank(s: &str) -> bool {
    s.trim().is_empty()
}

fn check_text(value: &str, required: &'static str, letters: &'static str) -> Option<&'static str> {
    if is_blank(value) {
        Some(required)
    } else if !is_text_only(value) {
        Some(letters)
    } else {
        None
    }
}

/// Submit-time gate. Returns an empty map iff the form may be sent.
///
/// Values are checked as typed: `enquiry_type` is only trimmed later, when the
/// outgoing payload is built.
pub fn validate(form: &RequestForm) -> FieldErrors {
    let mut errors = FieldErrors::new();

    if let Some(e) = check_text(
        &form.name,
        "Name is required",
        "Name should only contain letters",
    ) {
        errors.insert(Field::Name, e);
    }

    if is_blank(&form.email) {
        errors.insert(Field::Email, "Email is required");
    } else if !is_valid_email(&form.email) {
        errors.insert(Field::Email, "Please enter a valid email address");
    }

    if is_blank(&form.phone) {
        errors.insert(Field::Phone, "Phone number is required");
    } else if !is_valid_phone(&form.phone) {
        errors.insert(Field::Phone, "Please enter a valid 10-digit phone number");
    }

    if let Some(e) = check_text(
        &form.title,
        "Title is required",
        "Title should only contain letters",
    ) {
        errors.insert(Field::Title, e);
    }

    if let Some(e) = check_text(
        &form.enquiry_type,
        "Enquiry type is required",
        "Enquiry type should only contain letters",
    ) {
        errors.insert(Field::EnquiryType, e);
    }

    errors
}

pub fn check_login(email: &str, password: &str) -> AppResult<()> {
    if email.is_empty() || password.is_empty() {
        return Err(AppError::InvalidInput("Email and password required"));
    }

    if !LOGIN_EMAIL.is_match(email) {
        return Err(AppError::InvalidEmail("Please enter a valid email address."));
    }

    Ok(())
}

pub fn check_signup(name: &str, email: &str, phone: &str, password: &str) -> AppResult<()> {
    if [name, phone, email, password].iter().any(|s| s.is_empty()) {
        return Err(AppError::InvalidInput("All fields are required"));
    }

    if !is_valid_email(email) {
        return Err(AppError::InvalidEmail("Please enter a valid email address."));
    }

    Ok(())
}
