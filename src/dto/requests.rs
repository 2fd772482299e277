use serde::{Deserialize, Serialize};

/// `json` part of a complaint submission.
#[derive(Serialize, Debug)]
pub struct ComplaintJsonDto<'v> {
    pub name: &'v str,
    pub email: &'v str,
    pub phone: &'v str,
    pub title: &'v str,
    #[serde(rename = "enquiryType")]
    pub enquiry_type: &'v str,
}

/// `json` part of a support submission.
///
/// The key is spelled the way the support endpoint expects it, and always
/// carries [`SUPPORT_ENQUIRY_TYPE`] rather than what the user typed.
#[derive(Serialize, Debug)]
pub struct SupportJsonDto<'v> {
    pub name: &'v str,
    pub email: &'v str,
    pub phone: &'v str,
    pub title: &'v str,
    pub enquertytype: &'static str,
}

pub const SUPPORT_ENQUIRY_TYPE: &str = "Support";

/// Body shape shared by success and error responses of the intake endpoints.
#[derive(Deserialize, Debug, Default)]
pub struct MessageDto {
    #[serde(default)]
    pub message: Option<String>,
}
