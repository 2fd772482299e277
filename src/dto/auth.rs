use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize)]
pub struct SignInDto<'v> {
    pub email: &'v str,
    pub password: &'v str,
}

#[derive(Serialize)]
pub struct SignUpDto<'v> {
    pub name: &'v str,
    pub email: &'v str,
    pub phone: &'v str,
    pub password: &'v str,
}

/// Sign-in responses are trusted only as far as the fields actually present.
///
/// Every field is kept as raw JSON so that one oddly typed profile field
/// (a numeric `phone`, say) cannot hide the token. Use [`text`] to read them.
#[derive(Deserialize, Debug, Default)]
#[serde(default)]
pub struct SignInResponseDto {
    pub token: Option<Value>,
    pub id: Option<Value>,
    pub name: Option<Value>,
    pub email: Option<Value>,
    pub phone: Option<Value>,
    pub message: Option<Value>,
}

/// Strings as they are, numbers in their JSON form, anything else dropped.
pub fn text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
