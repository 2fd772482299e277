use log::*;
use serde::{Deserialize, Serialize};

use crate::{
    errors::{AppError, AppResult},
    storage::KeyValueStore,
};

pub const USER_TOKEN_KEY: &str = "userToken";
pub const USER_DATA_KEY: &str = "userData";

/// Stored under [`USER_DATA_KEY`] as a JSON string.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct UserProfile {
    // whatever the server uses; numbers so far
    pub id: Option<serde_json::Value>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub profile: UserProfile,
}

/// Whatever could be read back from storage. Missing pieces stay empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SessionSnapshot {
    pub token: Option<String>,
    pub profile: UserProfile,
}

impl SessionSnapshot {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

pub fn save(session: &Session, store: &dyn KeyValueStore) -> AppResult<()> {
    let profile =
        serde_json::to_string(&session.profile).map_err(AppError::StateSerializationError)?;

    store.set(USER_TOKEN_KEY, &session.token)?;
    store.set(USER_DATA_KEY, &profile)?;

    Ok(())
}

/// Never fails: unreadable state is logged and treated as absent, and no
/// re-authentication is forced here.
pub fn load(store: &dyn KeyValueStore) -> SessionSnapshot {
    let token = store.get(USER_TOKEN_KEY).unwrap_or_else(|e| {
        error!("Failed to load user token from storage: {e}");
        None
    });

    let profile = match store.get(USER_DATA_KEY) {
        Ok(Some(raw)) => serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Ignoring malformed stored user data: {e}");
            UserProfile::default()
        }),
        Ok(None) => UserProfile::default(),
        Err(e) => {
            error!("Failed to load user data from storage: {e}");
            UserProfile::default()
        }
    };

    debug!("Loaded stored session (token present: {})", token.is_some());

    SessionSnapshot { token, profile }
}

pub fn clear(store: &dyn KeyValueStore) -> AppResult<()> {
    store.remove(USER_TOKEN_KEY)?;
    store.remove(USER_DATA_KEY)?;

    debug!("Cleared stored session");

    Ok(())
}
