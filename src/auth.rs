use log::*;

use crate::{
    api::ApiClient,
    dto::auth::{text, SignInDto, SignUpDto},
    errors::{AppError, AppResult},
    session::{self, Session, UserProfile},
    storage::KeyValueStore,
    validation,
};

pub const LOGIN_SUCCESS: &str = "Login successful!";

/// Signs in and persists the resulting session. Nothing is stored unless the
/// server hands back a token.
pub async fn login(
    email: &str,
    password: &str,
    client: &ApiClient,
    store: &dyn KeyValueStore,
) -> AppResult<Session> {
    validation::check_login(email, password)?;

    let response = client
        .sign_in(&SignInDto { email, password })
        .await
        .map_err(|e| {
            error!("Login error: {e}");
            AppError::LoginFailed(
                e.server_message()
                    .unwrap_or_else(|| "Login failed. Please try again.".to_owned()),
            )
        })?;

    let Some(token) = text(response.token).filter(|t| !t.is_empty()) else {
        return Err(AppError::LoginFailed(
            text(response.message).unwrap_or_else(|| "Login failed.".to_owned()),
        ));
    };

    let session = Session {
        token,
        profile: UserProfile {
            id: response.id,
            name: text(response.name),
            email: text(response.email),
            phone: text(response.phone),
        },
    };

    session::save(&session, store)?;

    info!("Logged in as {email}");

    Ok(session)
}

pub async fn signup(
    name: &str,
    email: &str,
    phone: &str,
    password: &str,
    client: &ApiClient,
) -> AppResult<()> {
    validation::check_signup(name, email, phone, password)?;

    let body = client
        .sign_up(&SignUpDto {
            name,
            email,
            phone,
            password,
        })
        .await
        .map_err(|e| {
            error!("Signup error: {e}");
            AppError::SignupFailed(e.server_message().unwrap_or_else(|| e.describe()))
        })?;

    if !is_truthy(&body) {
        warn!("Sign-up accepted with an empty body");
        return Err(AppError::SignupFailed("Sign-up failed.".to_owned()));
    }

    info!("Registered {email}");

    Ok(())
}

/// Forgets the stored session. Callers navigate away on their own.
pub fn logout(store: &dyn KeyValueStore) -> AppResult<()> {
    session::clear(store)
}

fn is_truthy(value: &serde_json::Value) -> bool {
    use serde_json::Value;

    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|n| n != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(..) | Value::Object(..) => true,
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;
    use serde_json::json;

    use super::*;
    use crate::{
        session::{USER_DATA_KEY, USER_TOKEN_KEY},
        storage::MemoryStore,
    };

    fn client(server: &MockServer) -> ApiClient {
        ApiClient::new(&server.base_url(), None).unwrap()
    }

    #[tokio::test]
    async fn successful_login_persists_session() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-in");
                then.status(200).json_body(json!({
                    "token": "t0k3n",
                    "id": 7,
                    "name": "Jane Doe",
                    "email": "jane@x.com",
                    "phone": "9876543210"
                }));
            })
            .await;

        let store = MemoryStore::default();
        let session = login("jane@x.com", "pw", &client(&server), &store)
            .await
            .unwrap();

        assert_eq!(session.token, "t0k3n");
        assert_eq!(store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("t0k3n"));

        let stored = session::load(&store);
        assert_eq!(stored.profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(stored.profile.phone.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn login_accepts_numeric_phone() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-in");
                then.status(200).body(
                    r#"{"token":"t0k3n","id":7,"name":"Jane Doe","email":"jane@x.com","phone":9876543210}"#,
                );
            })
            .await;

        let store = MemoryStore::default();
        let session = login("jane@x.com", "pw", &client(&server), &store)
            .await
            .unwrap();

        assert_eq!(session.token, "t0k3n");
        assert_eq!(store.get(USER_TOKEN_KEY).unwrap().as_deref(), Some("t0k3n"));

        let stored = session::load(&store);
        assert!(stored.is_authenticated());
        assert_eq!(stored.profile.name.as_deref(), Some("Jane Doe"));
        assert_eq!(stored.profile.phone.as_deref(), Some("9876543210"));
    }

    #[tokio::test]
    async fn login_without_token_stores_nothing() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-in");
                then.status(200).json_body(json!({"message": "Invalid credentials"}));
            })
            .await;

        let store = MemoryStore::default();
        let err = login("jane@x.com", "wrong", &client(&server), &store)
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.title(), "Login Failed");
        assert_eq!(store.get(USER_TOKEN_KEY).unwrap(), None);
        assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn login_transport_failure_messages() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-in");
                then.status(401).json_body(json!({"message": "User not found"}));
            })
            .await;

        let store = MemoryStore::default();
        let err = login("jane@x.com", "pw", &client(&server), &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "User not found");

        mock.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-in");
                then.status(503);
            })
            .await;

        let err = login("jane@x.com", "pw", &client(&server), &store)
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Login failed. Please try again.");
    }

    #[tokio::test]
    async fn invalid_login_input_never_reaches_the_server() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.any_request();
                then.status(200);
            })
            .await;

        let store = MemoryStore::default();
        let err = login("", "pw", &client(&server), &store).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(..)));

        let err = login("jane", "pw", &client(&server), &store).await.unwrap_err();
        assert!(matches!(err, AppError::InvalidEmail(..)));

        mock.assert_hits_async(0).await;
    }

    #[tokio::test]
    async fn signup_posts_profile_and_password() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-up").json_body(json!({
                    "name": "Jane Doe",
                    "email": "jane@x.com",
                    "phone": "9876543210",
                    "password": "pw"
                }));
                then.status(201).json_body(json!({"id": 7}));
            })
            .await;

        signup("Jane Doe", "jane@x.com", "9876543210", "pw", &client(&server))
            .await
            .unwrap();

        mock.assert_async().await;
    }

    #[tokio::test]
    async fn signup_failure_prefers_server_message() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-up");
                then.status(409).json_body(json!({"message": "Email already registered"}));
            })
            .await;

        let err = signup("Jane", "jane@x.com", "9876543210", "pw", &client(&server))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Email already registered");

        mock.delete_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/iisc/auth/sign-up");
                then.status(500);
            })
            .await;

        let err = signup("Jane", "jane@x.com", "9876543210", "pw", &client(&server))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "Request failed with status code 500");
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(is_truthy(&json!({})));
        assert!(is_truthy(&json!([])));
        assert!(is_truthy(&json!("ok")));
    }

    #[test]
    fn logout_clears_stored_session() {
        let store = MemoryStore::default();
        store.set(USER_TOKEN_KEY, "t0k3n").unwrap();
        store.set(USER_DATA_KEY, "{}").unwrap();

        logout(&store).unwrap();

        assert!(!session::load(&store).is_authenticated());
        assert_eq!(store.get(USER_DATA_KEY).unwrap(), None);
    }
}
