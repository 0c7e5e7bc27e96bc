mod helpers;

use axum::{Router, http::StatusCode, routing::post};
use client::api::auth::Role;
use helpers::{MockApi, auth_routes, memory, titles};
use serde_json::json;
use services::session::{AuthError, Session, SessionManager, SignupForm};
use std::sync::{
    Arc,
    atomic::{AtomicBool, Ordering},
};
use util::notify::NotificationCenter;
use util::storage::{LocalStorage, MemoryStorage, SharedStorage, StorageError};

/// Memory store whose token writes fail while `full` is set.
#[derive(Default)]
struct FullDisk {
    items: MemoryStorage,
    full: AtomicBool,
}

impl LocalStorage for FullDisk {
    fn get_item(&self, key: &str) -> Option<String> {
        self.items.get_item(key)
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        if key == "token" && self.full.load(Ordering::SeqCst) {
            return Err(StorageError::Io(std::io::Error::other("disk full")));
        }
        self.items.set_item(key, value)
    }

    fn remove_item(&self, key: &str) -> Result<(), StorageError> {
        self.items.remove_item(key)
    }
}

#[tokio::test]
async fn login_persists_normalized_session_and_token() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let storage = memory();
    let ctx = api.context(storage.clone());

    let session = ctx.session.login("ada@example.com", "secret1").await.unwrap();

    let expected = Session {
        id: "u1".into(),
        name: "Ada Obi".into(),
        email: "ada@example.com".into(),
        role: Role::User,
        is_admin: false,
    };
    assert_eq!(session, expected);
    assert_eq!(ctx.session.session(), Some(expected.clone()));
    assert!(ctx.session.is_authenticated());

    let stored: Session = serde_json::from_str(&storage.get_item("vividstream_user").unwrap()).unwrap();
    assert_eq!(stored, expected);
    assert_eq!(storage.get_item("token").as_deref(), Some("jwt-u1"));
    assert_eq!(ctx.session.token().as_deref(), Some("jwt-u1"));
}

#[tokio::test]
async fn rejected_login_surfaces_message_and_keeps_prior_state() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let storage = memory();
    let ctx = api.context(storage.clone());
    ctx.session.login("ada@example.com", "secret1").await.unwrap();
    let before = ctx.session.session();

    let err = ctx.session.login("ada@example.com", "wrong").await.unwrap_err();

    assert_eq!(
        err,
        AuthError::Rejected {
            message: "Invalid email or password".into()
        }
    );
    assert_eq!(ctx.session.session(), before);
    assert_eq!(storage.get_item("token").as_deref(), Some("jwt-u1"));
    let last = ctx.notifications.last().await.unwrap();
    assert!(last.is_error());
    assert_eq!(last.title, "Invalid email or password");
}

#[tokio::test]
async fn rejection_without_message_uses_fallback() {
    let api = MockApi::spawn(Router::new().route(
        "/users/login-user",
        post(|| async { StatusCode::INTERNAL_SERVER_ERROR }),
    ))
    .await;
    let ctx = api.context(memory());

    let err = ctx.session.login("ada@example.com", "secret1").await.unwrap_err();
    assert_eq!(err.to_string(), "Login failed");
    assert!(!ctx.session.is_authenticated());
}

#[tokio::test]
async fn blank_credentials_make_no_request() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let ctx = api.context(memory());

    let err = ctx.session.login("  ", "secret1").await.unwrap_err();
    assert!(matches!(err, AuthError::Validation(_)));
    assert!(api.calls().is_empty());
}

#[tokio::test]
async fn unreachable_server_is_network_error() {
    let api = MockApi::spawn(Router::new()).await;
    let ctx = api.context(memory());
    drop(api);
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let err = ctx.session.login("ada@example.com", "secret1").await.unwrap_err();
    assert_eq!(
        err,
        AuthError::Network("Network error. Please check your connection.".into())
    );
}

#[tokio::test]
async fn non_json_success_is_network_error() {
    let routes = Router::new().route("/users/login-user", post(|| async { "<html>oops</html>" }));
    let api = MockApi::spawn(routes).await;
    let storage = memory();
    let ctx = api.context(storage.clone());

    let err = ctx.session.login("ada@example.com", "secret1").await.unwrap_err();
    assert_eq!(
        err,
        AuthError::Network("Network error. Please check your connection.".into())
    );
    assert!(!ctx.session.is_authenticated());
    assert!(storage.get_item("token").is_none());
}

#[tokio::test]
async fn failed_token_write_leaves_no_half_session() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let store = Arc::new(FullDisk::default());
    store.full.store(true, Ordering::SeqCst);
    let ctx = api.context(store.clone() as SharedStorage);

    let err = ctx.session.login("ada@example.com", "secret1").await.unwrap_err();
    assert!(matches!(err, AuthError::Storage(_)));
    assert!(!ctx.session.is_authenticated());
    assert!(store.get_item("vividstream_user").is_none());
    assert!(store.get_item("token").is_none());

    let reopened = SessionManager::new(ctx.api.clone(), NotificationCenter::new(), "vividstream_user");
    assert!(reopened.session().is_none());
}

#[tokio::test]
async fn failed_relogin_keeps_the_previous_session_on_disk() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let store = Arc::new(FullDisk::default());
    let ctx = api.context(store.clone() as SharedStorage);
    ctx.session.login("ada@example.com", "secret1").await.unwrap();
    let before = store.get_item("vividstream_user");

    store.full.store(true, Ordering::SeqCst);
    let err = ctx.session.login("ada@example.com", "secret1").await.unwrap_err();

    assert!(matches!(err, AuthError::Storage(_)));
    assert_eq!(store.get_item("vividstream_user"), before);
    assert_eq!(store.get_item("token").as_deref(), Some("jwt-u1"));
}

#[tokio::test]
async fn logout_clears_everything_even_when_server_fails() {
    let routes = auth_routes("user").route(
        "/users/logout",
        post(|| async { (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(json!({"message": "down"}))) }),
    );
    let api = MockApi::spawn(routes).await;
    let storage = memory();
    let ctx = api.context(storage.clone());
    ctx.session.login("ada@example.com", "secret1").await.unwrap();

    let mut watcher = ctx.session.subscribe();
    ctx.session.logout().await;

    assert!(!ctx.session.is_authenticated());
    assert!(storage.get_item("vividstream_user").is_none());
    assert!(storage.get_item("token").is_none());
    assert!(watcher.has_changed().unwrap());
    assert!(watcher.borrow_and_update().is_none());

    let logout = &api.calls_to("/users/logout")[0];
    assert_eq!(logout.authorization.as_deref(), Some("Bearer jwt-u1"));
}

#[tokio::test]
async fn logout_without_token_makes_no_request() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let ctx = api.context(memory());

    ctx.session.logout().await;
    assert!(api.calls_to("/users/logout").is_empty());
}

#[tokio::test]
async fn session_is_restored_from_storage_without_network() {
    let api = MockApi::spawn(auth_routes("admin")).await;
    let storage = memory();
    let ctx = api.context(storage.clone());
    let original = ctx.session.login("ada@example.com", "secret1").await.unwrap();
    let calls_before = api.calls().len();

    let restored = SessionManager::new(ctx.api.clone(), NotificationCenter::new(), "vividstream_user");

    assert_eq!(restored.session(), Some(original));
    assert!(restored.session().unwrap().is_admin);
    assert_eq!(api.calls().len(), calls_before);
}

#[tokio::test]
async fn corrupt_stored_session_is_discarded() {
    let api = MockApi::spawn(Router::new()).await;
    let storage = memory();
    storage.set_item("vividstream_user", "{not json").unwrap();

    let ctx = api.context(storage.clone());

    assert!(!ctx.session.is_authenticated());
    assert!(storage.get_item("vividstream_user").is_none());
}

#[tokio::test]
async fn signup_validates_then_persists_like_login() {
    let api = MockApi::spawn(auth_routes("user")).await;
    let storage = memory();
    let ctx = api.context(storage.clone());

    let mismatched = SignupForm {
        name: "Grace".into(),
        email: "grace@example.com".into(),
        password: "secret1".into(),
        confirm_password: "secret2".into(),
        role: Role::Receptionist,
    };
    let err = ctx.session.signup(mismatched.clone()).await.unwrap_err();
    assert_eq!(err, AuthError::Validation("Passwords do not match".into()));
    assert!(api.calls().is_empty());

    let form = SignupForm {
        confirm_password: "secret1".into(),
        ..mismatched
    };
    let session = ctx.session.signup(form).await.unwrap();

    assert_eq!(session.role, Role::Receptionist);
    assert_eq!(session.name, "Grace");
    assert_eq!(storage.get_item("token").as_deref(), Some("jwt-u2"));

    let body = api.calls_to("/users/register-user")[0].json();
    assert_eq!(
        body,
        json!({
            "fullName": "Grace",
            "email": "grace@example.com",
            "password": "secret1",
            "confirmPassword": "secret1",
            "role": "receptionist"
        })
    );
    assert!(titles(&ctx.notifications.history().await).contains(&"Account created successfully!".to_string()));
}
