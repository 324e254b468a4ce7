//! Registration and login against the real Argon2 hasher and JWT provider.

use std::sync::Arc;

use auth_adapters::Argon2Hasher;
use domains::{Credentials, DomainError, Registration, Role};
use integration_tests::Harness;

fn registration(username: &str, email: &str) -> Registration {
    Registration {
        username: username.into(),
        email: email.into(),
        password: "correct horse".into(),
    }
}

#[tokio::test]
async fn register_login_and_authenticate() {
    let h = Harness::with_hasher(Arc::new(Argon2Hasher::new()));
    let auth = &h.services.auth;

    let session = auth.register(registration("nova", "Nova@Example.com")).await.unwrap();
    assert_eq!(session.user.role, Role::Registered);
    assert_eq!(session.user.email, "nova@example.com");
    assert!(session.user.password_hash.starts_with("$argon2"));

    let login = auth
        .login(Credentials {
            email: "nova@example.com".into(),
            password: "correct horse".into(),
        })
        .await
        .unwrap();
    assert_eq!(login.user.id, session.user.id);

    let (caller, user) = auth.authenticate(&login.token).await.unwrap();
    assert_eq!(caller.user_id, session.user.id);
    assert_eq!(user.username, "nova");

    let err = auth
        .login(Credentials {
            email: "nova@example.com".into(),
            password: "wrong".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
}

#[tokio::test]
async fn duplicate_identity_is_a_conflict() {
    let h = Harness::new();
    let auth = &h.services.auth;
    auth.register(registration("nova", "nova@example.com")).await.unwrap();

    let same_email = auth.register(registration("other", "NOVA@example.com")).await;
    assert!(matches!(same_email, Err(DomainError::Conflict(_))));
    let same_name = auth.register(registration("nova", "else@example.com")).await;
    assert!(matches!(same_name, Err(DomainError::Conflict(_))));
}

#[tokio::test]
async fn incomplete_registration_is_invalid() {
    let h = Harness::new();
    let err = h
        .services
        .auth
        .register(Registration {
            username: "nova".into(),
            email: "  ".into(),
            password: "pw".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));
}

#[tokio::test]
async fn admin_accounts_come_from_create_user() {
    let h = Harness::new();
    let admin = h
        .services
        .auth
        .create_user(registration("root", "root@example.com"), Role::Admin)
        .await
        .unwrap();
    let session = h
        .services
        .auth
        .login(Credentials {
            email: "root@example.com".into(),
            password: "correct horse".into(),
        })
        .await
        .unwrap();
    let (caller, _) = h.services.auth.authenticate(&session.token).await.unwrap();
    assert_eq!(caller.user_id, admin.id);
    assert!(caller.is_admin());
}

#[tokio::test]
async fn bogus_token_is_rejected() {
    let h = Harness::new();
    let err = h.services.auth.authenticate("not-a-token").await.unwrap_err();
    assert!(matches!(err, DomainError::Authentication(_)));
}
