use tracing::{info, warn};
use uuid::Uuid;

use super::dto::{LoginRequest, RegisterRequest};
use super::repo_types::{NewUser, User};
use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Validates, hashes the password and persists a new user.
pub async fn register(state: &AppState, req: RegisterRequest) -> AppResult<User> {
    let reg = req.validate().map_err(AppError::Validation)?;

    let password_hash = state.passwords.hash_blocking(reg.password).await?;

    let user = state
        .store
        .create(NewUser {
            first_name: reg.first_name,
            last_name: reg.last_name,
            document_type: reg.document_type,
            document: reg.document,
            email: reg.email,
            password_hash,
            role: reg.role,
        })
        .await?;

    info!(user_id = %user.id, role = %user.role, "user registered");
    Ok(user)
}

/// Exchanges email/password for a bearer token. Unknown email and wrong
/// password are indistinguishable to the caller.
pub async fn login(state: &AppState, req: LoginRequest) -> AppResult<String> {
    let (email, password) = req.validate().map_err(AppError::Validation)?;

    let Some(user) = state.store.find_by_email(&email).await? else {
        state.passwords.verify_dummy(password).await;
        warn!("login rejected: unknown email");
        return Err(AppError::InvalidCredentials);
    };

    let ok = state
        .passwords
        .verify_blocking(password, user.password_hash.clone())
        .await?;
    if !ok {
        warn!(user_id = %user.id, "login rejected: password mismatch");
        return Err(AppError::InvalidCredentials);
    }

    let token = state.jwt.issue(user.id)?;
    info!(user_id = %user.id, "user logged in");
    Ok(token)
}

pub async fn get_user(state: &AppState, id: Uuid) -> AppResult<User> {
    state.store.find_by_id(id).await?.ok_or(AppError::NotFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::password::cheap_hasher;

    fn ana() -> RegisterRequest {
        RegisterRequest {
            first_name: Some("Ana".into()),
            last_name: Some("Lee".into()),
            document_type: Some("ID".into()),
            document: Some("123".into()),
            email: Some("a@x.com".into()),
            password: Some("hunter2".into()),
            role: None,
        }
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[tokio::test]
    async fn register_stores_hash_and_default_role() {
        let state = AppState::fake();
        let user = register(&state, ana()).await.expect("register");

        assert_eq!(user.role, "guest");
        assert_ne!(user.password_hash, "hunter2");
        assert!(cheap_hasher()
            .verify_password("hunter2", &user.password_hash)
            .unwrap());

        let stored = state.store.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(stored.email, "a@x.com");
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let state = AppState::fake();
        register(&state, ana()).await.expect("first register");

        let second = RegisterRequest {
            email: Some("A@X.COM".into()),
            first_name: Some("Other".into()),
            ..ana()
        };
        let err = register(&state, second).await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let stored = state.store.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(stored.first_name, "Ana");
    }

    #[tokio::test]
    async fn invalid_payload_is_a_validation_error() {
        let state = AppState::fake();
        let err = register(
            &state,
            RegisterRequest {
                email: None,
                ..ana()
            },
        )
        .await
        .unwrap_err();
        match err {
            AppError::Validation(fields) => assert_eq!(fields[0].field, "email"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn login_issues_token_for_registered_user() {
        let state = AppState::fake();
        let user = register(&state, ana()).await.unwrap();

        let token = login(&state, login_req("a@x.com", "hunter2")).await.expect("login");
        let claims = state.jwt.verify(&token).expect("token verifies");
        assert_eq!(claims.user_id, user.id);
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_look_the_same() {
        let state = AppState::fake();
        register(&state, ana()).await.unwrap();

        let wrong = login(&state, login_req("a@x.com", "wrong")).await.unwrap_err();
        let unknown = login(&state, login_req("nobody@x.com", "hunter2"))
            .await
            .unwrap_err();

        assert!(matches!(wrong, AppError::InvalidCredentials));
        assert!(matches!(unknown, AppError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn get_user_reports_missing_record() {
        let state = AppState::fake();
        let err = get_user(&state, Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));

        let user = register(&state, ana()).await.unwrap();
        assert_eq!(get_user(&state, user.id).await.unwrap().id, user.id);
    }
}
