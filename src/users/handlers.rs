use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use super::{
    dto::{LoginRequest, RegisterRequest, TokenResponse, UserEnvelope},
    services,
};
use crate::{
    auth::AuthUser,
    error::{AppError, AppResult, FieldError},
    state::AppState,
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/user/:id", get(get_user))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(req) = payload?;
    let user = services::register(&state, req).await?;
    let location = format!("/user/{}", user.id);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(UserEnvelope { user }),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<Json<TokenResponse>> {
    let Json(req) = payload?;
    let token = services::login(&state, req).await?;
    Ok(Json(TokenResponse { token }))
}

// AuthUser comes first so the token is checked before the path or the store.
#[instrument(skip(state))]
pub async fn get_user(
    AuthUser(caller): AuthUser,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<UserEnvelope>> {
    let id = Uuid::parse_str(&id)
        .map_err(|_| AppError::Validation(vec![FieldError::new("id", "is not a valid id")]))?;
    let user = services::get_user(&state, id).await?;
    Ok(Json(UserEnvelope { user }))
}
