//! Account Endpoints
//!
//! # Endpoints
//!
//! - `POST /api/accounts/signup` - Create an account and its profile
//! - `POST /api/accounts/login` - Email/password sign-in
//! - `GET /api/accounts/:id` - Profile, with a placeholder fallback

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::Json,
    routing::{get, post},
    Router,
};
use folio_core::models::{Credentials, SignUpRequest, User};
use folio_core::services::GatewayResponse;

use crate::api::HttpError;
use crate::state::AppState;

async fn sign_up(
    State(state): State<AppState>,
    payload: Result<Json<SignUpRequest>, JsonRejection>,
) -> Result<Json<GatewayResponse<User>>, HttpError> {
    let Json(request) = payload.map_err(|e| HttpError::json_rejection("auth", e))?;

    let user = state
        .accounts
        .sign_up(request)
        .await
        .map_err(HttpError::account)?;

    Ok(Json(GatewayResponse::success(
        "auth",
        "Account created successfully",
        user,
    )))
}

async fn sign_in(
    State(state): State<AppState>,
    payload: Result<Json<Credentials>, JsonRejection>,
) -> Result<Json<GatewayResponse<User>>, HttpError> {
    let Json(credentials) = payload.map_err(|e| HttpError::json_rejection("auth", e))?;

    let user = state
        .accounts
        .sign_in(credentials)
        .await
        .map_err(HttpError::account)?;

    Ok(Json(GatewayResponse::success("auth", "Login successful", user)))
}

async fn get_profile(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Json<GatewayResponse<User>> {
    let user = state.accounts.profile(&user_id).await;
    Json(GatewayResponse::success(
        "auth",
        "User retrieved successfully",
        user,
    ))
}

pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/api/accounts/signup", post(sign_up))
        .route("/api/accounts/login", post(sign_in))
        .route("/api/accounts/:id", get(get_profile))
        .with_state(state)
}
