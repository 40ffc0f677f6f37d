use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::auth::{
    dto::{AuthResponse, LoginRequest, RegisterRequest},
    extractors::CurrentUser,
    jwt::JwtKeys,
    password::{hash_password, verify_password},
    repo::{PublicUser, User},
};
use crate::error::{ApiError, Envelope};
use crate::state::AppState;
use crate::validate;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/me", get(me))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<Envelope<AuthResponse>>), ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate::validate_registration(&payload).map_err(ApiError::Validation)?;

    let hash = hash_password(&payload.password)?;
    let role = payload.role.unwrap_or_default();

    // Uniqueness is the store's job; a duplicate username/email comes back
    // as a unique violation and maps to a 409.
    let user = User::create(&state.db, &payload.username, &payload.email, &hash, role).await?;

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;

    info!(user_id = %user.id, role = ?user.role, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(Envelope::ok(
            AuthResponse {
                user: user.into(),
                token,
            },
            "User registered successfully",
        )),
    ))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<Envelope<AuthResponse>>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();
    validate::validate_login(&payload).map_err(ApiError::Validation)?;

    // Unknown email and wrong password take the same path so the response
    // never reveals which one failed.
    let found = User::find_by_email(&state.db, &payload.email).await?;
    let verified = match &found {
        Some(user) => verify_password(&payload.password, &user.password_hash)?,
        None => false,
    };
    let Some(user) = found.filter(|_| verified) else {
        warn!("login rejected");
        return Err(ApiError::Auth("Invalid credentials".into()));
    };

    let keys = JwtKeys::from_ref(&state);
    let token = keys.sign(user.id, user.role)?;

    info!(user_id = %user.id, "user logged in");
    Ok(Json(Envelope::ok(
        AuthResponse {
            user: user.into(),
            token,
        },
        "Login successful",
    )))
}

#[instrument(skip_all)]
pub async fn me(
    CurrentUser(user): CurrentUser,
) -> Result<Json<Envelope<PublicUser>>, ApiError> {
    Ok(Json(Envelope::ok(
        user.into(),
        "User retrieved successfully",
    )))
}
