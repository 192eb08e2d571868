use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{info, instrument, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RefreshRequest, RegisterRequest},
        repo_types::User,
        services::{
            hash_password, is_valid_email, verify_password, AuthUser, JwtKeys, MIN_PASSWORD_LEN,
        },
    },
    error::{is_unique_violation, AppError, AppResult},
    profile,
    state::AppState,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/me", get(get_me))
}

async fn public_user(state: &AppState, user: User) -> AppResult<PublicUser> {
    let completed = profile::repo::find_by_user(&state.db, user.id)
        .await?
        .map(|p| p.profile_completed)
        .unwrap_or(false);
    Ok(PublicUser {
        id: user.id,
        email: user.email,
        profile_completed: completed,
    })
}

fn issue_tokens(state: &AppState, user: PublicUser) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(state);
    let (access_token, refresh_token) = keys.sign_pair(user.id)?;
    Ok(Json(AuthResponse {
        access_token,
        refresh_token,
        user,
    }))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    if payload.password.len() < MIN_PASSWORD_LEN {
        warn!("password too short");
        return Err(AppError::validation("Password too short"));
    }

    // Ensure email is not taken
    if User::find_by_email(&state.db, &payload.email).await?.is_some() {
        warn!(email = %payload.email, "email already registered");
        return Err(AppError::Conflict("Email already registered".into()));
    }

    let hash = hash_password(&payload.password)?;

    let mut tx = state.db.begin().await?;
    // a concurrent signup can still win the race past the lookup above
    let user = User::create_tx(&mut tx, &payload.email, &hash)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                warn!(email = %payload.email, "email registered concurrently");
                AppError::Conflict("Email already registered".into())
            } else {
                AppError::Database(e)
            }
        })?;
    profile::repo::insert_default_tx(&mut tx, user.id).await?;
    tx.commit().await?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    issue_tokens(
        &state,
        PublicUser {
            id: user.id,
            email: user.email,
            profile_completed: false,
        },
    )
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> AppResult<Json<AuthResponse>> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(AppError::validation("Invalid email"));
    }

    let Some(user) = User::find_by_email(&state.db, &payload.email).await? else {
        warn!(email = %payload.email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !verify_password(&payload.password, &user.password_hash)? {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    let public = public_user(&state, user).await?;
    issue_tokens(&state, public)
}

#[instrument(skip(state, payload))]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> AppResult<Json<AuthResponse>> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys.verify_refresh(&payload.refresh_token).map_err(|e| {
        warn!(error = %e, "refresh rejected");
        AppError::Unauthorized("Invalid refresh token".into())
    })?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    let public = public_user(&state, user).await?;
    issue_tokens(&state, public)
}

#[instrument(skip(state))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> AppResult<Json<PublicUser>> {
    let user = User::find_by_id(&state.db, user_id)
        .await?
        .ok_or_else(|| AppError::Unauthorized("User not found".into()))?;
    Ok(Json(public_user(&state, user).await?))
}
