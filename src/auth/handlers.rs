use axum::{
    extract::{FromRef, State},
    routing::{get, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::error::{bad_request, failure, internal, unauthorized, ApiError};
use crate::state::AppState;

use super::dto::{
    AuthResponse, JwtKeys, LoginRequest, PublicUser, RefreshRequest, RegisterRequest, UserEnvelope,
};
use super::repo::User;
use super::services::{hash_password, is_valid_email, verify_password, AuthUser};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
        .route("/auth/refresh", post(refresh))
        .route("/me", get(get_me))
}

fn token_pair(keys: &JwtKeys, user: User) -> anyhow::Result<AuthResponse> {
    Ok(AuthResponse {
        success: true,
        access_token: keys.sign_access(user.id)?,
        refresh_token: keys.sign_refresh(user.id)?,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    })
}

#[instrument(skip(state, payload))]
async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(bad_request("Invalid email"));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err(bad_request("Password too short"));
    }

    if let Ok(Some(_)) = User::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err(failure(
            axum::http::StatusCode::CONFLICT,
            "Email already registered",
        ));
    }

    let hash = hash_password(&payload.password).map_err(|e| {
        error!(error = %e, "hash_password failed");
        internal("Registration failed")
    })?;
    let user = User::create(&state.db, &payload.email, &hash)
        .await
        .map_err(|e| {
            error!(error = %e, "create user failed");
            internal("Registration failed")
        })?;

    info!(user_id = %user.id, email = %user.email, "user registered");
    let keys = JwtKeys::from_ref(&state);
    let response = token_pair(&keys, user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        internal("Registration failed")
    })?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
async fn login(
    State(state): State<AppState>,
    Json(mut payload): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err(bad_request("Invalid email"));
    }

    let user = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(|e| {
            error!(error = %e, "find_by_email failed");
            internal("Login failed")
        })?
        .ok_or_else(|| {
            warn!(email = %payload.email, "login unknown email");
            unauthorized("Invalid credentials")
        })?;

    let ok = verify_password(&payload.password, &user.password_hash).map_err(|e| {
        error!(error = %e, "verify_password failed");
        internal("Login failed")
    })?;
    if !ok {
        warn!(email = %payload.email, user_id = %user.id, "login invalid password");
        return Err(unauthorized("Invalid credentials"));
    }

    info!(user_id = %user.id, email = %user.email, "user logged in");
    let keys = JwtKeys::from_ref(&state);
    let response = token_pair(&keys, user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        internal("Login failed")
    })?;
    Ok(Json(response))
}

#[instrument(skip(state, payload))]
async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> Result<Json<AuthResponse>, ApiError> {
    let keys = JwtKeys::from_ref(&state);
    let claims = keys
        .verify_refresh(&payload.refresh_token)
        .map_err(|_| unauthorized("Invalid or expired token"))?;

    let user = User::find_by_id(&state.db, claims.sub)
        .await
        .map_err(|e| {
            error!(error = %e, "refresh: user lookup failed");
            internal("Token refresh failed")
        })?
        .ok_or_else(|| unauthorized("User not found"))?;

    let response = token_pair(&keys, user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        internal("Token refresh failed")
    })?;
    Ok(Json(response))
}

#[instrument(skip(state))]
async fn get_me(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
) -> Result<Json<UserEnvelope>, ApiError> {
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(|e| {
            error!(error = %e, %user_id, "get_me lookup failed");
            internal("Failed to fetch user")
        })?
        .ok_or_else(|| unauthorized("User not found"))?;

    Ok(Json(UserEnvelope {
        success: true,
        user: PublicUser {
            id: user.id,
            email: user.email,
        },
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use uuid::Uuid;

    #[tokio::test]
    async fn auth_response_hides_nothing_but_hash() {
        let user = User {
            id: Uuid::new_v4(),
            email: "owner@example.com".into(),
            password_hash: "secret".into(),
            created_at: datetime!(2024-01-01 0:00 UTC),
        };
        let keys = JwtKeys::from_ref(&AppState::fake());
        let response = token_pair(&keys, user).expect("sign");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["user"]["email"], "owner@example.com");
        assert!(json["access_token"].is_string());
        assert!(json.get("password_hash").is_none());
    }
}
