use axum::extract::State;
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use validator::Validate;

use crate::auth::{password, session};
use crate::db::{self, users};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody};
use crate::state::AppState;
use crate::validation::{LoginPayload, RegisterPayload};

/// Argon2 blocks for tens of milliseconds; run it on the blocking pool.
async fn run_blocking<T, F>(f: F) -> AppResult<T>
where
    F: FnOnce() -> Result<T, argon2::password_hash::Error> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::Internal(format!("Password task failed: {}", e)))?
        .map_err(AppError::from)
}

/// POST /api/auth/register: create an account
pub async fn register(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<RegisterPayload>,
) -> AppResult<Response> {
    payload.validate()?;

    {
        let conn = state.db.get()?;
        if users::email_exists(&conn, &payload.email)? {
            return Err(AppError::Conflict("User Already Exists".into()));
        }
    }

    let RegisterPayload {
        name,
        email,
        password: plain,
    } = payload;
    let password_hash = run_blocking(move || password::hash_password(&plain)).await?;

    let conn = state.db.get()?;
    let user = users::insert_user(&conn, &name, &email, &password_hash).map_err(|e| {
        // Lost a race with a concurrent registration for the same email
        if db::is_unique_violation(&e) {
            AppError::Conflict("User Already Exists".into())
        } else {
            AppError::from(e)
        }
    })?;

    tracing::info!(user_id = %user.id, "Registered new user");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "user": user, "message": "User Created successfully" })),
    )
        .into_response())
}

/// POST /api/auth/login: verify credentials and start a session
pub async fn login(
    State(state): State<AppState>,
    JsonBody(payload): JsonBody<LoginPayload>,
) -> AppResult<Response> {
    payload.validate()?;

    let credentials = {
        let conn = state.db.get()?;
        users::find_credentials(&conn, &payload.email)?
    };
    let (user, password_hash) = credentials.ok_or(AppError::InvalidCredentials)?;

    let LoginPayload {
        password: plain, ..
    } = payload;
    let valid = run_blocking(move || password::verify_password(&plain, &password_hash)).await?;
    if !valid {
        return Err(AppError::InvalidCredentials);
    }

    let hours = state.config.auth.session_hours;
    let token = {
        let conn = state.db.get()?;
        let purged = session::purge_expired(&conn)?;
        if purged > 0 {
            tracing::debug!("Purged {} expired sessions", purged);
        }
        session::create_session(&conn, &user.id, hours)?
    };

    tracing::info!(user_id = %user.id, "User signed in");

    Ok((
        StatusCode::OK,
        [(
            header::SET_COOKIE,
            session::session_cookie(&state.config.auth.cookie_name, &token, hours),
        )],
        Json(json!({ "user": user })),
    )
        .into_response())
}

/// POST /api/auth/logout: delete the session and clear the cookie
pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> AppResult<Response> {
    let cookie_name = &state.config.auth.cookie_name;

    if let Some(token) = session::cookie_value(&headers, cookie_name) {
        let conn = state.db.get()?;
        session::delete_session(&conn, token)?;
    }

    Ok((
        StatusCode::OK,
        [(header::SET_COOKIE, session::clear_session_cookie(cookie_name))],
        Json(json!({ "message": "Signed out" })),
    )
        .into_response())
}

/// GET /api/auth/session: who am I
pub async fn current_session(CurrentUser(user): CurrentUser) -> Json<serde_json::Value> {
    Json(json!({ "user": user }))
}
