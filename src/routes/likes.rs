use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::json;

use crate::db::{forums, likes};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/forums/{id}/like", post(like_forum).delete(unlike_forum))
}

/// Liking twice is a client error, not a no-op.
async fn like_forum(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(forum_id): Path<String>,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    if forums::find_forum(&conn, &forum_id)?.is_none() {
        return Err(AppError::NotFound("Forum not found".into()));
    }

    let like = likes::insert_like(&conn, &user.id, &forum_id)?
        .ok_or_else(|| AppError::BadRequest("You have already liked this forum".into()))?;

    Ok((StatusCode::CREATED, Json(like)).into_response())
}

/// Removing a like that does not exist is a 404.
async fn unlike_forum(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(forum_id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    if !likes::delete_like(&conn, &user.id, &forum_id)? {
        return Err(AppError::NotFound("Like not found".into()));
    }

    Ok(Json(json!({ "message": "Like removed" })))
}
