use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, post};
use axum::{Json, Router};
use serde_json::json;

use crate::db::{comments, forums};
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::state::AppState;
use crate::validation::{parse_payload, CommentPayload};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forums/{id}/comments", post(create_comment))
        .route(
            "/api/forums/{id}/comments/{comment_id}",
            delete(delete_comment),
        )
}

async fn create_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(forum_id): Path<String>,
    body: Bytes,
) -> AppResult<Response> {
    let conn = state.db.get()?;
    if forums::find_forum(&conn, &forum_id)?.is_none() {
        return Err(AppError::NotFound("Forum not found".into()));
    }

    let payload: CommentPayload = parse_payload(&body)?;

    let comment = comments::insert_comment(&conn, &forum_id, &user.id, &payload.content)?;
    Ok((StatusCode::CREATED, Json(comment)).into_response())
}

async fn delete_comment(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path((forum_id, comment_id)): Path<(String, String)>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;

    let comment = comments::find_comment(&conn, &comment_id)?
        .filter(|c| c.forum_id == forum_id)
        .ok_or_else(|| AppError::NotFound("Comment not found".into()))?;

    if comment.user_id != user.id {
        return Err(AppError::Forbidden(
            "Not authorized to delete this comment".into(),
        ));
    }

    comments::delete_comment(&conn, &comment.id)?;
    Ok(Json(json!({ "message": "Comment Deleted Successfully" })))
}
