use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rusqlite::Connection;
use serde::Deserialize;
use serde_json::json;
use validator::Validate;

use crate::db::forums;
use crate::db::models::{Forum, ForumDetail, ForumSummary};
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, JsonBody, MaybeUser};
use crate::pagination::{Page, Paginated};
use crate::state::AppState;
use crate::validation::{parse_payload, ForumPayload};

#[derive(Deserialize)]
pub struct ListQuery {
    pub page: Option<String>,
    pub q: Option<String>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/forums", get(list_forums).post(create_forum))
        .route(
            "/api/forums/{id}",
            get(get_forum).patch(update_forum).delete(delete_forum),
        )
}

fn forum_not_found() -> AppError {
    AppError::NotFound("Forum not found".into())
}

/// Load a forum and check that `user_id` owns it.
fn owned_forum(conn: &Connection, id: &str, user_id: &str, action: &str) -> AppResult<Forum> {
    let forum = forums::find_forum(conn, id)?.ok_or_else(forum_not_found)?;
    if forum.user_id != user_id {
        return Err(AppError::Forbidden(format!(
            "Not authorized to {} this forum",
            action
        )));
    }
    Ok(forum)
}

/// GET /api/forums?page=&q=: newest first, six per page
async fn list_forums(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Paginated<ForumSummary>>> {
    let page = Page::parse(query.page.as_deref());
    let search = query.q.as_deref();

    let conn = state.db.get()?;
    let total = forums::count_forums(&conn, search)?;
    let items = forums::list_forums(&conn, search, page)?;

    Ok(Json(Paginated::new(items, total, page)))
}

async fn create_forum(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    JsonBody(payload): JsonBody<ForumPayload>,
) -> AppResult<Response> {
    payload.validate()?;

    let conn = state.db.get()?;
    let forum = forums::insert_forum(
        &conn,
        &user.id,
        &payload.title,
        &payload.description,
        &payload.tags(),
    )?;

    tracing::info!(forum_id = %forum.id, user_id = %user.id, "Forum created");
    Ok((StatusCode::CREATED, Json(forum)).into_response())
}

async fn get_forum(
    State(state): State<AppState>,
    MaybeUser(viewer): MaybeUser,
    Path(id): Path<String>,
) -> AppResult<Json<ForumDetail>> {
    let conn = state.db.get()?;
    let viewer_id = viewer.as_ref().map(|u| u.id.as_str());
    forums::forum_detail(&conn, &id, viewer_id)?
        .map(Json)
        .ok_or_else(forum_not_found)
}

async fn update_forum(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Bytes,
) -> AppResult<Json<Forum>> {
    let conn = state.db.get()?;
    owned_forum(&conn, &id, &user.id, "update")?;

    // The body is only looked at once the caller is known to own the forum
    let payload: ForumPayload = parse_payload(&body)?;

    let forum = forums::update_forum(
        &conn,
        &id,
        &payload.title,
        &payload.description,
        &payload.tags(),
    )?
    .ok_or_else(forum_not_found)?;

    Ok(Json(forum))
}

async fn delete_forum(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    let conn = state.db.get()?;
    owned_forum(&conn, &id, &user.id, "delete")?;

    if !forums::delete_forum(&conn, &id)? {
        return Err(forum_not_found());
    }

    tracing::info!(forum_id = %id, user_id = %user.id, "Forum deleted");
    Ok(Json(json!({ "message": "Forum deleted successfully" })))
}
