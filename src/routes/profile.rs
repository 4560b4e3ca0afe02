use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::Serialize;

use crate::db::models::{ForumSummary, User, UserComment};
use crate::db::{comments, forums};
use crate::error::AppResult;
use crate::extractors::CurrentUser;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub user: User,
    pub forums: Vec<ForumSummary>,
    pub comments: Vec<UserComment>,
    pub liked_forums: Vec<ForumSummary>,
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/profile", get(profile))
}

async fn profile(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> AppResult<Json<Profile>> {
    let conn = state.db.get()?;
    let forums = forums::forums_by_user(&conn, &user.id)?;
    let comments = comments::comments_by_user(&conn, &user.id)?;
    let liked_forums = forums::forums_liked_by(&conn, &user.id)?;

    Ok(Json(Profile {
        user,
        forums,
        comments,
        liked_forums,
    }))
}
