use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Author, Counts, Forum, ForumDetail, ForumSummary};
use crate::db::{comments, likes};
use crate::pagination::Page;

const FORUM_COLUMNS: &str = "f.id, f.title, f.description, f.tags, f.user_id, f.created_at";

const SUMMARY_SELECT: &str = "
    SELECT f.id, f.title, f.description, f.tags, f.user_id, f.created_at,
           u.name, u.image,
           (SELECT COUNT(*) FROM comments c WHERE c.forum_id = f.id),
           (SELECT COUNT(*) FROM likes l WHERE l.forum_id = f.id)
    FROM forums f
    JOIN users u ON u.id = f.user_id";

// created_at has millisecond resolution; rowid breaks ties by insertion order
const NEWEST_FIRST: &str = "ORDER BY f.created_at DESC, f.rowid DESC";

// ?1 is the raw query (NULL for no filter), ?2 the lowercased, escaped LIKE
// pattern. Both sides are folded with unicode_lower, registered per
// connection in db::init_connection. Tags match exactly.
const SEARCH_FILTER: &str = r"(?1 IS NULL
    OR unicode_lower(f.title) LIKE ?2 ESCAPE '\'
    OR unicode_lower(f.description) LIKE ?2 ESCAPE '\'
    OR EXISTS (SELECT 1 FROM json_each(f.tags) WHERE json_each.value = ?1))";

fn tags_from_json(idx: usize, json: String) -> rusqlite::Result<Vec<String>> {
    serde_json::from_str(&json)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn tags_to_json(tags: &[String]) -> rusqlite::Result<String> {
    serde_json::to_string(tags).map_err(|e| rusqlite::Error::ToSqlConversionFailure(Box::new(e)))
}

fn forum_from_row(row: &Row<'_>) -> rusqlite::Result<Forum> {
    Ok(Forum {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        tags: tags_from_json(3, row.get(3)?)?,
        user_id: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn summary_from_row(row: &Row<'_>) -> rusqlite::Result<ForumSummary> {
    let forum = forum_from_row(row)?;
    let user = Author {
        id: forum.user_id.clone(),
        name: row.get(6)?,
        image: row.get(7)?,
    };
    Ok(ForumSummary {
        forum,
        user,
        count: Counts {
            comments: row.get(8)?,
            likes: row.get(9)?,
        },
    })
}

fn query_summaries<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> rusqlite::Result<Vec<ForumSummary>> {
    let mut stmt = conn.prepare(sql)?;
    let summaries = stmt
        .query_map(params, summary_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(summaries)
}

/// Lowercase the query and escape LIKE wildcards so it matches literally.
fn like_pattern(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len() + 2);
    escaped.push('%');
    for c in query.to_lowercase().chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

/// A blank query means "no filter". Anything else is searched as given.
fn normalize_query(query: Option<&str>) -> Option<&str> {
    query.filter(|q| !q.trim().is_empty())
}

pub fn insert_forum(
    conn: &Connection,
    user_id: &str,
    title: &str,
    description: &str,
    tags: &[String],
) -> rusqlite::Result<Forum> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.query_row(
        "INSERT INTO forums (id, title, description, tags, user_id)
         VALUES (?1, ?2, ?3, ?4, ?5)
         RETURNING id, title, description, tags, user_id, created_at",
        params![id, title, description, tags_to_json(tags)?, user_id],
        forum_from_row,
    )
}

pub fn find_forum(conn: &Connection, id: &str) -> rusqlite::Result<Option<Forum>> {
    conn.query_row(
        &format!("SELECT {FORUM_COLUMNS} FROM forums f WHERE f.id = ?1"),
        params![id],
        forum_from_row,
    )
    .optional()
}

/// Replace title, description and tags. Returns `None` if the forum is gone.
pub fn update_forum(
    conn: &Connection,
    id: &str,
    title: &str,
    description: &str,
    tags: &[String],
) -> rusqlite::Result<Option<Forum>> {
    conn.query_row(
        "UPDATE forums SET title = ?2, description = ?3, tags = ?4 WHERE id = ?1
         RETURNING id, title, description, tags, user_id, created_at",
        params![id, title, description, tags_to_json(tags)?],
        forum_from_row,
    )
    .optional()
}

/// Delete a forum; comments and likes go with it via ON DELETE CASCADE.
pub fn delete_forum(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM forums WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

pub fn count_forums(conn: &Connection, query: Option<&str>) -> rusqlite::Result<i64> {
    let query = normalize_query(query);
    conn.query_row(
        &format!("SELECT COUNT(*) FROM forums f WHERE {SEARCH_FILTER}"),
        params![query, query.map(like_pattern)],
        |row| row.get(0),
    )
}

/// One page of forums, newest first, optionally filtered by a search query.
pub fn list_forums(
    conn: &Connection,
    query: Option<&str>,
    page: Page,
) -> rusqlite::Result<Vec<ForumSummary>> {
    let query = normalize_query(query);
    query_summaries(
        conn,
        &format!("{SUMMARY_SELECT} WHERE {SEARCH_FILTER} {NEWEST_FIRST} LIMIT ?3 OFFSET ?4"),
        params![query, query.map(like_pattern), page.limit(), page.offset()],
    )
}

pub fn forums_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<ForumSummary>> {
    query_summaries(
        conn,
        &format!("{SUMMARY_SELECT} WHERE f.user_id = ?1 {NEWEST_FIRST}"),
        params![user_id],
    )
}

pub fn forums_liked_by(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<ForumSummary>> {
    query_summaries(
        conn,
        &format!(
            "{SUMMARY_SELECT}
             WHERE EXISTS (SELECT 1 FROM likes mine WHERE mine.forum_id = f.id AND mine.user_id = ?1)
             {NEWEST_FIRST}"
        ),
        params![user_id],
    )
}

/// Full forum view: author, comments newest first, counts, and whether
/// `viewer` (if any) has liked it.
pub fn forum_detail(
    conn: &Connection,
    id: &str,
    viewer: Option<&str>,
) -> rusqlite::Result<Option<ForumDetail>> {
    let summary = conn
        .query_row(
            &format!("{SUMMARY_SELECT} WHERE f.id = ?1"),
            params![id],
            summary_from_row,
        )
        .optional()?;

    let Some(summary) = summary else {
        return Ok(None);
    };

    let comments = comments::comments_for_forum(conn, id)?;
    let liked_by_me = match viewer {
        Some(user_id) => likes::has_liked(conn, user_id, id)?,
        None => false,
    };

    Ok(Some(ForumDetail {
        forum: summary.forum,
        user: summary.user,
        comments,
        count: summary.count,
        liked_by_me,
    }))
}
