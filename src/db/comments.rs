use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{Author, Comment, CommentWithAuthor, ForumRef, UserComment};

fn comment_from_row(row: &Row<'_>) -> rusqlite::Result<Comment> {
    Ok(Comment {
        id: row.get(0)?,
        content: row.get(1)?,
        user_id: row.get(2)?,
        forum_id: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn with_author_from_row(row: &Row<'_>) -> rusqlite::Result<CommentWithAuthor> {
    let comment = comment_from_row(row)?;
    let user = Author {
        id: comment.user_id.clone(),
        name: row.get(5)?,
        image: row.get(6)?,
    };
    Ok(CommentWithAuthor { comment, user })
}

const WITH_AUTHOR_SELECT: &str = "
    SELECT c.id, c.content, c.user_id, c.forum_id, c.created_at, u.name, u.image
    FROM comments c
    JOIN users u ON u.id = c.user_id";

/// Insert a comment and return it with its author projection attached.
pub fn insert_comment(
    conn: &Connection,
    forum_id: &str,
    user_id: &str,
    content: &str,
) -> rusqlite::Result<CommentWithAuthor> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.execute(
        "INSERT INTO comments (id, content, user_id, forum_id) VALUES (?1, ?2, ?3, ?4)",
        params![id, content, user_id, forum_id],
    )?;

    conn.query_row(
        &format!("{WITH_AUTHOR_SELECT} WHERE c.id = ?1"),
        params![id],
        with_author_from_row,
    )
}

pub fn find_comment(conn: &Connection, id: &str) -> rusqlite::Result<Option<Comment>> {
    conn.query_row(
        "SELECT id, content, user_id, forum_id, created_at FROM comments WHERE id = ?1",
        params![id],
        comment_from_row,
    )
    .optional()
}

pub fn delete_comment(conn: &Connection, id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute("DELETE FROM comments WHERE id = ?1", params![id])?;
    Ok(rows > 0)
}

/// Comments on a forum, newest first.
pub fn comments_for_forum(
    conn: &Connection,
    forum_id: &str,
) -> rusqlite::Result<Vec<CommentWithAuthor>> {
    let mut stmt = conn.prepare(&format!(
        "{WITH_AUTHOR_SELECT} WHERE c.forum_id = ?1 ORDER BY c.created_at DESC, c.rowid DESC"
    ))?;
    let comments = stmt
        .query_map(params![forum_id], with_author_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(comments)
}

/// Everything a user has said, newest first, each pointing at its forum.
pub fn comments_by_user(conn: &Connection, user_id: &str) -> rusqlite::Result<Vec<UserComment>> {
    let mut stmt = conn.prepare(
        "SELECT c.id, c.content, c.user_id, c.forum_id, c.created_at, f.title
         FROM comments c
         JOIN forums f ON f.id = c.forum_id
         WHERE c.user_id = ?1
         ORDER BY c.created_at DESC, c.rowid DESC",
    )?;
    let comments = stmt
        .query_map(params![user_id], |row| {
            let comment = comment_from_row(row)?;
            let forum = ForumRef {
                id: comment.forum_id.clone(),
                title: row.get(5)?,
            };
            Ok(UserComment { comment, forum })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(comments)
}
