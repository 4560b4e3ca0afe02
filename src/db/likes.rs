use rusqlite::{params, Connection, OptionalExtension};

use crate::db::models::Like;

/// Record that `user_id` likes `forum_id`.
///
/// Returns `None` when the pair already exists. The primary key on
/// (user_id, forum_id) makes this a single atomic statement, so concurrent
/// duplicates resolve to exactly one row.
pub fn insert_like(
    conn: &Connection,
    user_id: &str,
    forum_id: &str,
) -> rusqlite::Result<Option<Like>> {
    conn.query_row(
        "INSERT INTO likes (user_id, forum_id) VALUES (?1, ?2)
         ON CONFLICT (user_id, forum_id) DO NOTHING
         RETURNING user_id, forum_id, created_at",
        params![user_id, forum_id],
        |row| {
            Ok(Like {
                user_id: row.get(0)?,
                forum_id: row.get(1)?,
                created_at: row.get(2)?,
            })
        },
    )
    .optional()
}

/// Remove a like. Returns false if there was nothing to remove.
pub fn delete_like(conn: &Connection, user_id: &str, forum_id: &str) -> rusqlite::Result<bool> {
    let rows = conn.execute(
        "DELETE FROM likes WHERE user_id = ?1 AND forum_id = ?2",
        params![user_id, forum_id],
    )?;
    Ok(rows > 0)
}

pub fn has_liked(conn: &Connection, user_id: &str, forum_id: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM likes WHERE user_id = ?1 AND forum_id = ?2",
        params![user_id, forum_id],
        |row| row.get(0),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{forums, test_pool, users};

    fn seed(conn: &Connection) -> (String, String) {
        let user = users::insert_user(conn, "Ada", "ada@example.com", "hash").unwrap();
        let forum =
            forums::insert_forum(conn, &user.id, "Rust", "All about Rust", &[]).unwrap();
        (user.id, forum.id)
    }

    #[test]
    fn like_then_unlike_is_a_toggle() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let (uid, fid) = seed(&conn);

        assert!(!has_liked(&conn, &uid, &fid).unwrap());
        let like = insert_like(&conn, &uid, &fid).unwrap().unwrap();
        assert_eq!(like.user_id, uid);
        assert_eq!(like.forum_id, fid);
        assert!(has_liked(&conn, &uid, &fid).unwrap());

        assert!(delete_like(&conn, &uid, &fid).unwrap());
        assert!(!has_liked(&conn, &uid, &fid).unwrap());
    }

    #[test]
    fn second_like_is_rejected_without_error() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let (uid, fid) = seed(&conn);

        assert!(insert_like(&conn, &uid, &fid).unwrap().is_some());
        assert!(insert_like(&conn, &uid, &fid).unwrap().is_none());

        let rows: i64 = conn
            .query_row("SELECT COUNT(*) FROM likes", [], |row| row.get(0))
            .unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn unlike_without_like_reports_nothing_removed() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let (uid, fid) = seed(&conn);

        assert!(!delete_like(&conn, &uid, &fid).unwrap());
    }
}
