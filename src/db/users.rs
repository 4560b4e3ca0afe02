use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::User;

const USER_COLUMNS: &str = "id, name, email, image, created_at";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        name: row.get(1)?,
        email: row.get(2)?,
        image: row.get(3)?,
        created_at: row.get(4)?,
    })
}

/// Insert a user whose password has already been hashed.
pub fn insert_user(
    conn: &Connection,
    name: &str,
    email: &str,
    password_hash: &str,
) -> rusqlite::Result<User> {
    let id = uuid::Uuid::now_v7().to_string();
    conn.query_row(
        &format!(
            "INSERT INTO users (id, name, email, password_hash) VALUES (?1, ?2, ?3, ?4)
             RETURNING {USER_COLUMNS}"
        ),
        params![id, name, email, password_hash],
        user_from_row,
    )
}

pub fn email_exists(conn: &Connection, email: &str) -> rusqlite::Result<bool> {
    conn.query_row(
        "SELECT COUNT(*) > 0 FROM users WHERE email = ?1",
        params![email],
        |row| row.get(0),
    )
}

/// Look up a user together with their stored password hash.
pub fn find_credentials(
    conn: &Connection,
    email: &str,
) -> rusqlite::Result<Option<(User, String)>> {
    conn.query_row(
        &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
        params![email],
        |row| Ok((user_from_row(row)?, row.get(5)?)),
    )
    .optional()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_pool;

    #[test]
    fn insert_returns_created_user() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        let user = insert_user(&conn, "Ada", "ada@example.com", "$argon2id$fake").unwrap();
        assert_eq!(user.name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(user.image.is_none());
        assert!(user.created_at.ends_with('Z'));
        assert!(uuid::Uuid::parse_str(&user.id).is_ok());
    }

    #[test]
    fn email_exists_after_insert() {
        let pool = test_pool();
        let conn = pool.get().unwrap();

        assert!(!email_exists(&conn, "ada@example.com").unwrap());
        insert_user(&conn, "Ada", "ada@example.com", "hash").unwrap();
        assert!(email_exists(&conn, "ada@example.com").unwrap());
    }

    #[test]
    fn credentials_carry_hash() {
        let pool = test_pool();
        let conn = pool.get().unwrap();
        let created = insert_user(&conn, "Ada", "ada@example.com", "stored-hash").unwrap();

        let (user, hash) = find_credentials(&conn, "ada@example.com")
            .unwrap()
            .unwrap();
        assert_eq!(user, created);
        assert_eq!(hash, "stored-hash");
        assert!(find_credentials(&conn, "bob@example.com").unwrap().is_none());
    }
}
