use serde::Serialize;

/// A user as exposed to clients. The password hash lives only in the
/// `users` table and is read separately by login.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image: Option<String>,
    pub created_at: String,
}

/// Minimal author projection embedded in forums and comments.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Author {
    pub id: String,
    pub name: String,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Forum {
    pub id: String,
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Counts {
    pub comments: i64,
    pub likes: i64,
}

/// A forum as it appears in lists: author and aggregate counts attached.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumSummary {
    #[serde(flatten)]
    pub forum: Forum,
    pub user: Author,
    #[serde(rename = "_count")]
    pub count: Counts,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumDetail {
    #[serde(flatten)]
    pub forum: Forum,
    pub user: Author,
    pub comments: Vec<CommentWithAuthor>,
    #[serde(rename = "_count")]
    pub count: Counts,
    pub liked_by_me: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub content: String,
    pub user_id: String,
    pub forum_id: String,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommentWithAuthor {
    #[serde(flatten)]
    pub comment: Comment,
    pub user: Author,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForumRef {
    pub id: String,
    pub title: String,
}

/// A comment listed on its author's profile, pointing back at its forum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserComment {
    #[serde(flatten)]
    pub comment: Comment,
    pub forum: ForumRef,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Like {
    pub user_id: String,
    pub forum_id: String,
    pub created_at: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn forum() -> Forum {
        Forum {
            id: "f1".into(),
            title: "Rust".into(),
            description: "All about Rust".into(),
            tags: vec!["rust".into()],
            user_id: "u1".into(),
            created_at: "2025-01-15T12:00:00.000Z".into(),
        }
    }

    #[test]
    fn user_serializes_without_password() {
        let user = User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            image: None,
            created_at: "2025-01-15T12:00:00.000Z".into(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("password").is_none());
        assert!(json.get("passwordHash").is_none());
        assert_eq!(json["createdAt"], "2025-01-15T12:00:00.000Z");
    }

    #[test]
    fn summary_flattens_forum_and_names_counts() {
        let summary = ForumSummary {
            forum: forum(),
            user: Author {
                id: "u1".into(),
                name: "Ada".into(),
                image: None,
            },
            count: Counts {
                comments: 2,
                likes: 5,
            },
        };
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["title"], "Rust");
        assert_eq!(json["userId"], "u1");
        assert_eq!(json["user"]["name"], "Ada");
        assert_eq!(json["_count"]["comments"], 2);
        assert_eq!(json["_count"]["likes"], 5);
    }

    #[test]
    fn detail_exposes_liked_flag_in_camel_case() {
        let detail = ForumDetail {
            forum: forum(),
            user: Author {
                id: "u1".into(),
                name: "Ada".into(),
                image: None,
            },
            comments: Vec::new(),
            count: Counts::default(),
            liked_by_me: true,
        };
        let json = serde_json::to_value(&detail).unwrap();
        assert_eq!(json["likedByMe"], true);
        assert!(json["comments"].as_array().unwrap().is_empty());
    }
}
