use time::OffsetDateTime;
use uuid::Uuid;

use crate::domain::entities::{AuthorSummary, PostRecord, TagRecord};

/// Live posts joined with their author; callers append predicates and ordering.
pub(crate) const SELECT_LIVE_POSTS: &str = "SELECT p.id, p.title, p.content, p.is_draft, \
     p.is_top, p.is_recommend, p.created_at, p.updated_at, \
     u.id AS author_id, u.username AS author_username \
     FROM posts p \
     INNER JOIN users u ON u.id = p.author_id \
     WHERE p.deleted_at IS NULL";

#[derive(sqlx::FromRow)]
pub(crate) struct PostRow {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) content: String,
    pub(crate) is_draft: bool,
    pub(crate) is_top: bool,
    pub(crate) is_recommend: bool,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
    pub(crate) author_id: Uuid,
    pub(crate) author_username: String,
}

impl PostRow {
    pub(crate) fn into_record(self, tags: Vec<TagRecord>) -> PostRecord {
        PostRecord {
            id: self.id,
            title: self.title,
            content: self.content,
            author: AuthorSummary {
                id: self.author_id,
                username: self.author_username,
            },
            is_draft: self.is_draft,
            is_top: self.is_top,
            is_recommend: self.is_recommend,
            created_at: self.created_at,
            updated_at: self.updated_at,
            tags,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct PostTagRow {
    pub(crate) post_id: Uuid,
    pub(crate) id: Uuid,
    pub(crate) name: String,
    pub(crate) created_at: OffsetDateTime,
    pub(crate) updated_at: OffsetDateTime,
}

impl From<PostTagRow> for TagRecord {
    fn from(row: PostTagRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
