use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{CommentsRepo, CreateCommentParams, RepoError},
    domain::entities::{AuthorSummary, CommentRecord},
};

use super::{PostgresRepositories, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct CommentRow {
    id: Uuid,
    content: String,
    post_id: Uuid,
    parent_id: Option<Uuid>,
    created_at: OffsetDateTime,
    author_id: Uuid,
    author_username: String,
}

impl From<CommentRow> for CommentRecord {
    fn from(row: CommentRow) -> Self {
        Self {
            id: row.id,
            content: row.content,
            author: AuthorSummary {
                id: row.author_id,
                username: row.author_username,
            },
            post_id: row.post_id,
            parent_id: row.parent_id,
            created_at: row.created_at,
        }
    }
}

#[async_trait]
impl CommentsRepo for PostgresRepositories {
    async fn create_comment(
        &self,
        params: CreateCommentParams,
    ) -> Result<CommentRecord, RepoError> {
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        sqlx::query(
            r#"
            INSERT INTO comments (id, content, author_id, post_id, parent_id, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $6)
            "#,
        )
        .bind(id)
        .bind(&params.content)
        .bind(params.author_id)
        .bind(params.post_id)
        .bind(params.parent_id)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        self.find_comment(id).await?.ok_or(RepoError::NotFound)
    }

    async fn find_comment(&self, id: Uuid) -> Result<Option<CommentRecord>, RepoError> {
        let row = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.content, c.post_id, c.parent_id, c.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.id = $1 AND c.deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(row.map(CommentRecord::from))
    }

    async fn list_top_level_comments(
        &self,
        post_id: Uuid,
    ) -> Result<Vec<CommentRecord>, RepoError> {
        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.content, c.post_id, c.parent_id, c.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            INNER JOIN posts p ON p.id = c.post_id AND p.deleted_at IS NULL
            WHERE c.post_id = $1 AND c.parent_id IS NULL AND c.deleted_at IS NULL
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(post_id)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }

    async fn list_replies(&self, parent_ids: &[Uuid]) -> Result<Vec<CommentRecord>, RepoError> {
        if parent_ids.is_empty() {
            return Ok(Vec::new());
        }

        let rows = sqlx::query_as::<_, CommentRow>(
            r#"
            SELECT c.id, c.content, c.post_id, c.parent_id, c.created_at,
                   u.id AS author_id, u.username AS author_username
            FROM comments c
            INNER JOIN users u ON u.id = c.author_id
            WHERE c.parent_id = ANY($1) AND c.deleted_at IS NULL
            ORDER BY c.created_at ASC, c.id ASC
            "#,
        )
        .bind(parent_ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows.into_iter().map(CommentRecord::from).collect())
    }
}
