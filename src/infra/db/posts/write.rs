use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::application::repos::{CreatePostParams, PostsRepo, PostsWriteRepo, RepoError};
use crate::domain::entities::PostRecord;
use crate::domain::posts::PostPatch;

use super::PostgresRepositories;
use crate::infra::db::map_sqlx_error;

#[async_trait]
impl PostsWriteRepo for PostgresRepositories {
    async fn create_post(&self, params: CreatePostParams) -> Result<PostRecord, RepoError> {
        let CreatePostParams {
            author_id,
            title,
            content,
            is_draft,
            is_top,
            is_recommend,
            tag_names,
        } = params;
        let id = Uuid::new_v4();
        let now = OffsetDateTime::now_utc();

        let mut tx = self.pool().begin().await.map_err(map_sqlx_error)?;

        sqlx::query(
            r#"
            INSERT INTO posts (
                id, title, content, author_id, is_draft, is_top, is_recommend,
                created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8)
            "#,
        )
        .bind(id)
        .bind(&title)
        .bind(&content)
        .bind(author_id)
        .bind(is_draft)
        .bind(is_top)
        .bind(is_recommend)
        .bind(now)
        .execute(&mut *tx)
        .await
        .map_err(map_sqlx_error)?;

        // Names arrive sorted, so concurrent creators lock tag rows in the same order.
        let mut tag_ids = Vec::with_capacity(tag_names.len());
        for name in &tag_names {
            let tag_id: Uuid = sqlx::query_scalar(
                r#"
                INSERT INTO tags (id, name, created_at, updated_at)
                VALUES ($1, $2, $3, $3)
                ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
                RETURNING id
                "#,
            )
            .bind(Uuid::new_v4())
            .bind(name)
            .bind(now)
            .fetch_one(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
            tag_ids.push(tag_id);
        }

        if !tag_ids.is_empty() {
            sqlx::query(
                r#"
                INSERT INTO post_tags (post_id, tag_id)
                SELECT $1, tag_id
                FROM UNNEST($2::uuid[]) AS tag_id
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(id)
            .bind(&tag_ids)
            .execute(&mut *tx)
            .await
            .map_err(map_sqlx_error)?;
        }

        tx.commit().await.map_err(map_sqlx_error)?;

        self.find_post(id).await?.ok_or(RepoError::NotFound)
    }

    async fn update_post(&self, id: Uuid, patch: &PostPatch) -> Result<PostRecord, RepoError> {
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET title = COALESCE($2, title),
                content = COALESCE($3, content),
                is_draft = COALESCE($4, is_draft),
                is_top = COALESCE($5, is_top),
                is_recommend = COALESCE($6, is_recommend),
                updated_at = $7
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(patch.title.as_deref())
        .bind(patch.content.as_deref())
        .bind(patch.is_draft)
        .bind(patch.is_top)
        .bind(patch.is_recommend)
        .bind(OffsetDateTime::now_utc())
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }

        self.find_post(id).await?.ok_or(RepoError::NotFound)
    }

    async fn soft_delete_post(&self, id: Uuid) -> Result<(), RepoError> {
        let now = OffsetDateTime::now_utc();
        let result = sqlx::query(
            r#"
            UPDATE posts
            SET deleted_at = $2, updated_at = $2
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .bind(now)
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound);
        }
        Ok(())
    }
}
