use async_trait::async_trait;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    application::repos::{LikesRepo, NewLikeParams, RepoError},
    domain::types::LikeTarget,
};

use super::{PostgresRepositories, map_sqlx_error};

#[async_trait]
impl LikesRepo for PostgresRepositories {
    async fn insert_like(&self, params: NewLikeParams) -> Result<bool, RepoError> {
        // The partial unique index arbitrates concurrent likes of the same target.
        let result = sqlx::query(
            r#"
            INSERT INTO likes (id, user_id, target_id, target_type, created_at)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, target_id, target_type) WHERE deleted_at IS NULL
            DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(params.user_id)
        .bind(params.target_id)
        .bind(params.target_type)
        .bind(OffsetDateTime::now_utc())
        .execute(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(result.rows_affected() == 1)
    }

    async fn count_likes(
        &self,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<u64, RepoError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM likes
            WHERE target_id = $1 AND target_type = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(target_id)
        .bind(target_type)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Self::convert_count(count)
    }

    async fn has_liked(
        &self,
        user_id: Uuid,
        target_id: Uuid,
        target_type: LikeTarget,
    ) -> Result<bool, RepoError> {
        let exists: bool = sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1
                FROM likes
                WHERE user_id = $1 AND target_id = $2 AND target_type = $3
                  AND deleted_at IS NULL
            )
            "#,
        )
        .bind(user_id)
        .bind(target_id)
        .bind(target_type)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(exists)
    }
}
