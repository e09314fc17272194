mod read;
mod types;
mod write;

use std::collections::HashMap;

use uuid::Uuid;

use crate::application::repos::RepoError;
use crate::domain::entities::{PostRecord, TagRecord};

use super::{PostgresRepositories, map_sqlx_error};
use types::{PostRow, PostTagRow};

impl PostgresRepositories {
    /// Attach tags to `rows` with one query, preserving row order.
    async fn hydrate_posts(&self, rows: Vec<PostRow>) -> Result<Vec<PostRecord>, RepoError> {
        if rows.is_empty() {
            return Ok(Vec::new());
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();

        let tag_rows = sqlx::query_as::<_, PostTagRow>(
            r#"
            SELECT pt.post_id, t.id, t.name, t.created_at, t.updated_at
            FROM post_tags pt
            INNER JOIN tags t ON t.id = pt.tag_id
            WHERE pt.post_id = ANY($1)
            ORDER BY t.name ASC
            "#,
        )
        .bind(&ids)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        let mut tags_by_post: HashMap<Uuid, Vec<TagRecord>> = HashMap::new();
        for row in tag_rows {
            tags_by_post
                .entry(row.post_id)
                .or_default()
                .push(TagRecord::from(row));
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let tags = tags_by_post.remove(&row.id).unwrap_or_default();
                row.into_record(tags)
            })
            .collect())
    }
}
