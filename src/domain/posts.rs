//! Post invariants: required fields, tag normalisation and partial updates.

use std::collections::BTreeSet;

use serde::Deserialize;
use time::OffsetDateTime;

use super::entities::PostRecord;
use super::error::DomainError;

pub const MAX_TITLE_CHARS: usize = 300;
pub const MAX_TAG_CHARS: usize = 64;

pub fn ensure_non_blank(field: &'static str, value: &str) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(field, "must not be empty"));
    }
    Ok(())
}

pub fn ensure_title(title: &str) -> Result<(), DomainError> {
    ensure_non_blank("title", title)?;
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(DomainError::validation(
            "title",
            format!("must be at most {MAX_TITLE_CHARS} characters"),
        ));
    }
    Ok(())
}

/// Trim tag names, drop blanks and collapse duplicates.
///
/// The result is sorted so concurrent creators touch tag rows in the same order.
pub fn normalize_tag_names<I, S>(names: I) -> Result<Vec<String>, DomainError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut unique = BTreeSet::new();
    for name in names {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            continue;
        }
        if trimmed.chars().count() > MAX_TAG_CHARS {
            return Err(DomainError::validation(
                "tags",
                format!("tag `{trimmed}` exceeds {MAX_TAG_CHARS} characters"),
            ));
        }
        unique.insert(trimmed.to_string());
    }
    Ok(unique.into_iter().collect())
}

/// Field-by-field update; `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PostPatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub is_draft: Option<bool>,
    pub is_top: Option<bool>,
    pub is_recommend: Option<bool>,
}

impl PostPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.content.is_none()
            && self.is_draft.is_none()
            && self.is_top.is_none()
            && self.is_recommend.is_none()
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        if let Some(title) = self.title.as_deref() {
            ensure_title(title)?;
        }
        if let Some(content) = self.content.as_deref() {
            ensure_non_blank("content", content)?;
        }
        Ok(())
    }

    /// Merge the present fields into `post` and bump `updated_at`.
    pub fn apply_to(&self, post: &mut PostRecord, now: OffsetDateTime) {
        if let Some(title) = &self.title {
            post.title = title.clone();
        }
        if let Some(content) = &self.content {
            post.content = content.clone();
        }
        if let Some(is_draft) = self.is_draft {
            post.is_draft = is_draft;
        }
        if let Some(is_top) = self.is_top {
            post.is_top = is_top;
        }
        if let Some(is_recommend) = self.is_recommend {
            post.is_recommend = is_recommend;
        }
        post.updated_at = now;
    }
}
