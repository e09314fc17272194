//! Offset pagination for post listings.

use crate::domain::error::DomainError;

/// A validated `(page, limit)` pair. Pages are 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageParams {
    page: u32,
    limit: u32,
}

impl PageParams {
    pub fn new(page: u32, limit: u32) -> Result<Self, DomainError> {
        if page == 0 {
            return Err(DomainError::validation("page", "must be at least 1"));
        }
        if limit == 0 {
            return Err(DomainError::validation("limit", "must be at least 1"));
        }
        Ok(Self { page, limit })
    }

    /// Resolve raw query values, applying defaults and clamping `limit`.
    pub fn resolve(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: u32,
        max_limit: u32,
    ) -> Result<Self, DomainError> {
        let page = parse_positive("page", page)?.unwrap_or(1);
        let limit = parse_positive("limit", limit)?
            .unwrap_or(default_limit)
            .min(max_limit);
        Self::new(page, limit)
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

fn parse_positive(field: &'static str, raw: Option<&str>) -> Result<Option<u32>, DomainError> {
    let Some(raw) = raw.map(str::trim).filter(|value| !value.is_empty()) else {
        return Ok(None);
    };
    let value: u32 = raw
        .parse()
        .map_err(|_| DomainError::validation(field, format!("`{raw}` is not a positive integer")))?;
    if value == 0 {
        return Err(DomainError::validation(field, "must be at least 1"));
    }
    Ok(Some(value))
}
