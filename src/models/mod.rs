pub mod artists;
pub mod outbox;
pub mod projects;
pub mod users;

use serde::Deserialize;

const MAX_OFFSET: u64 = i64::MAX as u64;

#[derive(Debug, Clone, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

impl PaginationQuery {
    /// 1-based page, capped so the row offset `(page - 1) * limit` stays
    /// within a signed 64-bit SQL offset.
    pub fn page(&self) -> u64 {
        let last = MAX_OFFSET / self.limit() + 1;
        self.page.unwrap_or(1).clamp(1, last)
    }

    pub fn limit(&self) -> u64 {
        self.limit.unwrap_or(20).clamp(1, 100)
    }
}
