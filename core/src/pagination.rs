use serde::{Deserialize, Serialize};

pub const DEFAULT_LIMIT: u64 = 100;

/// Largest offset or limit the SQL drivers bind; they take a signed 64-bit
/// integer.
const MAX_WINDOW: u64 = i64::MAX as u64;

/// Offset/limit window applied to every list operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: u64,
    #[serde(default = "default_limit")]
    pub limit: u64,
}

fn default_limit() -> u64 {
    DEFAULT_LIMIT
}

impl Pagination {
    pub fn new(skip: u64, limit: u64) -> Self {
        Self { skip, limit }
    }

    /// `(offset, limit)` saturated to what the store accepts. A skip past the
    /// end still yields an empty page.
    pub fn window(&self) -> (u64, u64) {
        (self.skip.min(MAX_WINDOW), self.limit.min(MAX_WINDOW))
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIMIT,
        }
    }
}
