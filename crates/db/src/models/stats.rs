//! Dashboard counters.

use serde::Serialize;

/// Entity counts shown on the dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContentCounts {
    pub videos: i64,
    pub clips: i64,
    /// Posts with status `posted`.
    pub posts: i64,
    /// Posts with status `idea`.
    pub ideas: i64,
}
