//! Dashboard counters across the content tables.

use sqlx::PgPool;

use crate::models::stats::ContentCounts;

pub struct StatsRepo;

impl StatsRepo {
    /// Count videos, clips, posted posts and post ideas in one round trip.
    pub async fn counts(pool: &PgPool) -> Result<ContentCounts, sqlx::Error> {
        let (videos, clips, posts, ideas): (i64, i64, i64, i64) = sqlx::query_as(
            "SELECT \
                 (SELECT COUNT(*) FROM videos), \
                 (SELECT COUNT(*) FROM clips), \
                 (SELECT COUNT(*) FROM content_posts WHERE status = 'posted'), \
                 (SELECT COUNT(*) FROM content_posts WHERE status = 'idea')",
        )
        .fetch_one(pool)
        .await?;

        Ok(ContentCounts {
            videos,
            clips,
            posts,
            ideas,
        })
    }
}
