use sqlx::PgPool;

/// Full bootstrap test: connect, migrate, verify schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_full_bootstrap(pool: PgPool) {
    genwise_db::health_check(&pool).await.unwrap();

    let tables = ["programs", "videos", "clips", "content_posts"];

    for table in tables {
        let count: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(&pool)
            .await
            .unwrap_or_else(|e| panic!("{table} query failed: {e}"));
        assert_eq!(count.0, 0, "{table} should start empty");
    }
}

/// Status and platform values outside the allowed sets are rejected by the schema.
#[sqlx::test(migrations = "../../db/migrations")]
async fn test_check_constraints_enforced(pool: PgPool) {
    let bad_status = sqlx::query("INSERT INTO videos (title, status) VALUES ('x', 'archived')")
        .execute(&pool)
        .await;
    assert!(bad_status.is_err(), "Unknown video status should fail");

    let bad_platform = sqlx::query("INSERT INTO content_posts (platform) VALUES ('myspace')")
        .execute(&pool)
        .await;
    assert!(bad_platform.is_err(), "Unknown platform should fail");
}
