//! Integration tests for tag aggregation and tag-aware search on video reads.

use genwise_core::tags::{TagSource, TagStats};
use genwise_core::types::DbId;
use genwise_db::models::clip::CreateClip;
use genwise_db::models::video::{CreateVideo, VideoListParams};
use genwise_db::repositories::{ClipRepo, VideoRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn new_video(title: &str, tags: &[&str]) -> CreateVideo {
    CreateVideo {
        program_id: None,
        title: title.to_string(),
        subject_name: None,
        subject_role: None,
        subject_org: None,
        raw_video_url: None,
        raw_video_drive_id: None,
        edited_video_url: None,
        final_video_url: None,
        thumbnail_url: None,
        transcript_text: None,
        captions_srt_url: None,
        duration_seconds: None,
        recorded_date: None,
        status: None,
        tags: Some(tags.iter().map(|t| t.to_string()).collect()),
    }
}

fn new_clip(video_id: DbId, start: &str, tags: &[&str]) -> CreateClip {
    CreateClip {
        video_id,
        start_time: start.to_string(),
        end_time: "59:00".to_string(),
        start_seconds: None,
        end_seconds: None,
        duration_seconds: None,
        title: None,
        description: format!("Clip at {start}"),
        transcript_snippet: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        extracted_clip_url: None,
    }
}

async fn set_raw_tags(pool: &PgPool, table: &str, id: DbId, raw: &str) {
    sqlx::query(&format!("UPDATE {table} SET tags = $2 WHERE id = $1"))
        .bind(id)
        .bind(raw)
        .execute(pool)
        .await
        .unwrap();
}

// ---------------------------------------------------------------------------
// Test: Aggregation on reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_detail_aggregates_manual_and_clip_tags(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("Talk", &["ai", "ethics"]))
        .await
        .unwrap();
    ClipRepo::create(&pool, &new_clip(video.id, "00:10", &["ai", "robotics"]))
        .await
        .unwrap();
    ClipRepo::create(&pool, &new_clip(video.id, "00:40", &["robotics", "education"]))
        .await
        .unwrap();

    let detail = VideoRepo::find_detail(&pool, video.id).await.unwrap().unwrap();

    assert_eq!(detail.manual_tags, vec!["ai", "ethics"]);
    assert_eq!(detail.clip_tags.to_vec(), vec!["ai", "robotics", "education"]);
    assert_eq!(
        detail.all_tags.to_vec(),
        vec!["ai", "ethics", "robotics", "education"]
    );
    assert_eq!(detail.tag_source("ai"), Some(TagSource::Both));
    assert_eq!(detail.tag_source("ethics"), Some(TagSource::Manual));
    assert_eq!(detail.tag_source("robotics"), Some(TagSource::Clips));
    assert_eq!(detail.tag_source("unknown"), None);
    assert_eq!(
        detail.tag_stats(),
        TagStats {
            total: 4,
            manual: 2,
            from_clips: 3,
        }
    );
    assert_eq!(detail.video.clips.len(), 2);
    assert_eq!(detail.video.posts.as_ref().map(Vec::len), Some(0));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_does_not_leak_clip_tags_between_videos(pool: PgPool) {
    let first = VideoRepo::create(&pool, &new_video("First", &[])).await.unwrap();
    let second = VideoRepo::create(&pool, &new_video("Second", &[])).await.unwrap();
    ClipRepo::create(&pool, &new_clip(first.id, "00:00", &["alpha"]))
        .await
        .unwrap();
    ClipRepo::create(&pool, &new_clip(second.id, "00:00", &["beta"]))
        .await
        .unwrap();

    let videos = VideoRepo::list(&pool, &VideoListParams::default()).await.unwrap();
    assert_eq!(videos.len(), 2);
    for video in &videos {
        let expected = if video.video.video.id == first.id {
            "alpha"
        } else {
            "beta"
        };
        assert_eq!(video.all_tags.to_vec(), vec![expected]);
        assert!(video.video.posts.is_none(), "Listings omit posts");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_malformed_tags_degrade_to_empty(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("Legacy", &[])).await.unwrap();
    set_raw_tags(&pool, "videos", video.id, "not json").await;
    let good = ClipRepo::create(&pool, &new_clip(video.id, "00:00", &["ok"]))
        .await
        .unwrap();
    let bad = ClipRepo::create(&pool, &new_clip(video.id, "00:30", &[]))
        .await
        .unwrap();
    set_raw_tags(&pool, "clips", bad.id, r#"{"tag":"x"}"#).await;

    let detail = VideoRepo::find_detail(&pool, video.id).await.unwrap().unwrap();
    assert!(detail.manual_tags.is_empty());
    assert_eq!(detail.all_tags.to_vec(), vec!["ok"]);
    assert_eq!(detail.degraded_sources, 2);
    assert_eq!(detail.video.clips.len(), 2);
    assert_eq!(detail.video.clips[0].id, good.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_detail_missing_returns_none(pool: PgPool) {
    let result = VideoRepo::find_detail(&pool, DbId::new_v4()).await.unwrap();
    assert!(result.is_none());
}

// ---------------------------------------------------------------------------
// Test: Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_finds_clip_only_tags(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("Panel discussion", &[]))
        .await
        .unwrap();
    ClipRepo::create(&pool, &new_clip(video.id, "00:00", &["robotics"]))
        .await
        .unwrap();
    VideoRepo::create(&pool, &new_video("Unrelated", &["cooking"]))
        .await
        .unwrap();

    let results = VideoRepo::search(&pool, "ROBOT", &VideoListParams::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].video.video.id, video.id);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_title_and_subject(pool: PgPool) {
    let mut by_subject = new_video("Keynote", &[]);
    by_subject.subject_name = Some("Ada Lovelace".to_string());
    VideoRepo::create(&pool, &by_subject).await.unwrap();
    VideoRepo::create(&pool, &new_video("Lovelace retrospective", &[]))
        .await
        .unwrap();

    let results = VideoRepo::search(&pool, "lovelace", &VideoListParams::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_drops_prefilter_false_positives(pool: PgPool) {
    // The raw JSON text contains `","` between tags; no aggregated tag does.
    VideoRepo::create(&pool, &new_video("Plain", &["ai", "ethics"]))
        .await
        .unwrap();

    let results = VideoRepo::search(&pool, "\",\"", &VideoListParams::default())
        .await
        .unwrap();
    assert!(results.is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_escapes_wildcards(pool: PgPool) {
    VideoRepo::create(&pool, &new_video("Anything", &[])).await.unwrap();
    VideoRepo::create(&pool, &new_video("100% focus", &[])).await.unwrap();

    let results = VideoRepo::search(&pool, "%", &VideoListParams::default())
        .await
        .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].video.video.title, "100% focus");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_honors_status_filter(pool: PgPool) {
    let mut published = new_video("AI basics", &[]);
    published.status = Some("published".to_string());
    VideoRepo::create(&pool, &published).await.unwrap();
    VideoRepo::create(&pool, &new_video("AI advanced", &[])).await.unwrap();

    let results = VideoRepo::search(
        &pool,
        "ai",
        &VideoListParams {
            status: Some("published".to_string()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].video.video.title, "AI basics");
}

// ---------------------------------------------------------------------------
// Test: Clip tag lookups
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_clip_search_and_tag_lookup(pool: PgPool) {
    let video = VideoRepo::create(&pool, &new_video("V", &[])).await.unwrap();
    ClipRepo::create(&pool, &new_clip(video.id, "00:00", &["ai-ethics"]))
        .await
        .unwrap();
    ClipRepo::create(&pool, &new_clip(video.id, "01:00", &["robotics"]))
        .await
        .unwrap();

    let by_tag = ClipRepo::list_by_tag(&pool, "ai").await.unwrap();
    assert_eq!(by_tag.len(), 1);
    assert_eq!(by_tag[0].video.id, video.id);
    assert_eq!(by_tag[0].video.title, "V");

    let searched = ClipRepo::search(&pool, "Clip at 01").await.unwrap();
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].clip.tags, r#"["robotics"]"#);

    assert_eq!(ClipRepo::list_all(&pool).await.unwrap().len(), 2);
}
