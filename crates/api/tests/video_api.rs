//! HTTP-level integration tests for `/api/v1/videos`: aggregated tags,
//! provenance, tag-aware search and clip import.

mod common;

use axum::http::StatusCode;
use common::{body_json, delete, get, post_json, put_json};
use serde_json::{json, Value};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// A keynote video whose clips carry the topical tags.
async fn seed_keynote(pool: &PgPool) -> String {
    let video = common::create(
        pool,
        "/api/v1/videos",
        json!({"title": "Annual keynote", "subject_name": "Dr. Mehta", "tags": ["keynote"]}),
    )
    .await;
    let id = video["id"].as_str().unwrap().to_string();

    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/clips/batch",
        json!([
            {"video_id": id, "start_time": "00:10", "end_time": "00:40",
             "description": "Ethics", "tags": ["AI-ethics", "healthcare"]},
            {"video_id": id, "start_time": "01:00", "end_time": "01:30",
             "description": "Privacy", "tags": ["healthcare", "data-privacy"]},
        ]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    id
}

fn strings(value: &Value) -> Vec<&str> {
    value
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Aggregated reads
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_video_includes_aggregated_tags(pool: PgPool) {
    let id = seed_keynote(&pool).await;

    let response = get(common::build_test_app(pool), &format!("/api/v1/videos/{id}")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["title"], "Annual keynote");
    assert_eq!(json["status"], "draft");
    assert_eq!(strings(&json["manual_tags"]), vec!["keynote"]);
    assert_eq!(
        strings(&json["clip_tags"]),
        vec!["AI-ethics", "healthcare", "data-privacy"]
    );
    assert_eq!(
        strings(&json["all_tags"]),
        vec!["keynote", "AI-ethics", "healthcare", "data-privacy"]
    );
    assert_eq!(json["clips"].as_array().unwrap().len(), 2);
    assert_eq!(json["posts"], json!([]));
    assert!(json["program"].is_null());
    assert!(json.get("degraded_sources").is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_video_without_tags_or_clips(pool: PgPool) {
    let video = common::create(&pool, "/api/v1/videos", json!({"title": "Bare"})).await;
    let id = video["id"].as_str().unwrap();

    let json = body_json(get(common::build_test_app(pool), &format!("/api/v1/videos/{id}")).await).await;
    assert_eq!(json["manual_tags"], json!([]));
    assert_eq!(json["clip_tags"], json!([]));
    assert_eq!(json["all_tags"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_videos_with_program(pool: PgPool) {
    let program = common::create(&pool, "/api/v1/programs", json!({"name": "CSP"})).await;
    let program_id = program["id"].as_str().unwrap();
    common::create(
        &pool,
        "/api/v1/videos",
        json!({"title": "In CSP", "program_id": program_id}),
    )
    .await;
    common::create(&pool, "/api/v1/videos", json!({"title": "Elsewhere"})).await;

    let response = get(
        common::build_test_app(pool),
        &format!("/api/v1/videos?program_id={program_id}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "In CSP");
    assert_eq!(data[0]["program"]["name"], "CSP");
    assert!(data[0].get("posts").is_none(), "Listings omit posts");
}

// ---------------------------------------------------------------------------
// Provenance
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_source_endpoint(pool: PgPool) {
    let id = seed_keynote(&pool).await;
    let video = common::create(&pool, "/api/v1/videos", json!({"title": "Other", "tags": ["healthcare"]})).await;
    let other_id = video["id"].as_str().unwrap();

    for (video_id, tag, expected) in [
        (id.as_str(), "keynote", json!("manual")),
        (id.as_str(), "healthcare", json!("clips")),
        (id.as_str(), "robotics", Value::Null),
        (other_id, "healthcare", json!("manual")),
    ] {
        let response = get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/videos/{video_id}/tags/{tag}/source"),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["tag"], tag);
        assert_eq!(json["source"], expected, "source of {tag}");
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tag_in_both_sources(pool: PgPool) {
    let video = common::create(&pool, "/api/v1/videos", json!({"title": "T", "tags": ["ai"]})).await;
    let id = video["id"].as_str().unwrap();
    common::create(
        &pool,
        "/api/v1/clips",
        json!({"video_id": id, "start_time": "00:00", "end_time": "00:10",
               "description": "A", "tags": ["ai"]}),
    )
    .await;

    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/videos/{id}/tags/ai/source"),
        )
        .await,
    )
    .await;
    assert_eq!(json["source"], "both");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_tags_by_source_endpoint(pool: PgPool) {
    let id = seed_keynote(&pool).await;

    let json = body_json(
        get(
            common::build_test_app(pool.clone()),
            &format!("/api/v1/videos/{id}/tags?source=clips"),
        )
        .await,
    )
    .await;
    assert_eq!(json["source"], "clips");
    assert_eq!(
        strings(&json["tags"]),
        vec!["AI-ethics", "healthcare", "data-privacy"]
    );
    assert_eq!(json["stats"], json!({"total": 4, "manual": 1, "from_clips": 3}));

    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/videos/{id}/tags"),
        )
        .await,
    )
    .await;
    assert_eq!(json["source"], "all");
    assert_eq!(json["tags"].as_array().unwrap().len(), 4);
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_matches_clip_tags(pool: PgPool) {
    let id = seed_keynote(&pool).await;
    common::create(&pool, "/api/v1/videos", json!({"title": "Cooking show"})).await;

    let json = body_json(
        get(common::build_test_app(pool), "/api/v1/videos?q=healthcare").await,
    )
    .await;
    let data = json["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["id"], id.as_str());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_by_subject_is_case_insensitive(pool: PgPool) {
    seed_keynote(&pool).await;

    let json = body_json(get(common::build_test_app(pool), "/api/v1/videos?q=MEHTA").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_search_lists_everything(pool: PgPool) {
    seed_keynote(&pool).await;
    common::create(&pool, "/api/v1/videos", json!({"title": "Second"})).await;

    let json = body_json(get(common::build_test_app(pool), "/api/v1/videos?q=").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_search_term_is_not_trimmed(pool: PgPool) {
    seed_keynote(&pool).await;

    let json = body_json(
        get(common::build_test_app(pool.clone()), "/api/v1/videos?q=healthcare%20").await,
    )
    .await;
    assert!(json["data"].as_array().unwrap().is_empty());

    let json = body_json(get(common::build_test_app(pool), "/api/v1/videos?q=healthcare").await).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 1);
}

// ---------------------------------------------------------------------------
// Writes and validation
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_update_video_replaces_manual_tags_only(pool: PgPool) {
    let id = seed_keynote(&pool).await;

    let response = put_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/videos/{id}"),
        json!({"tags": ["summit"], "status": "review"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "review");
    assert_eq!(json["tags"], r#"["summit"]"#);

    let json = body_json(get(common::build_test_app(pool), &format!("/api/v1/videos/{id}")).await).await;
    assert_eq!(
        strings(&json["all_tags"]),
        vec!["summit", "AI-ethics", "healthcare", "data-privacy"]
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_invalid_status_returns_400(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool.clone()),
        "/api/v1/videos",
        json!({"title": "T", "status": "archived"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");

    let response = get(common::build_test_app(pool), "/api/v1/videos?status=archived").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_unknown_program_returns_400(pool: PgPool) {
    let response = post_json(
        common::build_test_app(pool),
        "/api/v1/videos",
        json!({"title": "T", "program_id": "00000000-0000-4000-8000-000000000000"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_video_returns_404(pool: PgPool) {
    let missing = "00000000-0000-4000-8000-000000000000";
    for uri in [
        format!("/api/v1/videos/{missing}"),
        format!("/api/v1/videos/{missing}/clips"),
        format!("/api/v1/videos/{missing}/tags/ai/source"),
    ] {
        let response = get(common::build_test_app(pool.clone()), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "GET {uri}");
    }

    let response = delete(
        common::build_test_app(pool),
        &format!("/api/v1/videos/{missing}"),
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Clip import
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_clips_from_text(pool: PgPool) {
    let video = common::create(&pool, "/api/v1/videos", json!({"title": "Panel"})).await;
    let id = video["id"].as_str().unwrap();

    let text = "00:10-01:05 Intro #ai #health-care\n\nnot a clip line\n02:00-02:30 Closing remarks";
    let response = post_json(
        common::build_test_app(pool.clone()),
        &format!("/api/v1/videos/{id}/clips/import"),
        json!({"text": text}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    let created = json["created"].as_array().unwrap();
    assert_eq!(created.len(), 2);
    assert_eq!(created[0]["description"], "Intro");
    assert_eq!(created[0]["start_seconds"], 10);
    assert_eq!(created[0]["end_seconds"], 65);
    assert_eq!(created[0]["duration_seconds"], 55);
    assert_eq!(created[0]["tags"], r#"["ai","health-care"]"#);
    assert_eq!(json["rejected"][0]["line_number"], 3);

    let json = body_json(
        get(
            common::build_test_app(pool),
            &format!("/api/v1/videos/{id}/clips"),
        )
        .await,
    )
    .await;
    let descriptions: Vec<&str> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["description"].as_str().unwrap())
        .collect();
    assert_eq!(descriptions, vec!["Intro", "Closing remarks"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_import_without_valid_lines_returns_400(pool: PgPool) {
    let video = common::create(&pool, "/api/v1/videos", json!({"title": "Panel"})).await;
    let id = video["id"].as_str().unwrap();

    let response = post_json(
        common::build_test_app(pool),
        &format!("/api/v1/videos/{id}/clips/import"),
        json!({"text": "nothing useful here"}),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
}
