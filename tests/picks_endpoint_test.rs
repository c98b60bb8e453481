use axum::http::StatusCode;
use picktally::api::{self, AppState};
use picktally::db::init_db;
use picktally::Repository;
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::util::ServiceExt;

struct TestApp {
    app: axum::Router,
    _temp: TempDir,
}

async fn setup_test_app() -> TestApp {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir
        .path()
        .join("test.db")
        .to_string_lossy()
        .to_string();
    let pool = init_db(&db_path).await.expect("init_db failed");

    let repo = Arc::new(Repository::new(pool));
    let app = api::create_router(AppState { repo });

    TestApp {
        app,
        _temp: temp_dir,
    }
}

async fn request(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = axum::http::Request::builder().method(method).uri(uri);
    let req = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(axum::body::Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(axum::body::Body::empty()).unwrap(),
    };

    let res = app.oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
        .await
        .unwrap();
    // Extractor rejections (e.g. 422 on body validation) carry plain text,
    // not JSON.
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };
    (status, value)
}

async fn create_tipster(app: axum::Router, user: &str) -> String {
    let (status, created) = request(
        app,
        "POST",
        "/v1/tipsters",
        Some(json!({
            "user": user,
            "name": "Tipster",
            "channel": "Telegram",
            "createdDate": "2024-01-01",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    created["id"].as_str().unwrap().to_string()
}

fn pick_body(user: &str, tipster_id: &str, odds: f64, stake: i64, event_date: &str) -> Value {
    json!({
        "user": user,
        "tipsterId": tipster_id,
        "event": "Madrid vs Barcelona",
        "sport": "Football",
        "kind": "pre",
        "betType": "Over 2.5",
        "bookmaker": "Bet365",
        "odds": odds,
        "stake": stake,
        "eventDate": event_date,
        "eventTime": "20:00:00",
    })
}

#[tokio::test]
async fn test_create_pick_defaults_to_pending() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    let (status, pick) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 1.85, 3, "2024-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(pick["result"], "pending");
    assert_eq!(pick["isResolved"], false);
    assert_eq!(pick["profit"], 0.0);
    assert_eq!(pick["placedAt"], "2024-03-10T20:00:00");
}

#[tokio::test]
async fn test_create_pick_advances_last_pick_date() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 1.85, 3, "2024-03-10")),
    )
    .await;
    // A backdated pick must not rewind the date.
    request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 2.0, 2, "2024-02-01")),
    )
    .await;

    let (_, listed) = request(t.app.clone(), "GET", "/v1/tipsters?user=u1", None).await;
    assert_eq!(listed[0]["lastPickDate"], "2024-03-10");
}

#[tokio::test]
async fn test_create_pick_unknown_tipster() {
    let t = setup_test_app().await;

    let (status, _) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", "no-such-tipster", 1.85, 3, "2024-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_pick_rejects_invalid_odds_and_stake() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    // Odds <= 1.0 and stakes outside 1..10 fail body deserialization.
    let (status, _) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 0.9, 3, "2024-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, _) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 1.85, 11, "2024-03-10")),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_create_pick_rejects_fractional_stake() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    let mut body = pick_body("u1", &tipster_id, 1.85, 3, "2024-03-10");
    body["stake"] = json!(2.5);

    let (status, resp) = request(t.app.clone(), "POST", "/v1/picks", Some(body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(resp["error"].as_str().unwrap().contains("whole"));

    // A fractional follow stake stays legal; see the follows tests.
    let (_, listed) = request(t.app.clone(), "GET", "/v1/picks?user=u1", None).await;
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_update_result_accepts_legacy_label() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    let (_, pick) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 1.85, 3, "2024-03-10")),
    )
    .await;
    let id = pick["id"].as_str().unwrap();

    let (status, updated) = request(
        t.app.clone(),
        "PUT",
        &format!("/v1/picks/{}/result", id),
        Some(json!({"user": "u1", "result": "Ganada"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["result"], "won");
    assert_eq!(updated["isResolved"], true);
    // (1.85 - 1) * 3
    assert_eq!(updated["profit"], 2.55);

    let (status, body) = request(
        t.app.clone(),
        "PUT",
        &format!("/v1/picks/{}/result", id),
        Some(json!({"user": "u1", "result": "ganda"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("ganda"));
}

#[tokio::test]
async fn test_list_picks_filters_by_tipster_newest_first() {
    let t = setup_test_app().await;
    let first = create_tipster(t.app.clone(), "u1").await;
    let second = create_tipster(t.app.clone(), "u1").await;

    request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &first, 1.85, 3, "2024-03-10")),
    )
    .await;
    request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &first, 2.0, 2, "2024-03-12")),
    )
    .await;
    request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &second, 3.0, 1, "2024-03-11")),
    )
    .await;

    let (_, all) = request(t.app.clone(), "GET", "/v1/picks?user=u1", None).await;
    assert_eq!(all.as_array().unwrap().len(), 3);
    assert_eq!(all[0]["eventDate"], "2024-03-12");

    let (_, filtered) = request(
        t.app.clone(),
        "GET",
        &format!("/v1/picks?user=u1&tipsterId={}", first),
        None,
    )
    .await;
    let filtered = filtered.as_array().unwrap();
    assert_eq!(filtered.len(), 2);
    assert_eq!(filtered[0]["eventDate"], "2024-03-12");
    assert_eq!(filtered[1]["eventDate"], "2024-03-10");
}

#[tokio::test]
async fn test_delete_pick() {
    let t = setup_test_app().await;
    let tipster_id = create_tipster(t.app.clone(), "u1").await;

    let (_, pick) = request(
        t.app.clone(),
        "POST",
        "/v1/picks",
        Some(pick_body("u1", &tipster_id, 1.85, 3, "2024-03-10")),
    )
    .await;
    let id = pick["id"].as_str().unwrap();

    let (status, body) = request(
        t.app.clone(),
        "DELETE",
        &format!("/v1/picks/{}?user=u1", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["deleted"], true);

    let (_, listed) = request(t.app.clone(), "GET", "/v1/picks?user=u1", None).await;
    assert!(listed.as_array().unwrap().is_empty());

    let (status, _) = request(
        t.app.clone(),
        "DELETE",
        &format!("/v1/picks/{}?user=u1", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
