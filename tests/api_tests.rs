mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use common::{body_json, build_test_app, event_row, user_row, FakeBackend};

const EVENT: Uuid = Uuid::from_u128(0xE1);
const YES: Uuid = Uuid::from_u128(0xA1);
const NO: Uuid = Uuid::from_u128(0xA2);
const USER: Uuid = Uuid::from_u128(0x51);

async fn seeded_backend(balance: i64) -> FakeBackend {
    let backend = FakeBackend::start().await;
    backend.seed("events", event_row(EVENT, 10_000, &[(YES, "Yes", 6_000), (NO, "No", 4_000)]));
    backend.seed("users", user_row(USER, "Ananya Rao", balance));
    backend
}

fn decimal(v: &Value) -> Decimal {
    v.as_str().unwrap().parse().unwrap()
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
}

#[tokio::test]
async fn test_health_check_backend_down() {
    let backend = seeded_backend(1_000).await;
    backend.fail("events");
    let app = build_test_app(&backend, None);

    let resp = app.oneshot(get("/health")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_list_events_with_live_odds() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app.oneshot(get("/api/events?status=active")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(json["success"], true);
    let events = json["data"].as_array().unwrap();
    assert_eq!(events.len(), 1);

    let event = &events[0];
    assert_eq!(event["total_pool_display"], "₹10,000");
    assert!(event["time_left"].as_str().unwrap().ends_with("left"));

    let options = event["options"].as_array().unwrap();
    assert_eq!(options[0]["live_odds_display"], "1.40x");
    assert_eq!(options[1]["live_odds_display"], "2.09x");
    assert_eq!(options[0]["total_bets_display"], "₹6,000");
}

#[tokio::test]
async fn test_list_events_filters_status() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app.oneshot(get("/api/events?status=resolved")).await.unwrap();
    let json = body_json(resp).await;
    assert_eq!(json["data"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_event_not_found() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(get(&format!("/api/events/{}", Uuid::from_u128(0xDEAD))))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let json = body_json(resp).await;
    assert_eq!(json["success"], false);
}

#[tokio::test]
async fn test_event_analytics() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(get(&format!("/api/events/{EVENT}/analytics")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let json = body_json(resp).await;
    assert_eq!(decimal(&json["data"]["available_pool"]), Decimal::from(8_500));
    assert_eq!(json["data"]["options"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_quote() {
    let backend = seeded_backend(5_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            &format!("/api/events/{EVENT}/quote"),
            json!({ "user_id": USER, "option_id": YES, "amount": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(decimal(&data["effective_odds"]), Decimal::new(140, 2));
    assert_eq!(decimal(&data["potential_return"]), Decimal::from(140));
    assert_eq!(decimal(&data["max_bet_amount"]), Decimal::from(5_000));
    assert_eq!(data["effective_odds_display"], "1.40x");
    assert_eq!(data["potential_return_display"], "₹140");
    assert_eq!(data["potential_profit_display"], "₹40");
    assert_eq!(data["max_bet_display"], "₹5,000");
}

#[tokio::test]
async fn test_quote_unknown_option() {
    let backend = seeded_backend(5_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            &format!("/api/events/{EVENT}/quote"),
            json!({ "user_id": USER, "option_id": Uuid::from_u128(0xBAD), "amount": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_non_positive_amount() {
    let backend = seeded_backend(5_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            &format!("/api/events/{EVENT}/quote"),
            json!({ "user_id": USER, "option_id": YES, "amount": 0 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_quote_oversized_amount() {
    let backend = seeded_backend(5_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            &format!("/api/events/{EVENT}/quote"),
            json!({ "user_id": USER, "option_id": YES, "amount": Decimal::MAX.to_string() }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("too large"));
}

#[tokio::test]
async fn test_place_bet_oversized_amount() {
    let backend = seeded_backend(5_000).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            "/api/bets",
            json!({
                "user_id": USER,
                "event_id": EVENT,
                "option_id": YES,
                "amount": Decimal::MAX.to_string(),
            }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(backend.rpc_calls("place_bet").is_empty());
}

#[tokio::test]
async fn test_place_bet() {
    let backend = seeded_backend(5_000).await;
    let bet_id = Uuid::new_v4();
    backend.rpc_result(
        "place_bet",
        json!({
            "id": bet_id,
            "user_id": USER,
            "event_id": EVENT,
            "option_id": YES,
            "amount": 250,
            "status": "active",
            "payout": null,
            "placed_at": Utc::now(),
        }),
    );
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            "/api/bets",
            json!({ "user_id": USER, "event_id": EVENT, "option_id": YES, "amount": 250 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    let json = body_json(resp).await;
    assert_eq!(json["data"]["bet"]["id"], bet_id.to_string());

    let calls = backend.rpc_calls("place_bet");
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0]["user_uuid"], USER.to_string());
    assert_eq!(calls[0]["option_uuid"], YES.to_string());

    // Streak window restarted and activity logged
    let user = &backend.rows("users")[0];
    assert!(!user["last_activity"].is_null());
    let log = backend.rows("user_activity_log");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["action_type"], "bet_placed");
}

#[tokio::test]
async fn test_place_bet_insufficient_balance() {
    let backend = seeded_backend(50).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            "/api/bets",
            json!({ "user_id": USER, "event_id": EVENT, "option_id": YES, "amount": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let json = body_json(resp).await;
    assert!(json["error"].as_str().unwrap().contains("insufficient balance"));
    assert!(backend.rpc_calls("place_bet").is_empty());
}

#[tokio::test]
async fn test_place_bet_on_expired_event() {
    let backend = FakeBackend::start().await;
    let mut event = event_row(EVENT, 1_000, &[(YES, "Yes", 600), (NO, "No", 400)]);
    event["expires_at"] = json!(Utc::now() - Duration::hours(1));
    backend.seed("events", event);
    backend.seed("users", user_row(USER, "Ananya Rao", 5_000));
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            "/api/bets",
            json!({ "user_id": USER, "event_id": EVENT, "option_id": YES, "amount": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(backend.rpc_calls("place_bet").is_empty());
}

#[tokio::test]
async fn test_place_bet_survives_activity_log_failure() {
    let backend = seeded_backend(5_000).await;
    backend.fail("user_activity_log");
    backend.rpc_result(
        "place_bet",
        json!({
            "id": Uuid::new_v4(),
            "user_id": USER,
            "event_id": EVENT,
            "option_id": NO,
            "amount": 100,
            "status": "active",
            "placed_at": Utc::now(),
        }),
    );
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(post_json(
            "/api/bets",
            json!({ "user_id": USER, "event_id": EVENT, "option_id": NO, "amount": 100 }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn test_user_dashboard() {
    let backend = seeded_backend(12_345).await;
    let app = build_test_app(&backend, None);

    let resp = app
        .oneshot(get(&format!("/api/users/{USER}/dashboard")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let data = body_json(resp).await["data"].clone();
    assert_eq!(data["balance_display"], "₹12,345");
    assert_eq!(data["tier"], "Bronze");
    assert_eq!(data["bets"]["active_bets"], 0);
    assert_eq!(data["streak"]["streak_reset"], false);
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let backend = seeded_backend(1_000).await;
    let app = build_test_app(&backend, None);

    let resp = app.oneshot(get("/metrics")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let _text = String::from_utf8(body.to_vec()).unwrap();
    // Metric names may or may not appear depending on global recorder state
    // in tests (only one recorder per process).
}
