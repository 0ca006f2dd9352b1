//! In-process stand-in for the hosted backend's REST and RPC surface.
//!
//! Supports the subset of PostgREST the crate uses: `eq.`/`gt.` filters,
//! `order=col.desc`, `limit`/`offset`, exact counts via `Prefer:
//! count=exact`, inserts, patches and `rpc/{function}` calls.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use uuid::Uuid;

use poolbet::api::router::create_router;
use poolbet::api::ws_types::WsMessage;
use poolbet::backend::BackendClient;
use poolbet::config::AppConfig;
use poolbet::AppState;

const RESERVED_PARAMS: [&str; 4] = ["select", "order", "limit", "offset"];

#[derive(Default)]
pub struct FakeState {
    tables: HashMap<String, Vec<Value>>,
    failing: HashSet<String>,
    rpc_results: HashMap<String, Value>,
    rpc_calls: Vec<(String, Value)>,
}

type Shared = Arc<Mutex<FakeState>>;

#[derive(Clone)]
pub struct FakeBackend {
    state: Shared,
    pub url: String,
}

#[allow(dead_code)]
impl FakeBackend {
    pub async fn start() -> Self {
        let state: Shared = Arc::default();

        let app = Router::new()
            .route("/rest/v1/:table", get(select).post(insert).patch(update))
            .route("/rest/v1/rpc/:function", post(rpc))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind fake backend");
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Self {
            state,
            url: format!("http://{addr}"),
        }
    }

    pub fn client(&self) -> BackendClient {
        BackendClient::new(reqwest::Client::new(), &self.url, "test-key")
    }

    pub fn seed(&self, table: &str, row: Value) {
        let mut state = self.state.lock().unwrap();
        state.tables.entry(table.to_string()).or_default().push(row);
    }

    pub fn rows(&self, table: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state.tables.get(table).cloned().unwrap_or_default()
    }

    /// Make a table or RPC function answer 500.
    pub fn fail(&self, name: &str) {
        self.state.lock().unwrap().failing.insert(name.to_string());
    }

    pub fn rpc_result(&self, function: &str, value: Value) {
        let mut state = self.state.lock().unwrap();
        state.rpc_results.insert(function.to_string(), value);
    }

    pub fn rpc_calls(&self, function: &str) -> Vec<Value> {
        let state = self.state.lock().unwrap();
        state
            .rpc_calls
            .iter()
            .filter(|(f, _)| f == function)
            .map(|(_, args)| args.clone())
            .collect()
    }
}

fn failure(name: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": format!("{name} unavailable") })),
    )
        .into_response()
}

async fn select(
    State(state): State<Shared>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    headers: HeaderMap,
) -> Response {
    let rows = {
        let state = state.lock().unwrap();
        if state.failing.contains(&table) {
            return failure(&table);
        }
        state.tables.get(&table).cloned().unwrap_or_default()
    };

    let mut rows: Vec<Value> = rows.into_iter().filter(|r| matches(r, &params)).collect();
    if let Some(order) = param(&params, "order") {
        let column = order.trim_end_matches(".desc");
        rows.sort_by(|a, b| compare(&b[column], &a[column]));
    }

    let total = rows.len();
    let offset = param(&params, "offset").and_then(|v| v.parse().ok()).unwrap_or(0);
    let limit = param(&params, "limit").and_then(|v| v.parse().ok()).unwrap_or(usize::MAX);
    let page: Vec<Value> = rows.into_iter().skip(offset).take(limit).collect();

    let mut resp = Json(page).into_response();
    let wants_count = headers
        .get("prefer")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("count=exact"));
    if wants_count {
        resp.headers_mut().insert(
            "content-range",
            HeaderValue::from_str(&format!("*/{total}")).unwrap(),
        );
    }
    resp
}

async fn insert(
    State(state): State<Shared>,
    Path(table): Path<String>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.failing.contains(&table) {
        return failure(&table);
    }

    let rows = match body {
        Value::Array(rows) => rows,
        row => vec![row],
    };
    let stored = state.tables.entry(table).or_default();
    for mut row in rows {
        if row.get("id").is_none() {
            row["id"] = json!(Uuid::new_v4());
        }
        if row.get("created_at").is_none() {
            row["created_at"] = json!(Utc::now());
        }
        stored.push(row);
    }
    StatusCode::CREATED.into_response()
}

async fn update(
    State(state): State<Shared>,
    Path(table): Path<String>,
    Query(params): Query<Vec<(String, String)>>,
    Json(body): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    if state.failing.contains(&table) {
        return failure(&table);
    }

    let Some(patch) = body.as_object() else {
        return StatusCode::BAD_REQUEST.into_response();
    };
    if let Some(rows) = state.tables.get_mut(&table) {
        for row in rows.iter_mut().filter(|r| matches(r, &params)) {
            for (k, v) in patch {
                row[k.as_str()] = v.clone();
            }
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

async fn rpc(
    State(state): State<Shared>,
    Path(function): Path<String>,
    Json(args): Json<Value>,
) -> Response {
    let mut state = state.lock().unwrap();
    state.rpc_calls.push((function.clone(), args));
    if state.failing.contains(&function) {
        return failure(&function);
    }
    Json(state.rpc_results.get(&function).cloned().unwrap_or(Value::Null)).into_response()
}

fn param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

fn matches(row: &Value, params: &[(String, String)]) -> bool {
    params
        .iter()
        .filter(|(k, _)| !RESERVED_PARAMS.contains(&k.as_str()))
        .all(|(column, filter)| {
            let field = &row[column.as_str()];
            if let Some(v) = filter.strip_prefix("eq.") {
                text(field) == v
            } else if let Some(v) = filter.strip_prefix("gt.") {
                match (number(field), v.parse::<f64>()) {
                    (Some(a), Ok(b)) => a > b,
                    _ => false,
                }
            } else {
                true
            }
        })
}

fn text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn number(v: &Value) -> Option<f64> {
    match v {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

fn compare(a: &Value, b: &Value) -> Ordering {
    match (number(a), number(b)) {
        (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(Ordering::Equal),
        _ => text(a).cmp(&text(b)),
    }
}

// ---------------------------------------------------------------------------
// App and fixtures
// ---------------------------------------------------------------------------

#[allow(dead_code)]
pub fn test_config(api_token: Option<&str>) -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        backend_url: "http://127.0.0.1".into(),
        backend_api_key: "test-key".into(),
        max_bet_ceiling: rust_decimal::Decimal::from(10_000),
        min_pool_cap: rust_decimal::Decimal::from(1_000),
        odds_poller_enabled: false,
        odds_poll_interval_secs: 15,
        streak_checker_enabled: false,
        streak_check_interval_secs: 1_800,
        api_token: api_token.map(String::from),
    }
}

#[allow(dead_code)]
pub fn build_test_app(backend: &FakeBackend, api_token: Option<&str>) -> Router {
    let (ws_tx, _) = tokio::sync::broadcast::channel::<WsMessage>(16);

    let state = AppState {
        backend: backend.client(),
        config: test_config(api_token),
        ws_tx,
        metrics_handle: poolbet::metrics::init_metrics(),
    };

    create_router(state)
}

/// An active event expiring in a day. `options` are `(id, label, backing)`.
#[allow(dead_code)]
pub fn event_row(id: Uuid, total_pool: i64, options: &[(Uuid, &str, i64)]) -> Value {
    let options: Vec<Value> = options
        .iter()
        .map(|(oid, label, backing)| {
            json!({
                "id": oid,
                "label": label,
                "odds": 1.5,
                "total_bets": backing,
                "bettors": 3,
            })
        })
        .collect();

    json!({
        "id": id,
        "title": "Will it rain in Mumbai tomorrow?",
        "description": null,
        "category": "weather",
        "status": "active",
        "total_pool": total_pool,
        "participant_count": 12,
        "event_options": options,
        "winning_option": null,
        "expires_at": Utc::now() + Duration::hours(24),
        "created_at": Utc::now() - Duration::hours(2),
    })
}

#[allow(dead_code)]
pub fn user_row(id: Uuid, name: &str, balance: i64) -> Value {
    json!({
        "id": id,
        "name": name,
        "balance": balance,
        "total_bets": 0,
        "total_winnings": 0,
        "is_admin": false,
        "current_streak": 0,
        "longest_streak": 0,
        "last_activity": null,
        "tier": "Bronze",
        "rank_position": null,
        "total_points": 0,
        "created_at": Utc::now() - Duration::days(30),
    })
}

#[allow(dead_code)]
pub async fn body_json(resp: Response) -> Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}
