use axum::middleware;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::AppState;
use super::auth::require_auth;
use super::handlers;

pub fn create_router(state: AppState) -> Router {
    // Public routes: no authentication required
    let public = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/metrics", get(handlers::metrics::render));

    // Protected API routes: require Bearer token when API_TOKEN is set
    let protected = Router::new()
        // Events
        .route("/api/events", get(handlers::events::list))
        .route("/api/events/:id", get(handlers::events::detail))
        .route("/api/events/:id/analytics", get(handlers::events::analytics))
        .route("/api/events/:id/quote", post(handlers::events::quote))
        // Bets
        .route("/api/bets", post(handlers::bets::place))
        // Users
        .route("/api/users/:id/dashboard", get(handlers::users::dashboard))
        .route("/api/users/:id/bets", get(handlers::users::bets))
        .route("/api/users/:id/rank", get(handlers::users::rank))
        .route("/api/users/:id/activity", get(handlers::users::activity))
        .route("/api/users/:id/streak", get(handlers::users::streak))
        // Leaderboard
        .route("/api/leaderboard", get(handlers::leaderboard::list))
        .route("/api/leaderboard/weekly", get(handlers::leaderboard::weekly))
        .route("/api/leaderboard/monthly", get(handlers::leaderboard::monthly))
        .route("/api/leaderboard/tiers", get(handlers::leaderboard::tiers))
        .route("/api/leaderboard/page/:user_id", get(handlers::leaderboard::page))
        .route("/api/leaderboard/refresh", post(handlers::leaderboard::refresh))
        // WebSocket
        .route("/ws", get(handlers::ws::handler))
        .layer(middleware::from_fn_with_state(state.clone(), require_auth));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    public
        .merge(protected)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
