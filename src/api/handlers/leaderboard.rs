use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::LeaderboardUser;
use crate::services::leaderboard::{
    self, LeaderboardPage, SortBy, TierInfo, DEFAULT_LIMIT, PERIOD_LIMIT,
};
use crate::AppState;

use super::ApiResponse;

/// Rows fetched for the mobile page before it is split into sections.
const PAGE_FETCH: u32 = 50;

#[derive(Debug, Deserialize)]
pub struct LeaderboardParams {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    #[serde(default)]
    pub sort_by: SortBy,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<LeaderboardParams>,
) -> Json<ApiResponse<Vec<LeaderboardUser>>> {
    let result = leaderboard::get_leaderboard(
        &state.backend,
        params.limit.unwrap_or(DEFAULT_LIMIT),
        params.offset.unwrap_or(0),
        params.sort_by,
    )
    .await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Failed to fetch leaderboard");
    }
    Json(result.into())
}

#[derive(Debug, Deserialize)]
pub struct PeriodParams {
    pub limit: Option<u32>,
}

pub async fn weekly(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Json<ApiResponse<Vec<LeaderboardUser>>> {
    let result = leaderboard::get_weekly_leaderboard(
        &state.backend,
        params.limit.unwrap_or(PERIOD_LIMIT),
    )
    .await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Error fetching weekly leaderboard");
    }
    Json(result.into())
}

pub async fn monthly(
    State(state): State<AppState>,
    Query(params): Query<PeriodParams>,
) -> Json<ApiResponse<Vec<LeaderboardUser>>> {
    let result = leaderboard::get_monthly_leaderboard(
        &state.backend,
        params.limit.unwrap_or(PERIOD_LIMIT),
    )
    .await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "Error fetching monthly leaderboard");
    }
    Json(result.into())
}

pub async fn tiers() -> Json<ApiResponse<Vec<TierInfo>>> {
    Json(ApiResponse::ok(leaderboard::tier_info()))
}

/// Champions, rising stars and the caller's own rank. A failed read leaves
/// the page empty rather than erroring.
pub async fn page(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> Json<ApiResponse<LeaderboardPage>> {
    let (players, rank) = tokio::join!(
        leaderboard::get_leaderboard(&state.backend, PAGE_FETCH, 0, SortBy::TotalPoints),
        leaderboard::get_user_rank(&state.backend, user_id),
    );

    let players = players.unwrap_or_else(|e| {
        tracing::error!(error = %e, "Error loading leaderboard page");
        Vec::new()
    });
    let rank = rank
        .map_err(|e| tracing::warn!(error = %e, user_id = %user_id, "Error loading user rank"))
        .ok();

    Json(ApiResponse::ok(LeaderboardPage::build(players, rank)))
}

pub async fn refresh(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<&'static str>>, AppError> {
    leaderboard::refresh_leaderboard(&state.backend).await?;
    tracing::info!("Leaderboard refreshed");
    Ok(Json(ApiResponse::ok("refreshed")))
}
