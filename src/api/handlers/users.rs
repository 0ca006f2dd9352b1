use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{bet_repo, user_repo};
use crate::betting::format_inr;
use crate::betting::outcome::{summarize_bets, BetSummary};
use crate::errors::AppError;
use crate::models::{Bet, Tier, User, UserActivity, UserRank};
use crate::services::leaderboard::{self, ACTIVITY_LIMIT};
use crate::services::streak_manager::{self, StreakCheck};
use crate::streak::{banner_message, warning_status, StreakWarning};
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub struct StreakView {
    #[serde(flatten)]
    pub check: StreakCheck,
    pub warning: StreakWarning,
    pub banner: Option<String>,
}

impl From<StreakCheck> for StreakView {
    fn from(check: StreakCheck) -> Self {
        Self {
            warning: warning_status(check.hours_remaining),
            banner: banner_message(check.hours_remaining, check.current_streak),
            check,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub user: User,
    pub balance_display: String,
    pub tier: Tier,
    pub bets: BetSummary,
    pub streak: StreakView,
}

/// Everything the home screen shows. Loading it also applies the streak
/// rule, so an expired streak is reset here.
pub async fn dashboard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Dashboard>>, AppError> {
    let now = Utc::now();
    let streak = streak_manager::check_and_update_streak_status(&state.backend, id, now).await;

    let user = user_repo::get_user(&state.backend, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {id}")))?;
    let bets = bet_repo::get_user_bets(&state.backend, id).await?;

    Ok(Json(ApiResponse::ok(Dashboard {
        balance_display: format_inr(user.balance),
        tier: Tier::from_name(user.tier.as_deref().unwrap_or_default()),
        bets: summarize_bets(&bets),
        streak: streak.into(),
        user,
    })))
}

pub async fn bets(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<Vec<Bet>>> {
    let result = bet_repo::get_user_bets(&state.backend, id).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, user_id = %id, "Failed to fetch user bets");
    }
    Json(result.into())
}

pub async fn rank(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<UserRank>> {
    let result = leaderboard::get_user_rank(&state.backend, id).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, user_id = %id, "Error fetching user rank");
    }
    Json(result.into())
}

#[derive(Debug, Deserialize)]
pub struct ActivityParams {
    pub limit: Option<u32>,
}

pub async fn activity(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(params): Query<ActivityParams>,
) -> Json<ApiResponse<Vec<UserActivity>>> {
    let limit = params.limit.unwrap_or(ACTIVITY_LIMIT);
    let result = leaderboard::get_user_activity(&state.backend, id, limit).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, user_id = %id, "Error fetching user activity");
    }
    Json(result.into())
}

pub async fn streak(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Json<ApiResponse<StreakView>> {
    let check =
        streak_manager::check_and_update_streak_status(&state.backend, id, Utc::now()).await;
    Json(ApiResponse::ok(check.into()))
}
