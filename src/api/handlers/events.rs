use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{event_repo, user_repo};
use crate::betting::{
    calculate_bet_returns, display_odds, format_inr, format_odds, format_time_left,
    pool_analytics, BetCalculation, PoolAnalytics,
};
use crate::errors::AppError;
use crate::models::{BetOption, Event, EventStatus};
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Serialize)]
pub struct OptionView {
    #[serde(flatten)]
    pub option: BetOption,
    /// Live odds for a 100-rupee stake, or the stored odds when unavailable.
    pub live_odds: Decimal,
    pub live_odds_display: String,
    pub total_bets_display: String,
}

#[derive(Debug, Serialize)]
pub struct EventView {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: String,
    pub status: EventStatus,
    pub total_pool: Decimal,
    pub total_pool_display: String,
    pub participant_count: i64,
    pub winning_option: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub time_left: String,
    pub options: Vec<OptionView>,
}

impl EventView {
    pub fn new(event: Event, now: DateTime<Utc>) -> Self {
        let options = event
            .options
            .iter()
            .map(|o| {
                let live_odds = display_odds(&event, o);
                OptionView {
                    option: o.clone(),
                    live_odds,
                    live_odds_display: format_odds(live_odds),
                    total_bets_display: format_inr(o.total_bets),
                }
            })
            .collect();

        Self {
            id: event.id,
            time_left: format_time_left(event.expires_at, now),
            total_pool_display: format_inr(event.total_pool),
            title: event.title,
            description: event.description,
            category: event.category,
            status: event.status,
            total_pool: event.total_pool,
            participant_count: event.participant_count,
            winning_option: event.winning_option,
            expires_at: event.expires_at,
            options,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventListParams {
    pub status: Option<EventStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<EventListParams>,
) -> Json<ApiResponse<Vec<EventView>>> {
    let now = Utc::now();
    let result = event_repo::get_events(&state.backend, params.status)
        .await
        .map(|events| events.into_iter().map(|e| EventView::new(e, now)).collect());

    if let Err(e) = &result {
        tracing::error!(error = %e, "Failed to list events");
    }
    Json(result.into())
}

async fn load_event(state: &AppState, id: Uuid) -> Result<Event, AppError> {
    event_repo::get_event(&state.backend, id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("event {id}")))
}

pub async fn detail(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EventView>>, AppError> {
    let event = load_event(&state, id).await?;
    Ok(Json(ApiResponse::ok(EventView::new(event, Utc::now()))))
}

pub async fn analytics(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PoolAnalytics>>, AppError> {
    let event = load_event(&state, id).await?;
    Ok(Json(ApiResponse::ok(pool_analytics(&event))))
}

#[derive(Debug, Deserialize)]
pub struct QuoteRequest {
    pub user_id: Uuid,
    pub option_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub calculation: BetCalculation,
    pub effective_odds_display: String,
    pub potential_return_display: String,
    pub potential_profit_display: String,
    pub available_pool_display: String,
    pub max_bet_display: String,
}

impl From<BetCalculation> for QuoteView {
    fn from(calc: BetCalculation) -> Self {
        let potential_return = calc.potential_return.round();
        Self {
            effective_odds_display: format_odds(calc.effective_odds),
            potential_return_display: format_inr(potential_return),
            potential_profit_display: format_inr(potential_return - calc.bet_amount),
            available_pool_display: format_inr(calc.available_pool),
            max_bet_display: calc
                .max_bet_amount
                .map(format_inr)
                .unwrap_or_else(|| "∞".to_string()),
            calculation: calc,
        }
    }
}

/// Price a bet for the betting form. Recomputed on every amount or option
/// change.
pub async fn quote(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<QuoteRequest>,
) -> Result<Json<ApiResponse<QuoteView>>, AppError> {
    let event = load_event(&state, id).await?;
    let user = user_repo::get_user(&state.backend, req.user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("user {}", req.user_id)))?;

    metrics::counter!("bet_quotes_total").increment(1);

    let calc = calculate_bet_returns(
        &event,
        req.option_id,
        req.amount,
        user.balance,
        user.is_admin,
        &state.config.bet_limits(),
    )?;

    Ok(Json(ApiResponse::ok(calc.into())))
}
