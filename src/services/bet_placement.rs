use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::backend::{bet_repo, event_repo, user_repo, BackendClient};
use crate::betting::{validate_placement, BetCalculation, BetLimits, PlacementError};
use crate::models::leaderboard::activity_type;
use crate::models::Bet;

use super::leaderboard::log_user_activity;
use super::streak_manager::update_last_bet_timestamp;

#[derive(Debug, Error)]
pub enum PlaceBetError {
    #[error("event {0} not found")]
    EventNotFound(Uuid),

    #[error("user {0} not found")]
    UserNotFound(Uuid),

    #[error(transparent)]
    Rejected(#[from] PlacementError),

    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

#[derive(Debug, Clone)]
pub struct BetRequest {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub option_id: Uuid,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PlacedBet {
    pub bet: Bet,
    pub quote: BetCalculation,
}

/// Validate a bet against fresh event and user state, submit it, then
/// restart the user's streak window and log the activity.
pub async fn place_bet(
    client: &BackendClient,
    request: &BetRequest,
    limits: &BetLimits,
    now: DateTime<Utc>,
) -> Result<PlacedBet, PlaceBetError> {
    let event = event_repo::get_event(client, request.event_id)
        .await?
        .ok_or(PlaceBetError::EventNotFound(request.event_id))?;
    let user = user_repo::get_user(client, request.user_id)
        .await?
        .ok_or(PlaceBetError::UserNotFound(request.user_id))?;

    let quote = match validate_placement(
        &event,
        &user,
        request.option_id,
        request.amount,
        now,
        limits,
    ) {
        Ok(q) => q,
        Err(e) => {
            metrics::counter!("bets_rejected_total").increment(1);
            tracing::info!(
                user_id = %request.user_id,
                event_id = %request.event_id,
                amount = %request.amount,
                reason = %e,
                "Bet rejected"
            );
            return Err(e.into());
        }
    };

    let bet = bet_repo::place_bet(
        client,
        request.user_id,
        request.event_id,
        request.option_id,
        request.amount,
    )
    .await?;

    metrics::counter!("bets_placed_total").increment(1);
    tracing::info!(
        bet_id = %bet.id,
        user_id = %bet.user_id,
        event_id = %bet.event_id,
        amount = %bet.amount,
        odds = %quote.effective_odds,
        "Bet placed"
    );

    update_last_bet_timestamp(client, request.user_id, now).await;

    let label = event
        .option(request.option_id)
        .map(|o| o.label.as_str())
        .unwrap_or_default();
    log_user_activity(
        client,
        request.user_id,
        activity_type::BET_PLACED,
        0,
        &format!("Bet {} on \"{}\" in {}", request.amount, label, event.title),
        json!({
            "bet_id": bet.id,
            "event_id": request.event_id,
            "option_id": request.option_id,
            "amount": request.amount,
            "effective_odds": quote.effective_odds,
        }),
    )
    .await;

    Ok(PlacedBet { bet, quote })
}
