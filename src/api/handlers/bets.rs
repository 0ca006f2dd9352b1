use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use chrono::Utc;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::bet_placement::{self, BetRequest, PlacedBet};
use crate::AppState;

use super::ApiResponse;

#[derive(Debug, Deserialize)]
pub struct PlaceBetBody {
    pub user_id: Uuid,
    pub event_id: Uuid,
    pub option_id: Uuid,
    pub amount: Decimal,
}

pub async fn place(
    State(state): State<AppState>,
    Json(body): Json<PlaceBetBody>,
) -> Result<(StatusCode, Json<ApiResponse<PlacedBet>>), AppError> {
    let request = BetRequest {
        user_id: body.user_id,
        event_id: body.event_id,
        option_id: body.option_id,
        amount: body.amount,
    };

    let placed = bet_placement::place_bet(
        &state.backend,
        &request,
        &state.config.bet_limits(),
        Utc::now(),
    )
    .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::ok(placed))))
}
