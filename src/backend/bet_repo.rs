use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::models::Bet;

use super::client::{BackendClient, Query};

/// All bets of a user, newest first.
pub async fn get_user_bets(client: &BackendClient, user_id: Uuid) -> anyhow::Result<Vec<Bet>> {
    let query = Query::table("bets")
        .eq("user_id", user_id)
        .order_desc("placed_at");

    Ok(client.select(&query).await?)
}

#[derive(Deserialize)]
struct PlacedAt {
    placed_at: DateTime<Utc>,
}

/// Timestamp of the user's most recent bet.
pub async fn get_last_bet_time(
    client: &BackendClient,
    user_id: Uuid,
) -> anyhow::Result<Option<DateTime<Utc>>> {
    let query = Query::table("bets")
        .select("placed_at")
        .eq("user_id", user_id)
        .order_desc("placed_at");

    let row: Option<PlacedAt> = client.select_optional(&query).await?;
    Ok(row.map(|r| r.placed_at))
}

/// Place a bet through the `place_bet` procedure, which debits the balance
/// and updates the pool atomically on the backend.
pub async fn place_bet(
    client: &BackendClient,
    user_id: Uuid,
    event_id: Uuid,
    option_id: Uuid,
    amount: Decimal,
) -> anyhow::Result<Bet> {
    let args = json!({
        "user_uuid": user_id,
        "event_uuid": event_id,
        "option_uuid": option_id,
        "bet_amount": amount,
    });

    Ok(client.rpc("place_bet", &args).await?)
}
