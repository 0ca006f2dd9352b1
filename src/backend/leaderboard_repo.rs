use serde_json::json;
use uuid::Uuid;

use crate::models::{LeaderboardUser, UserActivity};

use super::client::{BackendClient, Query};

/// Columns read from `users` when the leaderboard view is unavailable.
const USER_LEADERBOARD_COLUMNS: &str = "
    id,
    name,
    total_points,
    rank_position,
    tier,
    current_streak,
    longest_streak,
    total_winnings,
    total_bets,
    balance,
    is_verified,
    achievements,
    created_at
";

pub async fn get_from_view(
    client: &BackendClient,
    sort_column: &str,
    limit: u32,
    offset: u32,
) -> anyhow::Result<Vec<LeaderboardUser>> {
    let query = Query::table("leaderboard_view")
        .order_desc(sort_column)
        .limit(limit)
        .offset(offset);

    Ok(client.select(&query).await?)
}

pub async fn get_from_users(
    client: &BackendClient,
    sort_column: &str,
    limit: u32,
    offset: u32,
) -> anyhow::Result<Vec<LeaderboardUser>> {
    let query = Query::table("users")
        .select(USER_LEADERBOARD_COLUMNS)
        .order_desc(sort_column)
        .limit(limit)
        .offset(offset);

    Ok(client.select(&query).await?)
}

pub async fn get_user_activity(
    client: &BackendClient,
    user_id: Uuid,
    limit: u32,
) -> anyhow::Result<Vec<UserActivity>> {
    let query = Query::table("user_activity_log")
        .eq("user_id", user_id)
        .order_desc("created_at")
        .limit(limit);

    Ok(client.select(&query).await?)
}

pub async fn insert_activity(
    client: &BackendClient,
    user_id: Uuid,
    action_type: &str,
    points_earned: i64,
    description: &str,
    metadata: serde_json::Value,
) -> anyhow::Result<()> {
    let row = json!({
        "user_id": user_id,
        "action_type": action_type,
        "points_earned": points_earned,
        "description": description,
        "metadata": metadata,
    });
    client.insert("user_activity_log", &row).await?;
    Ok(())
}

/// Call an RPC that takes the user id and returns an integer, e.g.
/// `update_user_streak` or `calculate_user_points`. `null` reads as 0.
pub async fn user_rpc(
    client: &BackendClient,
    function: &str,
    user_id: Uuid,
) -> anyhow::Result<i64> {
    let value: Option<i64> = client.rpc(function, &json!({ "user_uuid": user_id })).await?;
    Ok(value.unwrap_or(0))
}

pub async fn update_rankings(client: &BackendClient) -> anyhow::Result<()> {
    client.rpc_void("update_leaderboard_rankings", &json!({})).await?;
    Ok(())
}

pub async fn refresh_view(client: &BackendClient) -> anyhow::Result<()> {
    client.rpc_void("refresh_leaderboard", &json!({})).await?;
    Ok(())
}
