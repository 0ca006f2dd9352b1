use chrono::{DateTime, Utc};
use serde_json::json;
use uuid::Uuid;

use crate::models::User;

use super::client::{BackendClient, Query};

pub async fn get_user(client: &BackendClient, user_id: Uuid) -> anyhow::Result<Option<User>> {
    let query = Query::table("users").eq("id", user_id);
    Ok(client.select_optional(&query).await?)
}

/// Users currently holding a streak, the only ones the periodic check can
/// reset.
pub async fn get_streaking_users(client: &BackendClient) -> anyhow::Result<Vec<User>> {
    let query = Query::table("users").gt("current_streak", 0);
    Ok(client.select(&query).await?)
}

/// Number of users with any points, the denominator for percentiles.
pub async fn count_ranked_users(client: &BackendClient) -> anyhow::Result<i64> {
    let query = Query::table("users").select("id").gt("total_points", 0);
    Ok(client.count(&query).await?)
}

/// Zero the user's current streak.
pub async fn reset_streak(
    client: &BackendClient,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let body = json!({
        "current_streak": 0,
        "last_activity": now,
        "updated_at": now,
    });
    client
        .update(&Query::table("users").eq("id", user_id), &body)
        .await?;
    Ok(())
}

/// Record activity so the streak window restarts from `now`.
pub async fn touch_last_activity(
    client: &BackendClient,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> anyhow::Result<()> {
    let body = json!({
        "last_activity": now,
        "updated_at": now,
    });
    client
        .update(&Query::table("users").eq("id", user_id), &body)
        .await?;
    Ok(())
}
