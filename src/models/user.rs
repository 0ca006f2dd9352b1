use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_default;

/// Row of the `users` table. Every counter here is maintained by the backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub balance: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub total_bets: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub total_winnings: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub is_admin: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub current_streak: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub longest_streak: i32,
    #[serde(default)]
    pub last_activity: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tier: Option<String>,
    #[serde(default)]
    pub rank_position: Option<i32>,
    #[serde(default, deserialize_with = "null_default")]
    pub total_points: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
