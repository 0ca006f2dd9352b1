use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

use super::null_default;

// ---------------------------------------------------------------------------
// Tier
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Default)]
pub enum Tier {
    #[default]
    Bronze,
    Silver,
    Gold,
    Platinum,
    Diamond,
    Master,
}

impl Tier {
    pub const ALL: [Tier; 6] = [
        Tier::Bronze,
        Tier::Silver,
        Tier::Gold,
        Tier::Platinum,
        Tier::Diamond,
        Tier::Master,
    ];

    /// Unknown or missing tier names fall back to Bronze.
    pub fn from_name(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "silver" => Tier::Silver,
            "gold" => Tier::Gold,
            "platinum" => Tier::Platinum,
            "diamond" => Tier::Diamond,
            "master" => Tier::Master,
            _ => Tier::Bronze,
        }
    }

    pub fn min_points(&self) -> i64 {
        match self {
            Tier::Bronze => 0,
            Tier::Silver => 2_500,
            Tier::Gold => 10_000,
            Tier::Platinum => 25_000,
            Tier::Diamond => 50_000,
            Tier::Master => 100_000,
        }
    }

    /// Highest tier whose threshold `points` reaches.
    pub fn for_points(points: i64) -> Self {
        Tier::ALL
            .iter()
            .rev()
            .copied()
            .find(|t| points >= t.min_points())
            .unwrap_or_default()
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tier::Bronze => "Bronze",
            Tier::Silver => "Silver",
            Tier::Gold => "Gold",
            Tier::Platinum => "Platinum",
            Tier::Diamond => "Diamond",
            Tier::Master => "Master",
        };
        f.write_str(name)
    }
}

impl<'de> Deserialize<'de> for Tier {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.as_deref().map(Tier::from_name).unwrap_or_default())
    }
}

// ---------------------------------------------------------------------------
// Leaderboard rows
// ---------------------------------------------------------------------------

/// Row of `leaderboard_view`. The same shape is produced from the `users`
/// table when the view is unavailable; the earnings columns then stay zero.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardUser {
    pub id: Uuid,
    pub name: String,
    #[serde(default, deserialize_with = "null_default")]
    pub total_points: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub rank_position: i32,
    #[serde(default)]
    pub tier: Tier,
    #[serde(default, deserialize_with = "null_default")]
    pub current_streak: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub longest_streak: i32,
    #[serde(default, deserialize_with = "null_default")]
    pub total_winnings: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub total_bets: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub balance: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub is_verified: bool,
    #[serde(default, deserialize_with = "null_default")]
    pub achievements: Vec<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_default")]
    pub weekly_earnings: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub monthly_earnings: Decimal,
}

/// Row of `user_activity_log`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserActivity {
    pub id: Uuid,
    pub action_type: String,
    #[serde(default, deserialize_with = "null_default")]
    pub points_earned: i64,
    #[serde(default, deserialize_with = "null_default")]
    pub description: String,
    #[serde(default)]
    pub metadata: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Activity action types written by this service.
pub mod activity_type {
    pub const BET_PLACED: &str = "bet_placed";
    pub const STREAK_BONUS: &str = "streak_bonus";
}

#[derive(Debug, Clone, Serialize)]
pub struct UserRank {
    pub rank: i32,
    pub total_users: i64,
    pub percentile: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_for_points() {
        assert_eq!(Tier::for_points(0), Tier::Bronze);
        assert_eq!(Tier::for_points(2_499), Tier::Bronze);
        assert_eq!(Tier::for_points(2_500), Tier::Silver);
        assert_eq!(Tier::for_points(60_000), Tier::Diamond);
        assert_eq!(Tier::for_points(1_000_000), Tier::Master);
    }

    #[test]
    fn test_unknown_tier_falls_back_to_bronze() {
        let row: LeaderboardUser = serde_json::from_value(serde_json::json!({
            "id": "7f9c24e8-3b12-4fef-91e0-8a6a5cf0b6d1",
            "name": "Asha Rao",
            "tier": "Legend",
            "current_streak": null,
            "achievements": null
        }))
        .unwrap();

        assert_eq!(row.tier, Tier::Bronze);
        assert_eq!(row.current_streak, 0);
        assert!(row.achievements.is_empty());
        assert_eq!(row.weekly_earnings, Decimal::ZERO);
    }

    #[test]
    fn test_null_tier_is_bronze() {
        let row: LeaderboardUser = serde_json::from_value(serde_json::json!({
            "id": "7f9c24e8-3b12-4fef-91e0-8a6a5cf0b6d1",
            "name": "Asha Rao",
            "tier": null,
            "total_points": 12000
        }))
        .unwrap();
        assert_eq!(row.tier, Tier::Bronze);
        assert_eq!(row.total_points, 12_000);
    }
}
