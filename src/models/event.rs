use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use super::null_default;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Closed,
    Resolved,
}

impl EventStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventStatus::Active => "active",
            EventStatus::Closed => "closed",
            EventStatus::Resolved => "resolved",
        }
    }
}

impl fmt::Display for EventStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One selectable outcome within an event (`event_options` table).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetOption {
    pub id: Uuid,
    pub label: String,
    /// Odds cached by the backend. Only trusted when a live quote cannot be computed.
    #[serde(default, deserialize_with = "null_default")]
    pub odds: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub total_bets: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub bettors: i64,
}

/// A betting market row with its options embedded
/// (`select=*,event_options(*)`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_default")]
    pub category: String,
    pub status: EventStatus,
    #[serde(default, deserialize_with = "null_default")]
    pub total_pool: Decimal,
    #[serde(default, deserialize_with = "null_default")]
    pub participant_count: i64,
    #[serde(default, alias = "event_options", deserialize_with = "null_default")]
    pub options: Vec<BetOption>,
    #[serde(default)]
    pub winning_option: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub resolved_at: Option<DateTime<Utc>>,
}

impl Event {
    pub fn option(&self, option_id: Uuid) -> Option<&BetOption> {
        self.options.iter().find(|o| o.id == option_id)
    }

    pub fn is_open(&self, now: DateTime<Utc>) -> bool {
        self.status == EventStatus::Active && self.expires_at > now
    }
}
