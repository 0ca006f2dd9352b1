//! The 24-hour streak rule and the warning tiers shown as a streak window
//! runs out. Persistence and resets live in `services::streak_manager`.

use chrono::{DateTime, Utc};
use serde::Serialize;

pub const STREAK_TIMEOUT_HOURS: f64 = 24.0;

const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakValidation {
    pub should_reset: bool,
    /// Milliseconds since the last bet; zero when the user has never bet.
    pub time_since_last_bet_ms: i64,
    pub hours_remaining: f64,
    pub is_expired: bool,
}

/// Evaluate the 24-hour window against the user's latest bet.
pub fn validate_streak_status(
    last_bet: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> StreakValidation {
    let Some(last_bet) = last_bet else {
        return StreakValidation {
            should_reset: false,
            time_since_last_bet_ms: 0,
            hours_remaining: STREAK_TIMEOUT_HOURS,
            is_expired: false,
        };
    };

    let elapsed_ms = (now - last_bet).num_milliseconds();
    let elapsed_hours = elapsed_ms as f64 / MS_PER_HOUR;
    let is_expired = elapsed_hours > STREAK_TIMEOUT_HOURS;

    StreakValidation {
        should_reset: is_expired,
        time_since_last_bet_ms: elapsed_ms,
        hours_remaining: (STREAK_TIMEOUT_HOURS - elapsed_hours).max(0.0),
        is_expired,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StreakWarning {
    pub show_warning: bool,
    pub urgency_level: UrgencyLevel,
    pub message: String,
}

/// Warning tier for the remaining window: ≤2h high, ≤6h medium, ≤12h low.
pub fn warning_status(hours_remaining: f64) -> StreakWarning {
    let hours = hours_remaining.floor() as i64;

    let (urgency_level, message) = if hours_remaining <= 2.0 {
        (UrgencyLevel::High, format!("Only {hours} hours left to maintain your streak!"))
    } else if hours_remaining <= 6.0 {
        (UrgencyLevel::Medium, format!("{hours} hours remaining to keep your streak alive"))
    } else if hours_remaining <= 12.0 {
        (UrgencyLevel::Low, format!("{hours} hours left in your streak window"))
    } else {
        return StreakWarning {
            show_warning: false,
            urgency_level: UrgencyLevel::Low,
            message: String::new(),
        };
    };

    StreakWarning {
        show_warning: true,
        urgency_level,
        message,
    }
}

/// Dashboard banner text. Only shown for a live streak with under 12 hours
/// left.
pub fn banner_message(hours_remaining: f64, current_streak: i32) -> Option<String> {
    if hours_remaining >= 12.0 || current_streak == 0 {
        return None;
    }

    let hours = hours_remaining.floor() as i64;
    let minutes = ((hours_remaining % 1.0) * 60.0).floor() as i64;

    let message = match hours {
        0 => format!("Only {minutes} minutes left to maintain your {current_streak}-day streak!"),
        1 if minutes > 0 => {
            format!("1 hour {minutes}m left to keep your {current_streak}-day streak alive")
        }
        1 => format!("1 hour left to keep your {current_streak}-day streak alive"),
        _ => format!("{hours} hours remaining to maintain your {current_streak}-day streak"),
    };
    Some(message)
}
