use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::json;
use uuid::Uuid;

use crate::backend::{bet_repo, user_repo, BackendClient};
use crate::models::leaderboard::activity_type;
use crate::streak::{validate_streak_status, STREAK_TIMEOUT_HOURS};

use super::leaderboard::log_user_activity;

/// Warning message threshold for an open streak window.
const WARN_BELOW_HOURS: f64 = 6.0;

#[derive(Debug, Clone, Serialize)]
pub struct StreakData {
    pub current_streak: i32,
    pub longest_streak: i32,
    pub last_bet_at: Option<DateTime<Utc>>,
    pub last_streak_check: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakCheck {
    pub streak_reset: bool,
    pub current_streak: i32,
    pub hours_remaining: f64,
    pub message: Option<String>,
}

impl StreakCheck {
    fn neutral(message: &str) -> Self {
        Self {
            streak_reset: false,
            current_streak: 0,
            hours_remaining: STREAK_TIMEOUT_HOURS,
            message: Some(message.to_string()),
        }
    }
}

/// Load the streak counters and the latest bet time. A failure to read the
/// latest bet is logged and treated as "no bets".
pub async fn get_user_streak_data(
    client: &BackendClient,
    user_id: Uuid,
) -> anyhow::Result<Option<StreakData>> {
    let Some(user) = user_repo::get_user(client, user_id).await? else {
        return Ok(None);
    };

    let last_bet_at = match bet_repo::get_last_bet_time(client, user_id).await {
        Ok(t) => t,
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "Error fetching last bet");
            None
        }
    };

    Ok(Some(StreakData {
        current_streak: user.current_streak,
        longest_streak: user.longest_streak,
        last_bet_at,
        last_streak_check: user.last_activity.or(user.created_at),
    }))
}

/// Zero the streak and log why. Returns whether the reset was stored.
pub async fn reset_user_streak(
    client: &BackendClient,
    user_id: Uuid,
    previous_streak: i32,
    reason: &str,
    now: DateTime<Utc>,
) -> bool {
    tracing::info!(user_id = %user_id, reason, "Resetting streak");

    if let Err(e) = user_repo::reset_streak(client, user_id, now).await {
        tracing::error!(error = %e, user_id = %user_id, "Error resetting user streak");
        return false;
    }

    log_user_activity(
        client,
        user_id,
        activity_type::STREAK_BONUS,
        0,
        &format!("Streak reset: {reason}"),
        json!({
            "reset_reason": reason,
            "reset_timestamp": now,
            "previous_streak": previous_streak,
        }),
    )
    .await;

    metrics::counter!("streak_resets_total").increment(1);
    true
}

/// Apply the 24-hour rule for one user: reset an expired streak and report
/// the remaining window. Never fails; backend errors produce a neutral result.
pub async fn check_and_update_streak_status(
    client: &BackendClient,
    user_id: Uuid,
    now: DateTime<Utc>,
) -> StreakCheck {
    let data = match get_user_streak_data(client, user_id).await {
        Ok(Some(data)) => data,
        Ok(None) => return StreakCheck::neutral("Unable to fetch streak data"),
        Err(e) => {
            tracing::error!(error = %e, user_id = %user_id, "Error fetching user streak data");
            return StreakCheck::neutral("Error checking streak status");
        }
    };

    let validation = validate_streak_status(data.last_bet_at, now);

    if validation.should_reset && data.current_streak > 0 {
        let hours_since = validation.time_since_last_bet_ms / 3_600_000;
        let reason = format!(
            "No bet placed within 24 hours ({hours_since} hours since last bet)"
        );

        if reset_user_streak(client, user_id, data.current_streak, &reason, now).await {
            return StreakCheck {
                streak_reset: true,
                current_streak: 0,
                hours_remaining: STREAK_TIMEOUT_HOURS,
                message: Some(format!(
                    "Your {}-day streak has been reset. Start a new streak by placing a bet!",
                    data.current_streak
                )),
            };
        }
    }

    let message = (validation.hours_remaining < WARN_BELOW_HOURS).then(|| {
        format!(
            "Place a bet within {} hours to maintain your streak!",
            validation.hours_remaining.floor() as i64
        )
    });

    StreakCheck {
        streak_reset: false,
        current_streak: data.current_streak,
        hours_remaining: validation.hours_remaining,
        message,
    }
}

/// Restart the streak window after a bet. Errors are logged only.
pub async fn update_last_bet_timestamp(client: &BackendClient, user_id: Uuid, now: DateTime<Utc>) {
    if let Err(e) = user_repo::touch_last_activity(client, user_id, now).await {
        tracing::warn!(error = %e, user_id = %user_id, "Error updating last bet timestamp");
    }
}
