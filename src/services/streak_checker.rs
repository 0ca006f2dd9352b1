use chrono::Utc;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};

use crate::api::ws_types::{StreakResetNotice, WsMessage};
use crate::backend::{user_repo, BackendClient};

use super::streak_manager::check_and_update_streak_status;

/// Periodically apply the 24-hour rule to every user holding a streak and
/// notify WebSocket subscribers of resets.
pub async fn run_streak_checker(
    client: BackendClient,
    interval_secs: u64,
    ws_tx: broadcast::Sender<WsMessage>,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));

    loop {
        ticker.tick().await;

        let users = match user_repo::get_streaking_users(&client).await {
            Ok(u) => u,
            Err(e) => {
                tracing::error!(error = %e, "Streak checker: failed to fetch users");
                continue;
            }
        };

        tracing::debug!(users = users.len(), "Streak checker: checking users");

        for user in &users {
            let check = check_and_update_streak_status(&client, user.id, Utc::now()).await;
            if !check.streak_reset {
                continue;
            }

            if let Some(message) = check.message {
                let _ = ws_tx.send(WsMessage::StreakReset(StreakResetNotice {
                    user_id: user.id,
                    message,
                }));
            }
        }
    }
}
