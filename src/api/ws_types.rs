use serde::Serialize;
use uuid::Uuid;

use crate::services::odds_poller::OddsUpdate;

/// Messages broadcast to all connected WebSocket clients.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum WsMessage {
    #[serde(rename = "odds_update")]
    OddsUpdate(OddsUpdate),

    #[serde(rename = "streak_reset")]
    StreakReset(StreakResetNotice),
}

#[derive(Debug, Clone, Serialize)]
pub struct StreakResetNotice {
    pub user_id: Uuid,
    pub message: String,
}
