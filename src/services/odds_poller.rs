use std::collections::HashMap;

use rust_decimal::Decimal;
use serde::Serialize;
use tokio::sync::broadcast;
use tokio::time::{interval, Duration};
use uuid::Uuid;

use crate::api::ws_types::WsMessage;
use crate::backend::{event_repo, BackendClient};
use crate::betting::display_odds;
use crate::models::{Event, EventStatus};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OptionOdds {
    pub id: Uuid,
    pub label: String,
    pub odds: Decimal,
    pub total_bets: Decimal,
    pub bettors: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct OddsUpdate {
    pub event_id: Uuid,
    pub total_pool: Decimal,
    pub options: Vec<OptionOdds>,
}

type Snapshot = HashMap<Uuid, Vec<OptionOdds>>;

fn option_odds(event: &Event) -> Vec<OptionOdds> {
    event
        .options
        .iter()
        .map(|o| OptionOdds {
            id: o.id,
            label: o.label.clone(),
            odds: display_odds(event, o),
            total_bets: o.total_bets,
            bettors: o.bettors,
        })
        .collect()
}

/// Compare fresh events with the last snapshot and return updates for the
/// events whose options moved. Events seen for the first time only seed the
/// snapshot. Events no longer listed are dropped from it.
pub fn diff_odds(snapshot: &mut Snapshot, events: &[Event]) -> Vec<OddsUpdate> {
    let mut updates = Vec::new();
    let mut next: Snapshot = HashMap::with_capacity(events.len());

    for event in events {
        let current = option_odds(event);
        if let Some(previous) = snapshot.get(&event.id) {
            if *previous != current {
                updates.push(OddsUpdate {
                    event_id: event.id,
                    total_pool: event.total_pool,
                    options: current.clone(),
                });
            }
        }
        next.insert(event.id, current);
    }

    *snapshot = next;
    updates
}

/// Poll active events and broadcast odds changes to WebSocket subscribers.
pub async fn run_odds_poller(
    client: BackendClient,
    interval_secs: u64,
    ws_tx: broadcast::Sender<WsMessage>,
) {
    let mut ticker = interval(Duration::from_secs(interval_secs));
    let mut snapshot = Snapshot::new();

    loop {
        ticker.tick().await;

        let events = match event_repo::get_events(&client, Some(EventStatus::Active)).await {
            Ok(e) => e,
            Err(e) => {
                tracing::error!(error = %e, "Odds poller: failed to fetch active events");
                continue;
            }
        };

        for update in diff_odds(&mut snapshot, &events) {
            tracing::debug!(event_id = %update.event_id, "Odds changed");
            metrics::counter!("odds_updates_total").increment(1);
            // No receivers is fine: nobody is watching right now
            let _ = ws_tx.send(WsMessage::OddsUpdate(update));
        }
    }
}
