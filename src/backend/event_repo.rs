use uuid::Uuid;

use crate::models::{Event, EventStatus};

use super::client::{BackendClient, Query};

const EVENT_WITH_OPTIONS: &str = "*,event_options(*)";

/// Fetch events with their options, newest first. `None` returns every status.
pub async fn get_events(
    client: &BackendClient,
    status: Option<EventStatus>,
) -> anyhow::Result<Vec<Event>> {
    let mut query = Query::table("events")
        .select(EVENT_WITH_OPTIONS)
        .order_desc("created_at");
    if let Some(status) = status {
        query = query.eq("status", status);
    }

    Ok(client.select(&query).await?)
}

/// Fetch a single event with its options.
pub async fn get_event(client: &BackendClient, event_id: Uuid) -> anyhow::Result<Option<Event>> {
    let query = Query::table("events")
        .select(EVENT_WITH_OPTIONS)
        .eq("id", event_id);

    Ok(client.select_optional(&query).await?)
}
