use rust_decimal::Decimal;
use serde::Serialize;
use uuid::Uuid;

use crate::models::Event;

use super::calculator::PAYOUT_RATIO;

/// Share of the pool backing one option.
#[derive(Debug, Clone, Serialize)]
pub struct OptionShare {
    pub option_id: Uuid,
    pub label: String,
    pub total_bets: Decimal,
    pub bettors: i64,
    /// Percent of the total pool.
    pub percentage: Decimal,
    /// Percent of the post-edge payout pool.
    pub available_percentage: Decimal,
}

#[derive(Debug, Clone, Serialize)]
pub struct PoolAnalytics {
    pub event_id: Uuid,
    pub total_pool: Decimal,
    pub available_pool: Decimal,
    pub options: Vec<OptionShare>,
    /// Gap in percentage points between the most and least backed options.
    pub spread: Decimal,
}

/// Live pool distribution for an event. An empty pool is treated as 1 so the
/// shares come out as zero instead of dividing by zero.
pub fn pool_analytics(event: &Event) -> PoolAnalytics {
    let total_pool = if event.total_pool > Decimal::ZERO {
        event.total_pool
    } else {
        Decimal::ONE
    };
    let available_pool = total_pool * PAYOUT_RATIO;

    let options: Vec<OptionShare> = event
        .options
        .iter()
        .map(|o| OptionShare {
            option_id: o.id,
            label: o.label.clone(),
            total_bets: o.total_bets,
            bettors: o.bettors,
            percentage: share(o.total_bets, total_pool),
            available_percentage: share(o.total_bets, available_pool),
        })
        .collect();

    let max = options.iter().map(|o| o.percentage).max().unwrap_or_default();
    let min = options.iter().map(|o| o.percentage).min().unwrap_or_default();

    PoolAnalytics {
        event_id: event.id,
        total_pool: event.total_pool,
        available_pool: event.total_pool * PAYOUT_RATIO,
        options,
        spread: max.saturating_sub(min),
    }
}

/// `part / whole × 100` to 2 dp, saturating on nonsense backend figures.
fn share(part: Decimal, whole: Decimal) -> Decimal {
    part.checked_div(whole)
        .and_then(|r| r.checked_mul(Decimal::ONE_HUNDRED))
        .map_or(Decimal::MAX, |p| p.round_dp(2))
}
