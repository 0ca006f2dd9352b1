use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::{Bet, BetStatus, Event, EventStatus};

/// Result of a bet as seen on the event card. Once the event is resolved
/// with a winner, the outcome is read from the event rather than the bet row,
/// which may not have been settled yet.
pub fn bet_result(event: &Event, bet: &Bet) -> BetStatus {
    match (event.status, event.winning_option) {
        (EventStatus::Resolved, Some(winner)) if bet.option_id == winner => BetStatus::Won,
        (EventStatus::Resolved, Some(_)) => BetStatus::Lost,
        _ => bet.status,
    }
}

/// Consecutive wins among resolved bets, newest first.
pub fn winning_run(bets: &[Bet]) -> u32 {
    let mut resolved: Vec<&Bet> = bets.iter().filter(|b| b.status.is_resolved()).collect();
    resolved.sort_by(|a, b| b.placed_at.cmp(&a.placed_at));

    resolved
        .iter()
        .take_while(|b| b.status == BetStatus::Won)
        .count() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct BetSummary {
    pub active_bets: usize,
    pub active_amount: Decimal,
    pub won_bets: usize,
    pub resolved_bets: usize,
    pub winning_run: u32,
}

pub fn summarize_bets(bets: &[Bet]) -> BetSummary {
    let active: Vec<&Bet> = bets.iter().filter(|b| b.status == BetStatus::Active).collect();

    BetSummary {
        active_bets: active.len(),
        active_amount: active.iter().map(|b| b.amount).sum(),
        won_bets: bets.iter().filter(|b| b.status == BetStatus::Won).count(),
        resolved_bets: bets.iter().filter(|b| b.status.is_resolved()).count(),
        winning_run: winning_run(bets),
    }
}
