use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::models::{BetOption, Event};

/// Share of the pool distributed to winners (15% house edge).
pub const PAYOUT_RATIO: Decimal = Decimal::from_parts(85, 0, 0, false, 2);

/// Stake used to price options for display when no bet amount is known yet.
pub const DISPLAY_STAKE: Decimal = Decimal::from_parts(100, 0, 0, false, 0);

/// Stake limits for non-admin bettors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BetLimits {
    /// Hard ceiling on a single stake (default 10,000).
    pub max_bet: Decimal,
    /// Lower bound for the pool-share cap so that fresh, empty pools can still
    /// be seeded (default 1,000).
    pub min_pool_cap: Decimal,
}

impl Default for BetLimits {
    fn default() -> Self {
        Self {
            max_bet: Decimal::from(10_000),
            min_pool_cap: Decimal::from(1_000),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BetQuoteError {
    #[error("option {0} does not belong to this event")]
    UnknownOption(Uuid),

    #[error("bet amount must be positive, got {0}")]
    NonPositiveAmount(Decimal),

    #[error("bet amount {0} is too large to price")]
    AmountTooLarge(Decimal),
}

/// Result of pricing a hypothetical bet against the current pool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BetCalculation {
    pub option_id: Uuid,
    pub bet_amount: Decimal,
    pub effective_odds: Decimal,
    pub potential_return: Decimal,
    pub potential_profit: Decimal,
    /// Pre-bet pool after the house edge: `total_pool × 0.85`.
    pub available_pool: Decimal,
    /// `None` means uncapped (admins).
    pub max_bet_amount: Option<Decimal>,
}

/// Price a bet of `bet_amount` on `option_id`.
///
/// Odds reflect the pool *after* the stake is added, so they move on every
/// change of amount or option and the cached `option.odds` is ignored.
pub fn calculate_bet_returns(
    event: &Event,
    option_id: Uuid,
    bet_amount: Decimal,
    user_balance: Decimal,
    is_admin: bool,
    limits: &BetLimits,
) -> Result<BetCalculation, BetQuoteError> {
    if bet_amount <= Decimal::ZERO {
        return Err(BetQuoteError::NonPositiveAmount(bet_amount));
    }

    let option = event
        .option(option_id)
        .ok_or(BetQuoteError::UnknownOption(option_id))?;

    let too_large = || BetQuoteError::AmountTooLarge(bet_amount);
    let available_pool = event
        .total_pool
        .checked_mul(PAYOUT_RATIO)
        .ok_or_else(too_large)?;
    let effective_odds =
        post_bet_odds(event.total_pool, option.total_bets, bet_amount).ok_or_else(too_large)?;
    let potential_return = bet_amount
        .checked_mul(effective_odds)
        .ok_or_else(too_large)?;

    let max_bet_amount = if is_admin {
        None
    } else {
        Some(max_stake(user_balance, available_pool, limits))
    };

    Ok(BetCalculation {
        option_id,
        bet_amount,
        effective_odds,
        potential_return,
        potential_profit: potential_return - bet_amount,
        available_pool,
        max_bet_amount,
    })
}

/// Odds shown next to an option before the user enters an amount. Falls back
/// to the backend's cached odds when the option cannot be priced.
pub fn display_odds(event: &Event, option: &BetOption) -> Decimal {
    match calculate_bet_returns(
        event,
        option.id,
        DISPLAY_STAKE,
        Decimal::ZERO,
        true,
        &BetLimits::default(),
    ) {
        Ok(calc) => calc.effective_odds,
        Err(e) => {
            tracing::debug!(
                event_id = %event.id,
                option_id = %option.id,
                error = %e,
                "Falling back to stored odds"
            );
            option.odds
        }
    }
}

/// Pari-mutuel odds once `stake` joins the pool on an option already backed
/// by `backing`.
///
/// Truncated to 2 dp and floored at 1.0. A pool smaller than the option's
/// backing is treated as equal to it, which keeps the result non-increasing
/// in `stake`. `None` when the sums leave the `Decimal` range.
fn post_bet_odds(total_pool: Decimal, backing: Decimal, stake: Decimal) -> Option<Decimal> {
    let backing = backing.max(Decimal::ZERO);
    let pool_after = total_pool.max(backing).checked_add(stake)?;
    let backing_after = backing.checked_add(stake)?;

    let raw = pool_after
        .checked_mul(PAYOUT_RATIO)?
        .checked_div(backing_after)
        .unwrap_or(Decimal::ONE);

    Some(
        raw.round_dp_with_strategy(2, RoundingStrategy::ToZero)
            .max(Decimal::ONE),
    )
}

/// Largest stake a non-admin may place: balance, the fixed ceiling and the
/// pool-share cap, whichever is lowest.
fn max_stake(user_balance: Decimal, available_pool: Decimal, limits: &BetLimits) -> Decimal {
    let pool_cap = available_pool.max(limits.min_pool_cap);
    user_balance
        .min(limits.max_bet)
        .min(pool_cap)
        .max(Decimal::ZERO)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
