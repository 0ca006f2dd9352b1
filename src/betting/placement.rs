use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Event, EventStatus, User};

use super::calculator::{calculate_bet_returns, BetCalculation, BetLimits, BetQuoteError};

/// Reasons a bet is refused before it reaches the backend.
#[derive(Debug, Error, PartialEq)]
pub enum PlacementError {
    #[error(transparent)]
    Quote(#[from] BetQuoteError),

    #[error("event is {0}, not accepting bets")]
    EventNotActive(EventStatus),

    #[error("event expired at {0}")]
    EventExpired(DateTime<Utc>),

    #[error("insufficient balance: bet {amount}, available {balance}")]
    InsufficientBalance { amount: Decimal, balance: Decimal },

    #[error("bet {amount} exceeds maximum {max}")]
    ExceedsMaximum { amount: Decimal, max: Decimal },
}

/// Check a bet the way the betting form gates its submit button, and return
/// the quote it would be placed at.
pub fn validate_placement(
    event: &Event,
    user: &User,
    option_id: Uuid,
    amount: Decimal,
    now: DateTime<Utc>,
    limits: &BetLimits,
) -> Result<BetCalculation, PlacementError> {
    let calc =
        calculate_bet_returns(event, option_id, amount, user.balance, user.is_admin, limits)?;

    if event.status != EventStatus::Active {
        return Err(PlacementError::EventNotActive(event.status));
    }
    if event.expires_at <= now {
        return Err(PlacementError::EventExpired(event.expires_at));
    }

    if !user.is_admin {
        if amount > user.balance {
            return Err(PlacementError::InsufficientBalance {
                amount,
                balance: user.balance,
            });
        }
        if let Some(max) = calc.max_bet_amount {
            if amount > max {
                return Err(PlacementError::ExceedsMaximum { amount, max });
            }
        }
    }

    Ok(calc)
}
