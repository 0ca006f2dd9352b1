pub mod analytics;
pub mod calculator;
pub mod format;
pub mod outcome;
pub mod placement;

pub use analytics::{pool_analytics, PoolAnalytics};
pub use calculator::{calculate_bet_returns, display_odds, BetCalculation, BetLimits, BetQuoteError};
pub use format::{format_inr, format_odds, format_time_left};
pub use placement::{validate_placement, PlacementError};
