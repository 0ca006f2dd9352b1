pub mod bet;
pub mod event;
pub mod leaderboard;
pub mod user;

pub use bet::{Bet, BetStatus};
pub use event::{BetOption, Event, EventStatus};
pub use leaderboard::{LeaderboardUser, Tier, UserActivity, UserRank};
pub use user::User;

use serde::{Deserialize, Deserializer};

/// The backend returns `null` for unset counters. Treat those the same as a
/// missing field.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
