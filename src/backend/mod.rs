pub mod bet_repo;
pub mod client;
pub mod event_repo;
pub mod leaderboard_repo;
pub mod user_repo;

pub use client::{BackendClient, BackendError, Query};
