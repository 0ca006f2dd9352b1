pub mod bet_placement;
pub mod leaderboard;
pub mod odds_poller;
pub mod streak_checker;
pub mod streak_manager;
