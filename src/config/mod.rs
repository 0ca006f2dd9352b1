use rust_decimal::Decimal;
use std::env;

use crate::betting::BetLimits;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,

    // Hosted backend (REST + RPC)
    pub backend_url: String,
    pub backend_api_key: String,

    // Betting limits
    pub max_bet_ceiling: Decimal,
    pub min_pool_cap: Decimal,

    // Background tasks
    pub odds_poller_enabled: bool,
    pub odds_poll_interval_secs: u64,
    pub streak_checker_enabled: bool,
    pub streak_check_interval_secs: u64,

    /// Bearer token for `/api` and `/ws`. Unset disables auth (dev mode).
    pub api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Ok(Self {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".into())
                .parse()?,

            backend_url: env::var("BACKEND_URL")
                .map_err(|_| anyhow::anyhow!("BACKEND_URL must be set"))?,
            backend_api_key: env::var("BACKEND_API_KEY")
                .map_err(|_| anyhow::anyhow!("BACKEND_API_KEY must be set"))?,

            max_bet_ceiling: env::var("MAX_BET_CEILING")
                .unwrap_or_else(|_| "10000".into())
                .parse()
                .unwrap_or(Decimal::from(10_000)),
            min_pool_cap: env::var("MIN_POOL_CAP")
                .unwrap_or_else(|_| "1000".into())
                .parse()
                .unwrap_or(Decimal::from(1_000)),

            odds_poller_enabled: env::var("ODDS_POLLER_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            odds_poll_interval_secs: env::var("ODDS_POLL_INTERVAL_SECS")
                .unwrap_or_else(|_| "15".into())
                .parse()
                .unwrap_or(15),
            streak_checker_enabled: env::var("STREAK_CHECKER_ENABLED")
                .unwrap_or_else(|_| "true".into())
                .parse()
                .unwrap_or(true),
            streak_check_interval_secs: env::var("STREAK_CHECK_INTERVAL_SECS")
                .unwrap_or_else(|_| "1800".into())
                .parse()
                .unwrap_or(1_800),

            api_token: env::var("API_TOKEN").ok().filter(|t| !t.is_empty()),
        })
    }

    pub fn bet_limits(&self) -> BetLimits {
        BetLimits {
            max_bet: self.max_bet_ceiling,
            min_pool_cap: self.min_pool_cap,
        }
    }
}
