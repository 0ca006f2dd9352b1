use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::backend::{leaderboard_repo, user_repo, BackendClient};
use crate::betting::format::initials;
use crate::models::{LeaderboardUser, Tier, UserActivity, UserRank};

pub const DEFAULT_LIMIT: u32 = 100;
pub const PERIOD_LIMIT: u32 = 50;
pub const ACTIVITY_LIMIT: u32 = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SortBy {
    #[default]
    TotalWinnings,
    WeeklyEarnings,
    MonthlyEarnings,
    CurrentStreak,
    TotalPoints,
}

impl SortBy {
    pub fn column(&self) -> &'static str {
        match self {
            SortBy::TotalWinnings => "total_winnings",
            SortBy::WeeklyEarnings => "weekly_earnings",
            SortBy::MonthlyEarnings => "monthly_earnings",
            SortBy::CurrentStreak => "current_streak",
            SortBy::TotalPoints => "total_points",
        }
    }
}

/// Read the leaderboard from `leaderboard_view`, falling back to the `users`
/// table if the view cannot be read. Fallback rows carry zero weekly and
/// monthly earnings.
pub async fn get_leaderboard(
    client: &BackendClient,
    limit: u32,
    offset: u32,
    sort_by: SortBy,
) -> anyhow::Result<Vec<LeaderboardUser>> {
    match leaderboard_repo::get_from_view(client, sort_by.column(), limit, offset).await {
        Ok(rows) => Ok(rows),
        Err(e) => {
            tracing::warn!(error = %e, "Leaderboard view failed, falling back to users table");

            // Earnings columns only exist on the view
            let column = match sort_by {
                SortBy::WeeklyEarnings | SortBy::MonthlyEarnings => SortBy::TotalWinnings.column(),
                other => other.column(),
            };

            leaderboard_repo::get_from_users(client, column, limit, offset)
                .await
                .map_err(|e| {
                    tracing::error!(error = %e, "Error fetching leaderboard from users table");
                    e.context("Failed to fetch leaderboard")
                })
        }
    }
}

pub async fn get_weekly_leaderboard(
    client: &BackendClient,
    limit: u32,
) -> anyhow::Result<Vec<LeaderboardUser>> {
    leaderboard_repo::get_from_view(client, SortBy::WeeklyEarnings.column(), limit, 0).await
}

pub async fn get_monthly_leaderboard(
    client: &BackendClient,
    limit: u32,
) -> anyhow::Result<Vec<LeaderboardUser>> {
    leaderboard_repo::get_from_view(client, SortBy::MonthlyEarnings.column(), limit, 0).await
}

/// Rank, ranked population and percentile for one user.
pub async fn get_user_rank(client: &BackendClient, user_id: Uuid) -> anyhow::Result<UserRank> {
    let user = user_repo::get_user(client, user_id)
        .await?
        .ok_or_else(|| anyhow::anyhow!("user {user_id} not found"))?;
    let counted = user_repo::count_ranked_users(client).await?;

    let rank = user.rank_position.unwrap_or(0);
    let total_users = counted.max(1);

    Ok(UserRank {
        rank,
        total_users,
        percentile: percentile(rank, total_users),
    })
}

/// `(total - rank) / total × 100`, rounded to 2 dp with halves going up.
pub fn percentile(rank: i32, total_users: i64) -> Decimal {
    if total_users <= 0 {
        return Decimal::ZERO;
    }
    let total = Decimal::from(total_users);
    ((total - Decimal::from(rank)) / total * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

pub async fn update_user_streak(client: &BackendClient, user_id: Uuid) -> anyhow::Result<i64> {
    leaderboard_repo::user_rpc(client, "update_user_streak", user_id)
        .await
        .map_err(|e| e.context("Failed to update streak"))
}

pub async fn update_user_points(client: &BackendClient, user_id: Uuid) -> anyhow::Result<i64> {
    leaderboard_repo::user_rpc(client, "calculate_user_points", user_id)
        .await
        .map_err(|e| e.context("Failed to calculate points"))
}

/// Recompute rankings, then refresh the materialised view. Only the ranking
/// step is fatal.
pub async fn refresh_leaderboard(client: &BackendClient) -> anyhow::Result<()> {
    leaderboard_repo::update_rankings(client)
        .await
        .map_err(|e| e.context("Failed to refresh leaderboard"))?;

    if let Err(e) = leaderboard_repo::refresh_view(client).await {
        tracing::warn!(error = %e, "Error refreshing leaderboard view");
    }
    Ok(())
}

pub async fn get_user_activity(
    client: &BackendClient,
    user_id: Uuid,
    limit: u32,
) -> anyhow::Result<Vec<UserActivity>> {
    leaderboard_repo::get_user_activity(client, user_id, limit).await
}

/// Append to the activity log. Never fails; errors are logged.
pub async fn log_user_activity(
    client: &BackendClient,
    user_id: Uuid,
    action_type: &str,
    points_earned: i64,
    description: &str,
    metadata: serde_json::Value,
) {
    if let Err(e) = leaderboard_repo::insert_activity(
        client,
        user_id,
        action_type,
        points_earned,
        description,
        metadata,
    )
    .await
    {
        tracing::warn!(error = %e, user_id = %user_id, action_type, "Error logging user activity");
    }
}

// ---------------------------------------------------------------------------
// Tier table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct TierInfo {
    pub tier: Tier,
    pub min_points: i64,
    pub color: &'static str,
    pub benefits: Vec<&'static str>,
}

pub fn tier_info() -> Vec<TierInfo> {
    Tier::ALL
        .iter()
        .map(|&tier| {
            let (color, benefits) = match tier {
                Tier::Bronze => ("#CD7F32", vec!["Basic features"]),
                Tier::Silver => ("#C0C0C0", vec!["Priority support", "5% bonus on wins"]),
                Tier::Gold => (
                    "#FFD700",
                    vec!["VIP support", "10% bonus on wins", "Exclusive events"],
                ),
                Tier::Platinum => (
                    "#E5E4E2",
                    vec!["Personal account manager", "15% bonus on wins", "Early access"],
                ),
                Tier::Diamond => (
                    "#B9F2FF",
                    vec!["Premium features", "20% bonus on wins", "Custom limits"],
                ),
                Tier::Master => (
                    "#FF4D4D",
                    vec!["All features unlocked", "25% bonus on wins", "Exclusive tournaments"],
                ),
            };
            TierInfo {
                tier,
                min_points: tier.min_points(),
                color,
                benefits,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Page layout
// ---------------------------------------------------------------------------

const CHAMPIONS: usize = 10;
const PAGE_SIZE: usize = 25;

#[derive(Debug, Clone, Serialize)]
pub struct RankedPlayer {
    #[serde(flatten)]
    pub player: LeaderboardUser,
    pub initials: String,
    pub is_top3: bool,
}

/// The mobile leaderboard: top 10 champions, then places 11–25.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardPage {
    pub champions: Vec<RankedPlayer>,
    pub rising_stars: Vec<RankedPlayer>,
    pub user_rank: Option<UserRank>,
}

impl LeaderboardPage {
    pub fn build(players: Vec<LeaderboardUser>, user_rank: Option<UserRank>) -> Self {
        let mut ranked = players.into_iter().take(PAGE_SIZE).map(|p| RankedPlayer {
            initials: initials(&p.name),
            is_top3: p.rank_position > 0 && p.rank_position <= 3,
            player: p,
        });

        let champions: Vec<RankedPlayer> = ranked.by_ref().take(CHAMPIONS).collect();
        let rising_stars: Vec<RankedPlayer> = ranked.collect();

        Self {
            champions,
            rising_stars,
            user_rank,
        }
    }
}
