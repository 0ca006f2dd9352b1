use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

/// Format an amount as whole rupees with Indian digit grouping,
/// e.g. `₹1,23,457`. Paise are rounded half away from zero.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
    let whole = rounded.to_i128().unwrap_or_default();
    let sign = if whole < 0 { "-" } else { "" };
    format!("{sign}₹{}", group_indian(whole.unsigned_abs()))
}

/// `1234567` → `12,34,567`: the last three digits, then pairs.
fn group_indian(n: u128) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();

    format!("{},{}", groups.join(","), tail)
}

/// `2.09` → `2.09x`
pub fn format_odds(odds: Decimal) -> String {
    format!("{:.2}x", odds)
}

/// Countdown label used on event cards.
pub fn format_time_left(expires_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let remaining = (expires_at - now).num_minutes().max(0);
    let hours = remaining / 60;
    let minutes = remaining % 60;

    if hours > 0 {
        format!("{hours}h {minutes}m left")
    } else if minutes > 0 {
        format!("{minutes}m left")
    } else {
        "Expired".to_string()
    }
}

/// Avatar initials: first character of each word.
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|w| w.chars().next())
        .collect()
}
