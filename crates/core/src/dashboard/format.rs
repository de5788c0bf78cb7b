//! Display formatting for dashboard figures.

use rust_decimal::{Decimal, RoundingStrategy};

/// Direction of a trend indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trend {
    /// Zero or positive change.
    Up,
    /// Negative change.
    Down,
}

impl Trend {
    /// Trend for a signed percentage.
    #[must_use]
    pub fn of(change: Decimal) -> Self {
        if change.is_sign_negative() && !change.is_zero() {
            Self::Down
        } else {
            Self::Up
        }
    }
}

/// Formats a percentage change as `+12.5%` / `-3%`.
#[must_use]
pub fn trend_label(change: Decimal) -> String {
    let change = change.normalize();
    match Trend::of(change) {
        Trend::Up => format!("+{}%", change.abs()),
        Trend::Down => format!("{change}%"),
    }
}

/// Formats an amount as Indian rupees with lakh/crore digit grouping.
///
/// `1234567.8` becomes `₹12,34,567.80`.
#[must_use]
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();
    let text = format!("{:.2}", rounded.abs());
    let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let grouped = group_indian(whole);
    if negative {
        format!("-₹{grouped}.{fraction}")
    } else {
        format!("₹{grouped}.{fraction}")
    }
}

/// Last three digits form one group, the rest groups of two.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);

    let mut groups = Vec::new();
    let mut rest = head;
    while rest.len() > 2 {
        let (left, right) = rest.split_at(rest.len() - 2);
        groups.push(right);
        rest = left;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}
