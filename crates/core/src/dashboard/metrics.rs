//! Dashboard stats computation.

use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use super::types::{DashboardCounts, DashboardData, DateRange, FinancialMetrics, PerformanceMetrics};
use crate::marketplace::{BookingStatus, MarketplaceSnapshot, User};

/// Growth window used when the range leaves it open.
pub const DEFAULT_GROWTH_WINDOW_DAYS: i64 = 30;

/// Dashboard calculations. Stateless; all inputs are explicit.
pub struct DashboardService;

impl DashboardService {
    /// Computes the metrics payload for records created inside `range`.
    ///
    /// Counts and money only consider records created inside the range;
    /// user growth compares the range's window against the window of equal
    /// length right before it.
    #[must_use]
    pub fn compute(
        snapshot: &MarketplaceSnapshot,
        range: &DateRange,
        now: DateTime<Utc>,
    ) -> DashboardData {
        let bookings: Vec<_> = snapshot
            .bookings
            .iter()
            .filter(|b| range.contains(b.created_at))
            .collect();

        let count_status =
            |status: BookingStatus| bookings.iter().filter(|b| b.status == status).count() as u64;

        let completed = count_status(BookingStatus::Completed);
        let total_revenue: Decimal = bookings
            .iter()
            .filter(|b| b.status == BookingStatus::Completed)
            .map(|b| b.amount)
            .sum();

        let counts = DashboardCounts {
            users: snapshot
                .users
                .iter()
                .filter(|u| range.contains(u.created_at))
                .count() as u64,
            providers: snapshot
                .providers
                .iter()
                .filter(|p| range.contains(p.created_at))
                .count() as u64,
            listings: snapshot
                .listings
                .iter()
                .filter(|l| l.active && range.contains(l.created_at))
                .count() as u64,
            bookings: bookings.len() as u64,
            pending_bookings: count_status(BookingStatus::Pending),
            completed_bookings: completed,
            cancelled_bookings: count_status(BookingStatus::Cancelled),
        };

        let financial = FinancialMetrics {
            total_revenue,
            avg_booking_value: Self::average(total_revenue, completed),
        };

        let performance = PerformanceMetrics {
            conversion_rate: Self::percentage(completed, counts.bookings),
            user_growth: Self::user_growth(&snapshot.users, range, now),
        };

        DashboardData {
            counts,
            financial,
            performance,
        }
    }

    /// `total / count` rounded to 2 places, zero when `count` is zero.
    #[must_use]
    pub fn average(total: Decimal, count: u64) -> Decimal {
        if count == 0 {
            return Decimal::ZERO;
        }
        (total / Decimal::from(count)).round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// `part / whole * 100` rounded to 2 places, zero when `whole` is zero.
    #[must_use]
    pub fn percentage(part: u64, whole: u64) -> Decimal {
        if whole == 0 {
            return Decimal::ZERO;
        }
        (Decimal::from(part) * Decimal::ONE_HUNDRED / Decimal::from(whole))
            .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Relative change of `current` over `previous` in percent, 1 place.
    ///
    /// With no previous signups any growth counts as 100%.
    #[must_use]
    pub fn growth(current: u64, previous: u64) -> Decimal {
        if previous == 0 {
            return if current == 0 {
                Decimal::ZERO
            } else {
                Decimal::ONE_HUNDRED
            };
        }
        let current = Decimal::from(current);
        let previous = Decimal::from(previous);
        ((current - previous) * Decimal::ONE_HUNDRED / previous)
            .round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
    }

    fn user_growth(users: &[User], range: &DateRange, now: DateTime<Utc>) -> Decimal {
        let (window_start, window_end) = Self::growth_window(range, now);
        // Ranges near the calendar limits have no previous window
        let previous_start = window_start
            .checked_sub_signed(window_end - window_start)
            .unwrap_or(DateTime::<Utc>::MIN_UTC);

        let current = users
            .iter()
            .filter(|u| u.created_at >= window_start && u.created_at < window_end)
            .count() as u64;
        let previous = users
            .iter()
            .filter(|u| u.created_at >= previous_start && u.created_at < window_start)
            .count() as u64;

        Self::growth(current, previous)
    }

    /// Half-open `[start, end)` window the growth figure is measured over.
    ///
    /// Inverted ranges and bounds that can not be represented fall back to
    /// the default window ending now.
    fn growth_window(range: &DateRange, now: DateTime<Utc>) -> (DateTime<Utc>, DateTime<Utc>) {
        let default_window = Duration::days(DEFAULT_GROWTH_WINDOW_DAYS);
        let fallback = || (now.checked_sub_signed(default_window).unwrap_or(now), now);

        let end = match range.end {
            Some(day) => match day.checked_add_days(Days::new(1)) {
                Some(next) => next.and_time(NaiveTime::MIN).and_utc(),
                None => return fallback(),
            },
            None => now,
        };
        let start = match range.start_instant() {
            Some(start) => start,
            None => match end.checked_sub_signed(default_window) {
                Some(start) => start,
                None => return fallback(),
            },
        };

        if start < end {
            (start, end)
        } else {
            end.checked_sub_signed(default_window)
                .map_or_else(fallback, |start| (start, end))
        }
    }
}
