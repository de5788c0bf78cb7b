//! Dashboard data types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Wire format of query dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Optional date filter for the stats query.
///
/// Both bounds are inclusive calendar days in UTC.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct DateRange {
    /// First day included.
    pub start: Option<NaiveDate>,
    /// Last day included.
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Creates a range from optional bounds.
    #[must_use]
    pub const fn new(start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        Self { start, end }
    }

    /// Whether neither bound is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Whether `at` falls inside the range.
    #[must_use]
    pub fn contains(&self, at: DateTime<Utc>) -> bool {
        let day = at.date_naive();
        self.start.is_none_or(|start| day >= start) && self.end.is_none_or(|end| day <= end)
    }

    /// Query parameters for the metrics endpoint: either, both or neither.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::with_capacity(2);
        if let Some(start) = self.start {
            pairs.push(("startDate", start.format(DATE_FORMAT).to_string()));
        }
        if let Some(end) = self.end {
            pairs.push(("endDate", end.format(DATE_FORMAT).to_string()));
        }
        pairs
    }

    /// Start of the first included day, if bounded.
    #[must_use]
    pub fn start_instant(&self) -> Option<DateTime<Utc>> {
        self.start.map(|d| d.and_time(NaiveTime::MIN).and_utc())
    }
}

/// Record counts.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardCounts {
    /// Registered users.
    pub users: u64,
    /// Service providers.
    pub providers: u64,
    /// Active listings.
    pub listings: u64,
    /// All bookings.
    pub bookings: u64,
    /// Bookings awaiting confirmation.
    pub pending_bookings: u64,
    /// Completed bookings.
    pub completed_bookings: u64,
    /// Cancelled bookings.
    pub cancelled_bookings: u64,
}

/// Money figures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialMetrics {
    /// Sum of completed booking amounts.
    pub total_revenue: Decimal,
    /// Revenue per completed booking.
    pub avg_booking_value: Decimal,
}

/// Derived percentages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetrics {
    /// Completed bookings as a percentage of all bookings.
    pub conversion_rate: Decimal,
    /// User signups versus the previous window, in percent.
    pub user_growth: Decimal,
}

/// Body of the `data` field returned by the metrics endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardData {
    /// Record counts.
    pub counts: DashboardCounts,
    /// Money figures.
    pub financial: FinancialMetrics,
    /// Derived percentages.
    pub performance: PerformanceMetrics,
}

/// Flat view of the metrics shown on the dashboard.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DashboardStats {
    /// Registered users.
    pub users: u64,
    /// Service providers.
    pub providers: u64,
    /// Active listings.
    pub listings: u64,
    /// All bookings.
    pub bookings: u64,
    /// Total revenue.
    pub revenue: Decimal,
    /// Bookings awaiting confirmation.
    pub pending_bookings: u64,
    /// Completed bookings.
    pub completed_bookings: u64,
    /// Cancelled bookings.
    pub cancelled_bookings: u64,
    /// Conversion rate in percent.
    pub conversion_rate: Decimal,
    /// Average booking value.
    pub avg_booking_value: Decimal,
    /// User growth in percent.
    pub user_growth: Decimal,
}

impl From<DashboardData> for DashboardStats {
    fn from(data: DashboardData) -> Self {
        let DashboardData {
            counts,
            financial,
            performance,
        } = data;

        Self {
            users: counts.users,
            providers: counts.providers,
            listings: counts.listings,
            bookings: counts.bookings,
            revenue: financial.total_revenue,
            pending_bookings: counts.pending_bookings,
            completed_bookings: counts.completed_bookings,
            cancelled_bookings: counts.cancelled_bookings,
            conversion_rate: performance.conversion_rate,
            avg_booking_value: financial.avg_booking_value,
            user_growth: performance.user_growth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_query_pairs() {
        assert!(DateRange::default().query_pairs().is_empty());

        let start_only = DateRange::new(Some(day(2024, 1, 5)), None);
        assert_eq!(
            start_only.query_pairs(),
            vec![("startDate", "2024-01-05".to_string())]
        );

        let end_only = DateRange::new(None, Some(day(2024, 2, 1)));
        assert_eq!(end_only.query_pairs(), vec![("endDate", "2024-02-01".to_string())]);

        let both = DateRange::new(Some(day(2024, 1, 5)), Some(day(2024, 2, 1)));
        assert_eq!(both.query_pairs().len(), 2);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let range = DateRange::new(Some(day(2024, 1, 5)), Some(day(2024, 1, 6)));

        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap()));
        assert!(range.contains(Utc.with_ymd_and_hms(2024, 1, 6, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 1, 4, 23, 59, 59).unwrap()));
        assert!(!range.contains(Utc.with_ymd_and_hms(2024, 1, 7, 0, 0, 0).unwrap()));
        assert!(DateRange::default().contains(Utc::now()));
    }

    #[test]
    fn test_stats_from_wire_payload() {
        let payload = serde_json::json!({
            "counts": {
                "users": 10, "providers": 3, "listings": 7, "bookings": 20,
                "pendingBookings": 5, "completedBookings": 12, "cancelledBookings": 3
            },
            "financial": { "totalRevenue": "15000.50", "avgBookingValue": "1250.04" },
            "performance": { "conversionRate": "60.00", "userGrowth": "-12.5" }
        });

        let data: DashboardData = serde_json::from_value(payload).unwrap();
        let stats = DashboardStats::from(data);

        assert_eq!(stats.users, 10);
        assert_eq!(stats.pending_bookings, 5);
        assert_eq!(stats.revenue, dec!(15000.50));
        assert_eq!(stats.avg_booking_value, dec!(1250.04));
        assert_eq!(stats.conversion_rate, dec!(60.00));
        assert_eq!(stats.user_growth, dec!(-12.5));
    }
}
