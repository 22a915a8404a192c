use serde::Serialize;

/// Live desk statistics for one day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiveStats {
    pub total_entries_today: i64,
    pub unique_visitors_today: i64,
    pub currently_inside: i64,
    /// "3 PM" style label, "N/A" when nobody entered.
    pub peak_hour_today: String,
}
