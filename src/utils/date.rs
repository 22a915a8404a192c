use chrono::{Datelike, Duration, NaiveDate};

/// Storage format of dates in the `logs` table.
pub const DB_DATE_FMT: &str = "%Y-%m-%d";

/// Format used in report spreadsheets.
pub const REPORT_DATE_FMT: &str = "%d-%m-%Y";

pub fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DB_DATE_FMT).ok()
}

pub fn to_db(d: &NaiveDate) -> String {
    d.format(DB_DATE_FMT).to_string()
}

pub fn to_report(d: &NaiveDate) -> String {
    d.format(REPORT_DATE_FMT).to_string()
}

/// Monday..Sunday of the week containing `d`.
pub fn week_bounds(d: NaiveDate) -> (NaiveDate, NaiveDate) {
    let monday = d - Duration::days(i64::from(d.weekday().num_days_from_monday()));
    (monday, monday + Duration::days(6))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn week_runs_monday_to_sunday() {
        // 2025-09-18 is a Thursday
        let d = NaiveDate::from_ymd_opt(2025, 9, 18).unwrap();
        let (mon, sun) = week_bounds(d);
        assert_eq!(mon, NaiveDate::from_ymd_opt(2025, 9, 15).unwrap());
        assert_eq!(sun, NaiveDate::from_ymd_opt(2025, 9, 21).unwrap());

        let (mon2, _) = week_bounds(mon);
        assert_eq!(mon2, mon);
        let (mon3, _) = week_bounds(sun);
        assert_eq!(mon3, mon);
    }

    #[test]
    fn report_dates_are_day_first() {
        let d = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(to_report(&d), "05-01-2025");
        assert_eq!(to_db(&d), "2025-01-05");
        assert_eq!(parse_date(" 2025-01-05 "), Some(d));
        assert_eq!(parse_date("05-01-2025"), None);
    }
}
