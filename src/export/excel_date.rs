// src/export/excel_date.rs

use crate::utils::date::REPORT_DATE_FMT;
use crate::utils::time::DB_TIME_FMT;
use chrono::{NaiveDate, NaiveTime, Timelike};

/// Interpret a report cell as a date or a time of day, returning the
/// Excel serial value and the number format to display it with.
pub(crate) fn parse_to_excel_date(s: &str) -> Option<(&'static str, f64)> {
    if let Ok(d) = NaiveDate::parse_from_str(s, REPORT_DATE_FMT) {
        return Some(("dd-mm-yyyy", date_to_excel_serial(d)?));
    }

    if let Ok(t) = NaiveTime::parse_from_str(s, DB_TIME_FMT) {
        let seconds = f64::from(t.num_seconds_from_midnight());
        return Some(("hh:mm:ss", seconds / 86400.0));
    }

    None
}

fn date_to_excel_serial(d: NaiveDate) -> Option<f64> {
    let excel_epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    Some((d - excel_epoch).num_days() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_cells_become_excel_serials() {
        assert_eq!(parse_to_excel_date("01-01-1900"), Some(("dd-mm-yyyy", 2.0)));
        assert_eq!(parse_to_excel_date("12:00:00"), Some(("hh:mm:ss", 0.5)));
        assert_eq!(parse_to_excel_date("Still Inside"), None);
        assert_eq!(parse_to_excel_date("2023PUCS12345"), None);
    }
}
