//! One row of the `logs` table: a single library visit.

use crate::models::role::Role;
use chrono::{NaiveDate, NaiveTime};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visit {
    pub log_id: i64,
    pub full_reg_no: String,
    pub name: String,
    pub branch: String,
    pub year: String,
    pub entry_date: NaiveDate,
    pub entry_time: NaiveTime,
    pub exit_date: Option<NaiveDate>,
    pub exit_time: Option<NaiveTime>,
    pub role: Role,
    pub reason: String,
}

impl Visit {
    pub fn is_open(&self) -> bool {
        self.exit_date.is_none()
    }
}

/// Compact view used by the "currently inside" listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Occupant {
    pub full_reg_no: String,
    pub name: String,
}
