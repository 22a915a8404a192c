//! A person resolved from the student or faculty roster.

use crate::models::role::Role;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Member {
    pub full_reg_no: String,
    pub name: String,
    /// Student branch; faculty have none.
    pub branch: Option<String>,
    pub year: Option<i64>,
    pub role: Role,
}

impl Member {
    pub fn branch_or_na(&self) -> String {
        self.branch
            .as_deref()
            .filter(|b| !b.trim().is_empty())
            .unwrap_or("N/A")
            .to_string()
    }

    pub fn year_or_na(&self) -> String {
        self.year
            .map(|y| y.to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }
}
