//! UTC calendar dates for entry stamping.

use chrono::{NaiveDate, Utc};

/// Today's UTC date as `YYYY-MM-DD`.
pub fn today() -> String {
    format_date(Utc::now().date_naive())
}

pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
