// Date utility functions

use chrono::NaiveDate;

pub fn is_same_day(date1: NaiveDate, date2: NaiveDate) -> bool {
    date1 == date2
}

/// Calendar day before `date`. Saturates at the calendar's lower bound.
pub fn previous_day(date: NaiveDate) -> NaiveDate {
    date.pred_opt().unwrap_or(date)
}

/// Parse the `YYYY-MM-DD` date strings the host uses to label grids.
pub fn parse_grid_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").ok()
}
