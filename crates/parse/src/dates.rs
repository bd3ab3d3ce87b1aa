use chrono::{Datelike, NaiveDate};

pub(crate) fn month_abbr_to_num(name: &str) -> Option<u32> {
    match name.to_lowercase().as_str() {
        "jan" => Some(1),
        "feb" => Some(2),
        "mar" => Some(3),
        "apr" => Some(4),
        "may" => Some(5),
        "jun" => Some(6),
        "jul" => Some(7),
        "aug" => Some(8),
        "sep" => Some(9),
        "oct" => Some(10),
        "nov" => Some(11),
        "dec" => Some(12),
        _ => None,
    }
}

/// Pick the year for a month-day date with no explicit year.
///
/// Statements are processed shortly after they are issued, so the current
/// year is assumed, unless the month is strictly after the current one:
/// that means the line predates a year boundary the statement crossed.
pub(crate) fn infer_year(month: u32, today: NaiveDate) -> i32 {
    if month > today.month() {
        today.year() - 1
    } else {
        today.year()
    }
}

/// Expand a two-digit year token to 2000 + yy; four-digit years pass through.
pub(crate) fn expand_year(y: i32) -> i32 {
    if y < 100 {
        2000 + y
    } else {
        y
    }
}
