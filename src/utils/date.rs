use chrono::{Duration, NaiveDate};

use crate::error::AppError;

/// Parse a user-supplied date relative to `today`.
///
/// Accepts `YYYYMMDD`, `YYYY-MM-DD`, `today` and `yesterday`.
pub(crate) fn parse_date(s: &str, today: NaiveDate) -> Result<NaiveDate, AppError> {
    let trimmed = s.trim();
    if trimmed.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    if trimmed.eq_ignore_ascii_case("yesterday") {
        return Ok(today - Duration::days(1));
    }
    // Try YYYYMMDD
    if trimmed.len() == 8
        && let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y%m%d")
    {
        return Ok(d);
    }
    // Try YYYY-MM-DD
    if let Ok(d) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        return Ok(d);
    }
    Err(AppError::InvalidDate {
        input: trimmed.to_string(),
    })
}
