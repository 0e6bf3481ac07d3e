//! Date normalization for extracted shift tokens
//!
//! Chat messages spell dates inconsistently: `15.03`, `15/03/24`,
//! `15-03-2024`. Everything that parses is canonicalized to `YYYY-MM-DD`;
//! a token that matches none of the accepted forms is returned unchanged
//! so the entry is still stored (soft failure, logged upstream).

use chrono::{Datelike, NaiveDate};

/// Normalize a raw date token to canonical `YYYY-MM-DD`.
///
/// Accepted forms, with `.`, `/` or `-` as separator:
/// - `D.M` (year taken from `today`)
/// - `D.M.YY` (2-digit year, pivoted at 69 like strftime `%y`)
/// - `D.M.YYYY`
/// - `YYYY-MM-DD` (already canonical; idempotent)
///
/// Day and month may be one or two digits. Calendar-invalid combinations
/// (e.g. `31.02`) fall through to the unchanged-token path.
pub fn normalize_date(token: &str, today: NaiveDate) -> String {
    let parts: Vec<&str> = token.trim().split(['.', '/', '-']).collect();

    let date = match parts.as_slice() {
        [y, m, d] if y.len() == 4 => from_ymd(y, m, d),
        [d, m, y] if y.len() == 2 || y.len() == 4 => from_ymd(&expand_year(y), m, d),
        [d, m] => from_ymd(&today.year().to_string(), m, d),
        _ => None,
    };

    match date {
        Some(date) => date.format("%Y-%m-%d").to_string(),
        None => token.to_string(),
    }
}

/// Parse a stored date column back to a calendar date, if canonical.
pub fn parse_canonical(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

fn from_ymd(y: &str, m: &str, d: &str) -> Option<NaiveDate> {
    if d.is_empty() || d.len() > 2 || m.is_empty() || m.len() > 2 {
        return None;
    }
    let year: i32 = y.parse().ok()?;
    let month: u32 = m.parse().ok()?;
    let day: u32 = d.parse().ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

/// Two-digit years pivot at 69: `24` → `2024`, `83` → `1983`.
fn expand_year(y: &str) -> String {
    if y.len() == 2 {
        if let Ok(n) = y.parse::<i32>() {
            let century = if n < 69 { 2000 } else { 1900 };
            return (century + n).to_string();
        }
    }
    y.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
    }

    #[test]
    fn day_month_gets_current_year() {
        assert_eq!(normalize_date("15.03", today()), "2024-03-15");
        assert_eq!(normalize_date("5/3", today()), "2024-03-05");
        assert_eq!(normalize_date("15-03", today()), "2024-03-15");
    }

    #[test]
    fn explicit_years_are_kept() {
        assert_eq!(normalize_date("15.03.2023", today()), "2023-03-15");
        assert_eq!(normalize_date("15/03/24", today()), "2024-03-15");
        assert_eq!(normalize_date("15.03.83", today()), "1983-03-15");
    }

    #[test]
    fn canonical_input_is_idempotent() {
        let once = normalize_date("15.03", today());
        assert_eq!(normalize_date(&once, today()), once);
        assert_eq!(normalize_date("2024-05-01", today()), "2024-05-01");
    }

    #[test]
    fn unrecognized_tokens_pass_through() {
        assert_eq!(normalize_date("tomorrow", today()), "tomorrow");
        assert_eq!(normalize_date("15.03.2024.01", today()), "15.03.2024.01");
        assert_eq!(normalize_date("153.03", today()), "153.03");
    }

    #[test]
    fn calendar_invalid_dates_pass_through() {
        assert_eq!(normalize_date("31.02", today()), "31.02");
        assert_eq!(normalize_date("00.00.2024", today()), "00.00.2024");
    }

    #[test]
    fn stored_dates_parse_back() {
        assert_eq!(
            parse_canonical("2024-03-15"),
            NaiveDate::from_ymd_opt(2024, 3, 15)
        );
        assert_eq!(parse_canonical("15.03"), None);
    }
}
