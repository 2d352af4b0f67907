//! Card validity window.
//!
//! A card issued in month M of year Y is valid through the last calendar day
//! of month M+1 of year Y+2: add two years keeping the month, advance to the
//! first day of the following month, subtract one day.

use chrono::{Datelike, Days, NaiveDate};

/// Expiration date for a card issued on `issued_on`.
pub fn expiry_date(issued_on: NaiveDate) -> NaiveDate {
    let year = issued_on.year() + 2;
    let month = issued_on.month();

    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first| first.checked_sub_days(Days::new(1)))
        .expect("first day of a month is always a valid date")
}

/// Validity label printed on the card: `MM/YYYY` of the expiration date.
pub fn validity_label(expires_on: NaiveDate) -> String {
    format!("{:02}/{}", expires_on.month(), expires_on.year())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn mid_month_issuance() {
        // Issued any day in March 2024 -> valid through 2026-04-30.
        assert_eq!(expiry_date(date(2024, 3, 15)), date(2026, 4, 30));
    }

    #[test]
    fn first_of_january_issuance() {
        assert_eq!(expiry_date(date(2024, 1, 1)), date(2026, 2, 28));
    }

    #[test]
    fn december_rolls_into_next_year() {
        assert_eq!(expiry_date(date(2024, 12, 5)), date(2027, 1, 31));
    }

    #[test]
    fn leap_february() {
        // Issued January 2026 -> February 2028, which has 29 days.
        assert_eq!(expiry_date(date(2026, 1, 10)), date(2028, 2, 29));
    }

    #[test]
    fn label_is_zero_padded() {
        assert_eq!(validity_label(date(2026, 4, 30)), "04/2026");
        assert_eq!(validity_label(date(2027, 11, 30)), "11/2027");
    }
}
