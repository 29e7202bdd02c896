/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// All timestamps are UTC.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Calendar date of a company's last register update.
pub type UpdateDate = chrono::NaiveDate;

/// Digits in a primary state registration number (the business key).
pub const REGISTRATION_ID_DIGITS: usize = 13;

/// Digits in a taxpayer identification number.
pub const TAX_ID_DIGITS: usize = 10;

/// Parse an ISO 8601 calendar date.
///
/// Only the zero-padded `YYYY-MM-DD` form is accepted. chrono on its own
/// would also take signed years and unpadded or space-padded fields.
pub fn parse_update_date(value: &str) -> Option<UpdateDate> {
    let bytes = value.as_bytes();
    let well_formed = bytes.len() == 10
        && bytes.iter().enumerate().all(|(i, b)| match i {
            4 | 7 => *b == b'-',
            _ => b.is_ascii_digit(),
        });
    if !well_formed {
        return None;
    }
    chrono::NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let date = parse_update_date("2023-06-01").unwrap();
        assert_eq!(date, chrono::NaiveDate::from_ymd_opt(2023, 6, 1).unwrap());
    }

    #[test]
    fn rejects_unpadded_and_impossible_dates() {
        assert!(parse_update_date("2023-6-1").is_none());
        assert!(parse_update_date("2023-02-30").is_none());
        assert!(parse_update_date("01.06.2023").is_none());
        assert!(parse_update_date("").is_none());
    }

    #[test]
    fn rejects_signed_and_space_padded_dates() {
        for value in [
            "+023-06-01",
            "-023-06-01",
            " 023-06-01",
            "2023- 6-01",
            "2023-06- 1",
        ] {
            assert_eq!(parse_update_date(value), None, "{value:?} should not parse");
        }
    }
}
