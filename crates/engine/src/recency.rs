//! Elapsed-month bucketing for inspection recency.

use chrono::{Datelike, NaiveDate};

/// Packed 0xRRGGBB color, the form the XLSX writer consumes.
pub type Rgb = u32;

/// Whole calendar months between two dates, day-of-month ignored:
/// `2022-01-31` to `2022-02-01` counts as 1. Negative when `start` is after
/// `end`.
pub fn months_between(start: NaiveDate, end: NaiveDate) -> i32 {
    12 * (end.year() - start.year()) + (end.month() as i32 - start.month() as i32)
}

/// Inspection recency severity. Boundary months 3 and 12 belong to the
/// lower bucket; that cutoff drives every row's displayed color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecencyBucket {
    Low,
    Medium,
    High,
}

impl RecencyBucket {
    pub fn from_months(months: i32) -> Self {
        if months <= 3 {
            Self::Low
        } else if months <= 12 {
            Self::Medium
        } else {
            Self::High
        }
    }

    /// Fixed presentation colors: green / orange / red.
    pub fn fill_color(&self) -> Rgb {
        match self {
            Self::Low => 0x007500,
            Self::Medium => 0xFFA500,
            Self::High => 0xB30000,
        }
    }
}

/// Parse an inspection date. Both dash- and slash-separated spellings occur
/// in the source systems.
pub fn parse_inspection_date(value: &str) -> Option<NaiveDate> {
    let format = if value.contains('-') {
        "%Y-%m-%d"
    } else {
        "%Y/%m/%d"
    };
    NaiveDate::parse_from_str(value, format).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        parse_inspection_date(s).unwrap()
    }

    #[test]
    fn months_between_same_month() {
        assert_eq!(months_between(d("2022-05-11"), d("2022-05-30")), 0);
    }

    #[test]
    fn months_between_across_months() {
        assert_eq!(months_between(d("2022-01-11"), d("2022-05-30")), 4);
    }

    #[test]
    fn months_between_across_years() {
        assert_eq!(months_between(d("2021-01-11"), d("2022-01-12")), 12);
    }

    #[test]
    fn months_between_ignores_day_of_month() {
        assert_eq!(months_between(d("2022-01-31"), d("2022-02-01")), 1);
    }

    #[test]
    fn months_between_negative_when_start_after_end() {
        assert_eq!(months_between(d("2022-05-01"), d("2022-02-01")), -3);
    }

    #[test]
    fn bucket_boundaries() {
        assert_eq!(RecencyBucket::from_months(3), RecencyBucket::Low);
        assert_eq!(RecencyBucket::from_months(4), RecencyBucket::Medium);
        assert_eq!(RecencyBucket::from_months(12), RecencyBucket::Medium);
        assert_eq!(RecencyBucket::from_months(13), RecencyBucket::High);
        assert_eq!(RecencyBucket::from_months(-6), RecencyBucket::Low);
    }

    #[test]
    fn bucket_colors_are_stable_constants() {
        assert_eq!(RecencyBucket::Low.fill_color(), 0x007500);
        assert_eq!(RecencyBucket::Medium.fill_color(), 0xFFA500);
        assert_eq!(RecencyBucket::High.fill_color(), 0xB30000);
    }

    #[test]
    fn date_parsing_accepts_both_separators() {
        assert_eq!(d("2022-02-11"), d("2022/02/11"));
        assert!(parse_inspection_date("11.02.2022").is_none());
        assert!(parse_inspection_date("not a date").is_none());
    }
}
