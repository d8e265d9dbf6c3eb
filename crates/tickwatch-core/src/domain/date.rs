use std::fmt::{Display, Formatter};

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use time::macros::format_description;
use time::{Date, Duration, OffsetDateTime};

use crate::ValidationError;

/// Calendar date of a trading day, formatted `YYYY-MM-DD`. No time component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TradingDate(Date);

impl TradingDate {
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let format = format_description!("[year]-[month]-[day]");
        let parsed =
            Date::parse(input.trim(), format).map_err(|_| ValidationError::InvalidDate {
                value: input.to_owned(),
            })?;
        Ok(Self(parsed))
    }

    pub fn today_utc() -> Self {
        Self(OffsetDateTime::now_utc().date())
    }

    pub fn days_back(self, days: i64) -> Self {
        let shifted = self
            .0
            .checked_sub(Duration::days(days))
            .expect("trading dates stay within the supported calendar range");
        Self(shifted)
    }

    pub fn format(self) -> String {
        let format = format_description!("[year]-[month]-[day]");
        self.0
            .format(format)
            .expect("TradingDate must be formattable")
    }
}

impl Display for TradingDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format())
    }
}

impl Serialize for TradingDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for TradingDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Self::parse(&value).map_err(D::Error::custom)
    }
}

/// Inclusive `[start, end]` date window applied to fetched series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateWindow {
    pub start: TradingDate,
    pub end: TradingDate,
}

impl DateWindow {
    pub fn new(start: TradingDate, end: TradingDate) -> Result<Self, ValidationError> {
        if start > end {
            return Err(ValidationError::WindowStartAfterEnd {
                start: start.format(),
                end: end.format(),
            });
        }
        Ok(Self { start, end })
    }

    /// Default window when nothing usable was persisted.
    pub fn last_30_days() -> Self {
        let end = TradingDate::today_utc();
        Self {
            start: end.days_back(30),
            end,
        }
    }

    pub fn contains(&self, date: TradingDate) -> bool {
        self.start <= date && date <= self.end
    }
}

impl Default for DateWindow {
    fn default() -> Self {
        Self::last_30_days()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_iso_date() {
        let date = TradingDate::parse("2024-03-08").expect("must parse");
        assert_eq!(date.format(), "2024-03-08");
    }

    #[test]
    fn rejects_malformed_date() {
        let err = TradingDate::parse("03/08/2024").expect_err("must fail");
        assert!(matches!(err, ValidationError::InvalidDate { .. }));
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let start = TradingDate::parse("2024-01-01").expect("start");
        let end = TradingDate::parse("2024-01-31").expect("end");
        let window = DateWindow::new(start, end).expect("valid window");

        assert!(window.contains(start));
        assert!(window.contains(end));
        assert!(!window.contains(end.days_back(31)));
    }

    #[test]
    fn rejects_inverted_window() {
        let start = TradingDate::parse("2024-02-01").expect("start");
        let end = TradingDate::parse("2024-01-01").expect("end");
        let err = DateWindow::new(start, end).expect_err("must fail");
        assert!(matches!(err, ValidationError::WindowStartAfterEnd { .. }));
    }

    #[test]
    fn default_window_spans_30_days() {
        let window = DateWindow::last_30_days();
        assert_eq!(window.start, window.end.days_back(30));
    }
}
