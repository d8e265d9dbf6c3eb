use serde::{Deserialize, Serialize};

use crate::{Symbol, TradingDate, ValidationError};

/// Single trading day of closing price and volume. Immutable once fetched.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDailyRecord")]
pub struct DailyRecord {
    date: TradingDate,
    close: f64,
    volume: u64,
}

impl DailyRecord {
    pub fn new(date: TradingDate, close: f64, volume: u64) -> Result<Self, ValidationError> {
        if !close.is_finite() {
            return Err(ValidationError::NonFiniteClose);
        }
        if close <= 0.0 {
            return Err(ValidationError::NonPositiveClose { value: close });
        }

        Ok(Self {
            date,
            close,
            volume,
        })
    }

    pub const fn date(&self) -> TradingDate {
        self.date
    }

    pub const fn close(&self) -> f64 {
        self.close
    }

    pub const fn volume(&self) -> u64 {
        self.volume
    }
}

#[derive(Debug, Deserialize)]
struct RawDailyRecord {
    date: TradingDate,
    close: f64,
    volume: u64,
}

impl TryFrom<RawDailyRecord> for DailyRecord {
    type Error = ValidationError;

    fn try_from(raw: RawDailyRecord) -> Result<Self, Self::Error> {
        Self::new(raw.date, raw.close, raw.volume)
    }
}

/// Fetched daily series for one symbol, windowed at fetch time.
///
/// Invariant: at least one record, dates strictly ascending, no duplicates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawStockSeries")]
pub struct StockSeries {
    symbol: Symbol,
    records: Vec<DailyRecord>,
}

impl StockSeries {
    pub fn new(symbol: Symbol, records: Vec<DailyRecord>) -> Result<Self, ValidationError> {
        if records.is_empty() {
            return Err(ValidationError::EmptySeries);
        }

        for pair in records.windows(2) {
            if pair[1].date() <= pair[0].date() {
                return Err(ValidationError::SeriesOutOfOrder {
                    prev: pair[0].date().format(),
                    next: pair[1].date().format(),
                });
            }
        }

        Ok(Self { symbol, records })
    }

    pub fn symbol(&self) -> &Symbol {
        &self.symbol
    }

    pub fn records(&self) -> &[DailyRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Most recent record in the windowed series.
    pub fn latest(&self) -> &DailyRecord {
        self.records.last().expect("series is never empty")
    }

    /// Second most recent record, when the series holds at least two days.
    pub fn previous(&self) -> Option<&DailyRecord> {
        self.records.len().checked_sub(2).map(|i| &self.records[i])
    }
}

#[derive(Debug, Deserialize)]
struct RawStockSeries {
    symbol: Symbol,
    records: Vec<DailyRecord>,
}

impl TryFrom<RawStockSeries> for StockSeries {
    type Error = ValidationError;

    fn try_from(raw: RawStockSeries) -> Result<Self, Self::Error> {
        Self::new(raw.symbol, raw.records)
    }
}
