use log::warn;

use crate::source::{DailySeriesSource, SeriesRequest, SourceError};
use crate::{DailyRecord, DateWindow, StockSeries, Symbol, ValidationError};

/// Result of an add attempt, reported to the presentation layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    AlreadyPresent,
    NoDataInRange,
}

impl AddOutcome {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Added => "added",
            Self::AlreadyPresent => "already_present",
            Self::NoDataInRange => "no_data_in_range",
        }
    }
}

/// Insertion-ordered set of tracked series, keyed by unique symbol.
///
/// Mutations require `&mut self`; a fetch in flight never touches the
/// watchlist until its result is admitted, so a single writer is preserved
/// even when several fetches resolve concurrently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<StockSeries>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a watchlist from deserialized series, rejecting duplicates.
    pub fn from_series(entries: Vec<StockSeries>) -> Result<Self, ValidationError> {
        let mut watchlist = Self::new();
        for series in entries {
            if watchlist.contains(series.symbol()) {
                return Err(ValidationError::DuplicateSymbol {
                    symbol: series.symbol().as_str().to_owned(),
                });
            }
            watchlist.entries.push(series);
        }
        Ok(watchlist)
    }

    /// Fetch a symbol's daily series and append it when the window holds data.
    ///
    /// Fetch failures of every kind are folded into `NoDataInRange`; the
    /// watchlist is left untouched on any non-`Added` outcome.
    pub async fn add_symbol(
        &mut self,
        symbol: Symbol,
        window: &DateWindow,
        source: &dyn DailySeriesSource,
    ) -> AddOutcome {
        if self.contains(&symbol) {
            return AddOutcome::AlreadyPresent;
        }

        let fetched = source.daily_series(SeriesRequest::new(symbol.clone())).await;
        self.admit(symbol, window, fetched)
    }

    /// Apply one completed fetch to the watchlist.
    ///
    /// Split out of `add_symbol` so callers can run several fetches
    /// concurrently and still funnel every mutation through one writer.
    pub fn admit(
        &mut self,
        symbol: Symbol,
        window: &DateWindow,
        fetched: Result<Vec<DailyRecord>, SourceError>,
    ) -> AddOutcome {
        if self.contains(&symbol) {
            return AddOutcome::AlreadyPresent;
        }

        let records = match fetched {
            Ok(records) => records,
            Err(error) => {
                warn!("fetch for {symbol} failed: {error}");
                return AddOutcome::NoDataInRange;
            }
        };

        // Provider order is newest first; keep the window and flip to
        // ascending dates before constructing the series.
        let mut in_window: Vec<DailyRecord> = records
            .into_iter()
            .filter(|record| window.contains(record.date()))
            .collect();
        in_window.reverse();

        match StockSeries::new(symbol.clone(), in_window) {
            Ok(series) => {
                self.entries.push(series);
                AddOutcome::Added
            }
            Err(error) => {
                warn!("no usable records for {symbol} in window: {error}");
                AddOutcome::NoDataInRange
            }
        }
    }

    /// Remove a symbol's series. Idempotent; returns whether anything changed.
    pub fn remove_symbol(&mut self, symbol: &Symbol) -> bool {
        let before = self.entries.len();
        self.entries.retain(|series| series.symbol() != symbol);
        self.entries.len() != before
    }

    pub fn contains(&self, symbol: &Symbol) -> bool {
        self.entries.iter().any(|series| series.symbol() == symbol)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Series in insertion order, the default pre-sort iteration order.
    pub fn iter(&self) -> impl Iterator<Item = &StockSeries> {
        self.entries.iter()
    }

    pub fn series(&self) -> &[StockSeries] {
        &self.entries
    }
}
