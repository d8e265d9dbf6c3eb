// Shared fixtures for the behavioral test suites.
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Mutex;

pub use tickwatch_core::{
    derive_view, restore, snapshot, AddOutcome, AppState, DailyRecord, DailySeriesSource,
    DateWindow, FileStateStore, MemoryStateStore, SeriesRequest, SortDirection, SortField,
    SourceError, StateStore, StockSeries, Symbol, TradingDate, ViewParameters, Watchlist,
};

pub fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

pub fn date(raw: &str) -> TradingDate {
    TradingDate::parse(raw).expect("valid date")
}

pub fn record(day: &str, close: f64, volume: u64) -> DailyRecord {
    DailyRecord::new(date(day), close, volume).expect("valid record")
}

pub fn window(start: &str, end: &str) -> DateWindow {
    DateWindow::new(date(start), date(end)).expect("valid window")
}

pub fn series(raw: &str, records: Vec<DailyRecord>) -> StockSeries {
    StockSeries::new(symbol(raw), records).expect("valid series")
}

/// Source answering from canned per-symbol scripts. Each script is consumed by
/// the first fetch; an unscripted symbol reports no data, like an unknown
/// ticker would.
#[derive(Default)]
pub struct ScriptedSource {
    scripts: Mutex<HashMap<String, Result<Vec<DailyRecord>, SourceError>>>,
}

impl ScriptedSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful fetch. Records are expected newest first, matching
    /// provider order.
    pub fn with_series(self, raw: &str, records: Vec<DailyRecord>) -> Self {
        self.scripts
            .lock()
            .expect("scripted source lock")
            .insert(symbol(raw).as_str().to_owned(), Ok(records));
        self
    }

    pub fn with_failure(self, raw: &str, error: SourceError) -> Self {
        self.scripts
            .lock()
            .expect("scripted source lock")
            .insert(symbol(raw).as_str().to_owned(), Err(error));
        self
    }
}

impl DailySeriesSource for ScriptedSource {
    fn daily_series<'a>(
        &'a self,
        req: SeriesRequest,
    ) -> Pin<Box<dyn Future<Output = Result<Vec<DailyRecord>, SourceError>> + Send + 'a>> {
        Box::pin(async move {
            self.scripts
                .lock()
                .expect("scripted source lock")
                .remove(req.symbol.as_str())
                .unwrap_or_else(|| {
                    Err(SourceError::no_data(format!(
                        "no script for {}",
                        req.symbol
                    )))
                })
        })
    }
}
