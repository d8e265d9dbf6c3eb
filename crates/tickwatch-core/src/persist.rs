use std::collections::BTreeMap;
use std::io::ErrorKind;
use std::path::PathBuf;

use log::warn;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::view::ViewParameters;
use crate::{DateWindow, StockSeries, TradingDate, Watchlist};

pub const KEY_WATCHLIST: &str = "watchlist";
pub const KEY_FILTER_ENABLED: &str = "filter_enabled";
pub const KEY_SORT_FIELD: &str = "sort_field";
pub const KEY_SORT_DIRECTION: &str = "sort_direction";
pub const KEY_START_DATE: &str = "start_date";
pub const KEY_END_DATE: &str = "end_date";

/// I/O-level persistence failure. Malformed content is never an error here;
/// restore handles it by defaulting.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("state serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Key-value string store collaborator, read at startup and written after
/// every state change.
pub trait StateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError>;
}

/// Volatile store for tests and offline sessions.
#[derive(Debug, Default)]
pub struct MemoryStateStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStateStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl StateStore for MemoryStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        Ok(())
    }
}

/// Durable store backed by a single JSON object on disk.
///
/// A missing file starts empty; a corrupt file is logged and discarded rather
/// than surfaced. Writes go through a temp file and rename.
#[derive(Debug)]
pub struct FileStateStore {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileStateStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => serde_json::from_str(&raw).unwrap_or_else(|error| {
                warn!(
                    "state file {} is corrupt, starting empty: {error}",
                    path.display()
                );
                BTreeMap::new()
            }),
            Err(error) if error.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(error) => return Err(StoreError::Io(error)),
        };

        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &std::path::Path {
        &self.path
    }

    fn flush(&self) -> Result<(), StoreError> {
        let payload = serde_json::to_string_pretty(&self.entries)?;
        let staged = self.path.with_extension("tmp");
        std::fs::write(&staged, payload)?;
        std::fs::rename(&staged, &self.path)?;
        Ok(())
    }
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn put(&mut self, key: &str, value: String) -> Result<(), StoreError> {
        self.entries.insert(key.to_owned(), value);
        self.flush()
    }
}

/// Everything the dashboard persists and restores as a unit.
#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    pub watchlist: Watchlist,
    pub params: ViewParameters,
    pub window: DateWindow,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            watchlist: Watchlist::new(),
            params: ViewParameters::default(),
            window: DateWindow::last_30_days(),
        }
    }
}

/// Serialize watchlist, view parameters, and date window to the store.
/// Called after every mutating operation.
pub fn snapshot(
    watchlist: &Watchlist,
    params: &ViewParameters,
    window: &DateWindow,
    store: &mut dyn StateStore,
) -> Result<(), StoreError> {
    store.put(KEY_WATCHLIST, serde_json::to_string(watchlist.series())?)?;
    store.put(
        KEY_FILTER_ENABLED,
        serde_json::to_string(&params.volatility_filter_enabled)?,
    )?;
    store.put(KEY_SORT_FIELD, serde_json::to_string(&params.sort_field)?)?;
    store.put(
        KEY_SORT_DIRECTION,
        serde_json::to_string(&params.sort_direction)?,
    )?;
    store.put(KEY_START_DATE, window.start.format())?;
    store.put(KEY_END_DATE, window.end.format())?;
    Ok(())
}

/// Rebuild application state from the store.
///
/// Total: every missing or malformed field independently reverts to its
/// documented default (empty watchlist; filter off; sort by symbol ascending;
/// last-30-days window). Never fails.
pub fn restore(store: &dyn StateStore) -> AppState {
    let defaults = ViewParameters::default();

    let watchlist = decode_key::<Vec<StockSeries>>(store, KEY_WATCHLIST)
        .and_then(|series| match Watchlist::from_series(series) {
            Ok(watchlist) => Some(watchlist),
            Err(error) => {
                warn!("persisted watchlist is invalid, starting empty: {error}");
                None
            }
        })
        .unwrap_or_default();

    let params = ViewParameters {
        volatility_filter_enabled: decode_key(store, KEY_FILTER_ENABLED)
            .unwrap_or(defaults.volatility_filter_enabled),
        sort_field: decode_key(store, KEY_SORT_FIELD).unwrap_or(defaults.sort_field),
        sort_direction: decode_key(store, KEY_SORT_DIRECTION).unwrap_or(defaults.sort_direction),
    };

    AppState {
        watchlist,
        params,
        window: restore_window(store),
    }
}

fn restore_window(store: &dyn StateStore) -> DateWindow {
    let start = read_key(store, KEY_START_DATE).and_then(|raw| parse_date(KEY_START_DATE, &raw));
    let end = read_key(store, KEY_END_DATE).and_then(|raw| parse_date(KEY_END_DATE, &raw));

    match (start, end) {
        (Some(start), Some(end)) => DateWindow::new(start, end).unwrap_or_else(|error| {
            warn!("persisted date window is invalid, using default: {error}");
            DateWindow::last_30_days()
        }),
        _ => DateWindow::last_30_days(),
    }
}

fn parse_date(key: &str, raw: &str) -> Option<TradingDate> {
    match TradingDate::parse(raw) {
        Ok(date) => Some(date),
        Err(error) => {
            warn!("persisted '{key}' is malformed, using default window: {error}");
            None
        }
    }
}

fn read_key(store: &dyn StateStore, key: &str) -> Option<String> {
    match store.get(key) {
        Ok(value) => value,
        Err(error) => {
            warn!("failed to read persisted '{key}': {error}");
            None
        }
    }
}

fn decode_key<T: DeserializeOwned>(store: &dyn StateStore, key: &str) -> Option<T> {
    let raw = read_key(store, key)?;
    match serde_json::from_str(&raw) {
        Ok(value) => Some(value),
        Err(error) => {
            warn!("persisted '{key}' is malformed, using default: {error}");
            None
        }
    }
}
