//! Core contracts for tickwatch.
//!
//! This crate contains:
//! - Canonical domain models and validation
//! - The watchlist store and its add/remove semantics
//! - The derived view engine (volatility filter, sort, row derivation)
//! - Daily series source trait and the Alpha Vantage adapter
//! - Key-value state persistence with total restore

pub mod adapters;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod persist;
pub mod policy;
pub mod source;
pub mod throttling;
pub mod view;
pub mod watchlist;

pub use adapters::AlphaVantageSource;
pub use domain::{DailyRecord, DateWindow, StockSeries, Symbol, TradingDate};
pub use error::{CoreError, ValidationError};
pub use http_client::{
    HttpClient, HttpError, HttpRequest, HttpResponse, NoopHttpClient, ReqwestHttpClient,
};
pub use persist::{
    restore, snapshot, AppState, FileStateStore, MemoryStateStore, StateStore, StoreError,
};
pub use policy::ProviderPolicy;
pub use source::{DailySeriesSource, SeriesRequest, SourceError, SourceErrorKind};
pub use throttling::QuotaGate;
pub use view::{
    derive_view, DisplayRow, SortDirection, SortField, ViewParameters, VOLATILITY_THRESHOLD_PCT,
};
pub use watchlist::{AddOutcome, Watchlist};
