use thiserror::Error;

/// Validation and contract errors exposed by `tickwatch-core`.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("date must be formatted YYYY-MM-DD: '{value}'")]
    InvalidDate { value: String },
    #[error("date window start {start} is after end {end}")]
    WindowStartAfterEnd { start: String, end: String },

    #[error("closing price must be finite")]
    NonFiniteClose,
    #[error("closing price must be positive: {value}")]
    NonPositiveClose { value: f64 },

    #[error("series must contain at least one record")]
    EmptySeries,
    #[error("series dates must be strictly ascending: {prev} then {next}")]
    SeriesOutOfOrder { prev: String, next: String },

    #[error("watchlist already contains symbol '{symbol}'")]
    DuplicateSymbol { symbol: String },

    #[error("invalid sort field '{value}', expected one of symbol, price")]
    InvalidSortField { value: String },
    #[error("invalid sort direction '{value}', expected asc or desc")]
    InvalidSortDirection { value: String },
}

/// Top-level error type for core operations.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
