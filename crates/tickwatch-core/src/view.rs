use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{StockSeries, Symbol, ValidationError, Watchlist};

/// Magnitude of day-over-day percent change a series must exceed to survive
/// the volatility filter.
pub const VOLATILITY_THRESHOLD_PCT: f64 = 2.0;

/// Column the view is sorted by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    Symbol,
    LatestPrice,
}

impl SortField {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Symbol => "symbol",
            Self::LatestPrice => "price",
        }
    }
}

impl Display for SortField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "symbol" => Ok(Self::Symbol),
            "price" | "latest_price" => Ok(Self::LatestPrice),
            other => Err(ValidationError::InvalidSortField {
                value: other.to_owned(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }
}

impl Display for SortDirection {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortDirection {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(Self::Ascending),
            "desc" | "descending" => Ok(Self::Descending),
            other => Err(ValidationError::InvalidSortDirection {
                value: other.to_owned(),
            }),
        }
    }
}

/// User-controlled display parameters. Mutated only by explicit toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewParameters {
    pub volatility_filter_enabled: bool,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
}

impl ViewParameters {
    /// Sort intent from the presentation layer: re-selecting the active field
    /// flips the direction, a new field starts ascending.
    pub fn apply_sort(&mut self, field: SortField) {
        if self.sort_field == field {
            self.sort_direction = self.sort_direction.toggled();
        } else {
            self.sort_field = field;
            self.sort_direction = SortDirection::Ascending;
        }
    }
}

impl Default for ViewParameters {
    fn default() -> Self {
        Self {
            volatility_filter_enabled: false,
            sort_field: SortField::Symbol,
            sort_direction: SortDirection::Ascending,
        }
    }
}

/// One rendered row. Derived fresh on every call, never stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRow {
    pub symbol: Symbol,
    pub latest_price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub latest_volume: u64,
}

/// Compute the exact ordered row list for a watchlist and view parameters.
///
/// Pure function: no side effects, deterministic for identical inputs.
pub fn derive_view(watchlist: &Watchlist, params: &ViewParameters) -> Vec<DisplayRow> {
    let mut retained: Vec<&StockSeries> = watchlist
        .iter()
        .filter(|series| !params.volatility_filter_enabled || passes_volatility_filter(series))
        .collect();

    // slice::sort_by is stable, so equal keys keep insertion order even
    // though unique symbols make ties unobservable today.
    retained.sort_by(|a, b| {
        let ordering = match params.sort_field {
            SortField::Symbol => a.symbol().as_str().cmp(b.symbol().as_str()),
            SortField::LatestPrice => a.latest().close().total_cmp(&b.latest().close()),
        };
        match params.sort_direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    });

    retained.into_iter().map(derive_row).collect()
}

/// Series with fewer than two records have no change to evaluate and are
/// excluded whenever the filter is on.
fn passes_volatility_filter(series: &StockSeries) -> bool {
    match day_over_day(series) {
        Some((_, change_percent)) => change_percent.abs() > VOLATILITY_THRESHOLD_PCT,
        None => false,
    }
}

fn day_over_day(series: &StockSeries) -> Option<(f64, f64)> {
    let previous = series.previous()?;
    let change = series.latest().close() - previous.close();
    let change_percent = change / previous.close() * 100.0;
    Some((change, change_percent))
}

fn derive_row(series: &StockSeries) -> DisplayRow {
    let latest = series.latest();
    let (change, change_percent) = day_over_day(series).unwrap_or((0.0, 0.0));

    DisplayRow {
        symbol: series.symbol().clone(),
        latest_price: latest.close(),
        change,
        change_percent,
        latest_volume: latest.volume(),
    }
}
