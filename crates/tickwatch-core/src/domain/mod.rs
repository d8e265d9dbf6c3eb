pub mod date;
pub mod series;
pub mod symbol;

pub use date::{DateWindow, TradingDate};
pub use series::{DailyRecord, StockSeries};
pub use symbol::Symbol;
