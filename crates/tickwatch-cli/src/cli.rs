use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Track daily price/volume series for a small set of ticker symbols.
///
/// State (watchlist, filter, sort, date window) is persisted to a JSON file
/// after every change and restored on the next invocation.
#[derive(Debug, Parser)]
#[command(name = "tickwatch", version, about = "Daily stock watchlist dashboard")]
pub struct Cli {
    /// Path of the persisted dashboard state.
    #[arg(long, global = true, default_value = "tickwatch_state.json")]
    pub state: PathBuf,

    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Use the offline transport instead of the live quote API.
    #[arg(long, global = true, default_value_t = false)]
    pub offline: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch and start tracking one or more symbols.
    Add(AddArgs),
    /// Stop tracking symbols.
    Remove(RemoveArgs),
    /// Toggle the day-over-day volatility filter.
    Filter,
    /// Sort the view by a column; repeating the field flips the direction.
    Sort(SortArgs),
    /// Set the date window applied to future adds.
    Range(RangeArgs),
    /// Render the watchlist without changing anything.
    Show,
}

#[derive(Debug, Args)]
pub struct AddArgs {
    /// Ticker symbols, e.g. AAPL MSFT.
    #[arg(required = true)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct RemoveArgs {
    /// Ticker symbols to drop from the watchlist.
    #[arg(required = true)]
    pub symbols: Vec<String>,
}

#[derive(Debug, Args)]
pub struct SortArgs {
    /// Column to sort by: symbol or price.
    pub field: String,
}

#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Window start, formatted YYYY-MM-DD.
    #[arg(long)]
    pub start: String,

    /// Window end, formatted YYYY-MM-DD.
    #[arg(long)]
    pub end: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
}
