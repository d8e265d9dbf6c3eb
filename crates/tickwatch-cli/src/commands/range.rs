use tickwatch_core::{AppState, DateWindow, TradingDate};

use crate::cli::RangeArgs;
use crate::error::CliError;

/// Replace the date window. Applies to future adds only; series already
/// tracked keep the records fetched under their original window.
pub fn run(args: &RangeArgs, state: &mut AppState) -> Result<bool, CliError> {
    let start = TradingDate::parse(&args.start)?;
    let end = TradingDate::parse(&args.end)?;
    state.window = DateWindow::new(start, end)?;
    Ok(true)
}
