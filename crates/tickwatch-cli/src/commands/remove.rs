use tickwatch_core::{AppState, Symbol};

use crate::cli::RemoveArgs;
use crate::error::CliError;

pub fn run(
    args: &RemoveArgs,
    state: &mut AppState,
    notices: &mut Vec<String>,
) -> Result<bool, CliError> {
    let mut mutated = false;
    for raw in &args.symbols {
        let symbol = Symbol::parse(raw)?;
        if state.watchlist.remove_symbol(&symbol) {
            mutated = true;
            notices.push(format!("{symbol}: removed"));
        } else {
            notices.push(format!("{symbol}: not tracked"));
        }
    }
    Ok(mutated)
}
