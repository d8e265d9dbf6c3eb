use std::str::FromStr;

use tickwatch_core::{AppState, SortField};

use crate::cli::SortArgs;
use crate::error::CliError;

pub fn run(args: &SortArgs, state: &mut AppState) -> Result<bool, CliError> {
    let field = SortField::from_str(&args.field)?;
    state.params.apply_sort(field);
    Ok(true)
}
