use std::sync::Arc;

use tokio::task::JoinSet;

use tickwatch_core::{AddOutcome, AppState, DailySeriesSource, SeriesRequest, Symbol};

use crate::cli::AddArgs;
use crate::error::CliError;

/// Fetch the requested symbols concurrently, admitting each result into the
/// watchlist as it lands. Completion order is not insertion order. Every
/// symbol gets a per-outcome notice line.
pub async fn run(
    args: &AddArgs,
    state: &mut AppState,
    source: Arc<dyn DailySeriesSource>,
    notices: &mut Vec<String>,
) -> Result<bool, CliError> {
    let mut symbols: Vec<Symbol> = Vec::with_capacity(args.symbols.len());
    for raw in &args.symbols {
        let symbol = Symbol::parse(raw)?;
        if !symbols.contains(&symbol) {
            symbols.push(symbol);
        }
    }

    let mut join_set = JoinSet::new();
    for symbol in symbols {
        if state.watchlist.contains(&symbol) {
            notices.push(format!("{symbol}: {}", AddOutcome::AlreadyPresent.as_str()));
            continue;
        }
        let source = Arc::clone(&source);
        join_set.spawn(async move {
            let fetched = source.daily_series(SeriesRequest::new(symbol.clone())).await;
            (symbol, fetched)
        });
    }

    let mut mutated = false;
    while let Some(joined) = join_set.join_next().await {
        let (symbol, fetched) =
            joined.map_err(|error| CliError::Command(format!("fetch task failed: {error}")))?;
        let outcome = state.watchlist.admit(symbol.clone(), &state.window, fetched);
        if outcome == AddOutcome::Added {
            mutated = true;
        }
        notices.push(format!("{symbol}: {}", outcome.as_str()));
    }

    Ok(mutated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::future::Future;
    use std::pin::Pin;

    use tickwatch_core::{DailyRecord, DateWindow, SourceError, TradingDate};

    struct FixedSource {
        records: Vec<DailyRecord>,
    }

    impl DailySeriesSource for FixedSource {
        fn daily_series<'a>(
            &'a self,
            _req: SeriesRequest,
        ) -> Pin<Box<dyn Future<Output = Result<Vec<DailyRecord>, SourceError>> + Send + 'a>>
        {
            let records = self.records.clone();
            Box::pin(async move { Ok(records) })
        }
    }

    fn args(symbols: &[&str]) -> AddArgs {
        AddArgs {
            symbols: symbols.iter().map(|raw| raw.to_string()).collect(),
        }
    }

    fn march_state() -> AppState {
        AppState {
            window: DateWindow::new(
                TradingDate::parse("2024-03-01").expect("start"),
                TradingDate::parse("2024-03-31").expect("end"),
            )
            .expect("valid window"),
            ..AppState::default()
        }
    }

    fn march_source() -> Arc<dyn DailySeriesSource> {
        let record =
            DailyRecord::new(TradingDate::parse("2024-03-08").expect("date"), 153.0, 1_200)
                .expect("valid record");
        Arc::new(FixedSource {
            records: vec![record],
        })
    }

    #[tokio::test]
    async fn every_symbol_gets_an_outcome_notice() {
        let mut state = march_state();
        let source = march_source();

        let mut notices = Vec::new();
        let mutated = run(&args(&["aapl"]), &mut state, Arc::clone(&source), &mut notices)
            .await
            .expect("add runs");
        assert!(mutated);
        assert_eq!(notices, vec![String::from("AAPL: added")]);

        let mut notices = Vec::new();
        let mutated = run(&args(&["AAPL"]), &mut state, source, &mut notices)
            .await
            .expect("add runs");
        assert!(!mutated);
        assert_eq!(notices, vec![String::from("AAPL: already_present")]);
        assert_eq!(state.watchlist.len(), 1);
    }
}
