mod add;
mod range;
mod remove;
mod sort;

use std::sync::Arc;

use serde::Serialize;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use tickwatch_core::{
    derive_view, restore, snapshot, AlphaVantageSource, DailySeriesSource, DateWindow, DisplayRow,
    FileStateStore, ReqwestHttpClient, ViewParameters,
};

use crate::cli::{Cli, Command};
use crate::error::CliError;

/// The rendered result of any subcommand: the state after the change plus the
/// view rows it produces. Every command ends by showing the dashboard.
#[derive(Debug, Serialize)]
pub struct ViewReport {
    pub generated_at: String,
    pub window: DateWindow,
    pub params: ViewParameters,
    pub rows: Vec<DisplayRow>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub notices: Vec<String>,
}

pub async fn run(cli: &Cli) -> Result<ViewReport, CliError> {
    let mut store = FileStateStore::open(&cli.state)?;
    let mut state = restore(&store);
    let mut notices = Vec::new();

    let mutated = match &cli.command {
        Command::Add(args) => {
            add::run(args, &mut state, series_source(cli), &mut notices).await?
        }
        Command::Remove(args) => remove::run(args, &mut state, &mut notices)?,
        Command::Filter => {
            state.params.volatility_filter_enabled = !state.params.volatility_filter_enabled;
            true
        }
        Command::Sort(args) => sort::run(args, &mut state)?,
        Command::Range(args) => range::run(args, &mut state)?,
        Command::Show => false,
    };

    if mutated {
        snapshot(&state.watchlist, &state.params, &state.window, &mut store)?;
    }

    let rows = derive_view(&state.watchlist, &state.params);
    Ok(ViewReport {
        generated_at: now_rfc3339(),
        window: state.window,
        params: state.params,
        rows,
        notices,
    })
}

fn series_source(cli: &Cli) -> Arc<dyn DailySeriesSource> {
    if cli.offline {
        return Arc::new(AlphaVantageSource::default());
    }

    let api_key = std::env::var("TICKWATCH_ALPHAVANTAGE_API_KEY")
        .unwrap_or_else(|_| String::from("demo"));
    Arc::new(AlphaVantageSource::with_http_client(
        Arc::new(ReqwestHttpClient::new()),
        api_key,
    ))
}

fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| String::from("unknown"))
}
