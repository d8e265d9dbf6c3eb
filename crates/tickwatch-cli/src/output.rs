use crate::cli::OutputFormat;
use crate::commands::ViewReport;
use crate::error::CliError;

pub fn render(report: &ViewReport, format: OutputFormat, pretty: bool) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => {
            let payload = if pretty {
                serde_json::to_string_pretty(report)?
            } else {
                serde_json::to_string(report)?
            };
            println!("{payload}");
        }
        OutputFormat::Table => render_table(report),
    }
    Ok(())
}

fn render_table(report: &ViewReport) {
    println!(
        "window {} .. {}",
        report.window.start.format(),
        report.window.end.format()
    );
    println!(
        "filter {}  sort {} {}",
        if report.params.volatility_filter_enabled {
            "on"
        } else {
            "off"
        },
        report.params.sort_field,
        report.params.sort_direction
    );

    if report.rows.is_empty() {
        println!("no stocks to display.");
    } else {
        println!(
            "{:<10} {:>12} {:>10} {:>9} {:>12}",
            "SYMBOL", "LATEST", "CHANGE", "CHANGE%", "VOLUME"
        );
        for row in &report.rows {
            println!(
                "{:<10} {:>12.2} {:>+10.2} {:>+8.2}% {:>12}",
                row.symbol, row.latest_price, row.change, row.change_percent, row.latest_volume
            );
        }
    }

    for notice in &report.notices {
        println!("note: {notice}");
    }
}
