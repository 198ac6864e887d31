//! demandcast CLI: batch forecast run plus the interactive chart loop.

use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use env_logger::Env;

use demandcast::data::{load_history, write_forecasts, HISTORY_SHEET};
use demandcast::pipeline::{run_batch, PipelineConfig};
use demandcast::vis;
use demandcast::Result;

#[derive(Parser)]
#[command(
    name = "demandcast",
    about = "Per-product ARIMA sales forecasting",
    version
)]
struct Cli {
    /// Input workbook holding the historical sales sheet
    input: PathBuf,

    /// Output workbook for the combined forecasts
    #[arg(short, long, default_value = "forecasts.xlsx")]
    output: PathBuf,

    /// Worksheet name with the raw history
    #[arg(long, default_value = HISTORY_SHEET)]
    sheet: String,

    /// Directory for rendered diagnostic charts
    #[arg(long, default_value = "plots")]
    plot_dir: PathBuf,

    /// Run the batch pass only, skipping the interactive chart loop
    #[arg(long)]
    batch_only: bool,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let records = load_history(&cli.input, &cli.sheet)?;
    let store = run_batch(&records, &PipelineConfig::default())?;

    let all_forecasts = store.all_records();
    write_forecasts(&cli.output, &all_forecasts)?;
    println!(
        "\nForecasts for {} products saved to '{}'",
        store.len(),
        cli.output.display()
    );
    for (product_id, reason) in store.skipped() {
        println!("Skipped {product_id}: {reason}");
    }

    println!("\nForecast summary:");
    for record in all_forecasts.iter().take(5) {
        println!(
            "  {}  {}  {:.2}",
            record.date, record.product_id, record.forecast_units
        );
    }

    if !cli.batch_only {
        let stdin = io::stdin();
        let mut stdout = io::stdout();
        vis::run_loop(&store, &cli.plot_dir, stdin.lock(), &mut stdout)?;
    }

    Ok(())
}
