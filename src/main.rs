//! Solcast Daily - Print daily rooftop PV energy forecasts
//!
//! Reads the Solcast credentials from the environment, fetches the forecast
//! at most once per local day, and prints per-day kWh totals.

use std::process::ExitCode;

use clap::Parser;

use solcast_daily::app;
use solcast_daily::cli::Cli;
use solcast_daily::config::Config;
use solcast_daily::logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init_tracing(cli.verbose);

    let config = cli.apply(Config::from_env());

    match app::run(&config).await {
        Ok(report) => {
            print!("{report}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}
