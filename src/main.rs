use clap::Parser;
use history_sync::app::App;
use history_sync::cli::Args;
use history_sync::config::Config;
use history_sync::logging::setup_logging;
use std::process::ExitCode;
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    // Argument errors exit here, before any store or network access
    let args = Args::parse();

    // Logging comes up even when config is broken so the failure is reported
    let config = match Config::load() {
        Ok(config) => {
            setup_logging(&config.log_level, args.tracing);
            config
        }
        Err(e) => {
            setup_logging("info", args.tracing);
            error!(error = %e, "Failed to load configuration");
            return ExitCode::FAILURE;
        }
    };

    let app = match App::new(&config, args) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to initialize application");
            return ExitCode::FAILURE;
        }
    };

    match app.run().await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Sync failed");
            ExitCode::FAILURE
        }
    }
}
