//! netstats - Main CLI Application
//!
//! Runs ping or traceroute, summarizes latency across runs and writes a JSON
//! report plus a boxplot.

use clap::Parser;
use netstats::{
    app::App,
    cli::Cli,
    config::load_config,
    error::{AppError, ErrorReporter, Result},
    PKG_NAME, VERSION,
};
use std::process;

#[tokio::main]
async fn main() {
    // Set up better panic handling
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panic: {}", panic_info);
        process::exit(99);
    }));

    // Parse command line arguments
    let cli = Cli::parse();

    if let Err(message) = cli.validate() {
        println!("{}", AppError::validation(message).format_for_console(cli.use_colors()));
        process::exit(1);
    }

    let use_color = cli.use_colors();
    let verbose = cli.verbose;

    if let Err(e) = run_application(cli).await {
        let reporter = ErrorReporter::new(use_color, verbose);

        match e {
            // Nothing to report: say so and leave without writing any file
            AppError::NoData(_) => println!("{}", e.format_for_console(use_color)),
            _ => reporter.report_error(&e),
        }

        process::exit(e.exit_code());
    }
}

/// Main application logic
async fn run_application(cli: Cli) -> Result<()> {
    if !cli.use_colors() {
        colored::control::set_override(false);
    }

    // Show debug info if requested
    if cli.debug {
        println!("{} v{}", PKG_NAME, VERSION);
        println!("Built: {}", env!("BUILD_TIME"));
        if let Some(commit) = option_env!("GIT_COMMIT") {
            println!("Commit: {}", commit);
        }
        println!("Debug mode enabled");
        println!();
    }

    // Load and validate configuration
    let config = load_config(cli)?;

    if !config.enable_color {
        colored::control::set_override(false);
    }

    let app = App::new(config).await?;
    app.run().await
}
