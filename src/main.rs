//! Firebase Test Lab build step
//!
//! Reads its inputs from the environment; flags only choose the external
//! programs and log verbosity.

use clap::Parser;
use firebase_step::common::logging;
use firebase_step::step::{self, Tools};
use firebase_step::Config;

#[derive(Parser)]
#[command(name = "firebase-test-step", about = "Prepare a Firebase Test Lab run from CI")]
#[command(version, long_about = None)]
struct Cli {
    /// Cloud SDK executable
    #[arg(long, default_value = "gcloud")]
    gcloud: String,

    /// CI tool providing `envman`
    #[arg(long, default_value = "bitrise")]
    ci_tool: String,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init_cli(cli.verbose);

    let tools = Tools {
        gcloud: cli.gcloud,
        ci_tool: cli.ci_tool,
    };

    let result = match Config::load() {
        Ok(config) => step::run(&config, &tools).await,
        Err(e) => Err(e),
    };

    match result {
        Ok(outcome) => {
            tracing::info!(results = %outcome.results_uri, "Done");
        }
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
