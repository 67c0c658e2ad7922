//! Step orchestration
//!
//! load config → authenticate gcloud → assemble Test Lab arguments →
//! export the results location.

use crate::args::{self, TestInvocation};
use crate::common::Result;
use crate::config::Config;
use crate::{export, naming, runner};

/// External programs used by the step
#[derive(Debug, Clone)]
pub struct Tools {
    /// Cloud SDK CLI
    pub gcloud: String,
    /// CI tool providing `envman`
    pub ci_tool: String,
}

/// What a completed step produced
#[derive(Debug, Clone)]
pub struct StepOutcome {
    /// Arguments for `gcloud firebase test android run`
    pub invocation: TestInvocation,
    /// Parsed `GCLOUD_OPTIONS`, not merged into `invocation`
    pub user_options: Vec<String>,
    /// Object name of the results directory inside the bucket
    pub results_dir: String,
    /// Exported `GCS_RESULTS_DIR` value
    pub results_uri: String,
}

/// Run the step against an already loaded configuration
pub async fn run(config: &Config, tools: &Tools) -> Result<StepOutcome> {
    runner::run_line(&format!("{} config set project {}", tools.gcloud, config.project)).await?;
    runner::run_line(&format!(
        "{} auth activate-service-account --key-file {} {}",
        tools.gcloud,
        config.key_path.display(),
        config.user
    ))
    .await?;

    // TODO: decide with the step owners how GCLOUD_OPTIONS combine with the fixed arguments
    let user_options = args::parse_user_options(&config.options)?;
    tracing::info!(?user_options, "User options");

    let results_dir = naming::generate();
    let invocation = args::build(config, &results_dir);
    tracing::info!(test_type = %invocation.test_type, args = ?invocation.args, "Test Lab arguments");

    let results_uri =
        export::export_results_dir(&tools.ci_tool, &config.results_bucket, &results_dir).await?;

    Ok(StepOutcome {
        invocation,
        user_options,
        results_dir,
        results_uri,
    })
}
