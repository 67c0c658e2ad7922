//! Publishing outputs for later workflow steps via `envman`

use crate::common::{Error, Result};
use crate::runner;

/// Output variable holding the results location
pub const GCS_RESULTS_DIR: &str = "GCS_RESULTS_DIR";

/// Storage URI for `object` inside `bucket`
pub fn results_uri(bucket: &str, object: &str) -> String {
    format!("gs://{bucket}/{object}")
}

/// Register `gs://<bucket>/<object>` as `GCS_RESULTS_DIR` using `ci_tool envman add`
///
/// Returns the exported URI.
pub async fn export_results_dir(ci_tool: &str, bucket: &str, object: &str) -> Result<String> {
    let uri = results_uri(bucket, object);
    tracing::info!(key = GCS_RESULTS_DIR, value = %uri, "Exporting");

    let args = ["envman", "add", "--key", GCS_RESULTS_DIR, "--value", uri.as_str()];
    match runner::run_captured(ci_tool, &args).await {
        Ok(_) => Ok(uri),
        Err(Error::SubprocessFailed { status, output, .. }) => Err(Error::ExportFailed {
            key: GCS_RESULTS_DIR.to_string(),
            reason: status.to_string(),
            output: output.unwrap_or_default(),
        }),
        Err(e) => Err(Error::ExportFailed {
            key: GCS_RESULTS_DIR.to_string(),
            reason: e.to_string(),
            output: String::new(),
        }),
    }
}
