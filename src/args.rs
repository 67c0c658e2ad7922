//! Test Lab argument assembly
//!
//! See <https://cloud.google.com/sdk/gcloud/reference/firebase/test/android/run>

use std::fmt;

use crate::common::{Error, Result};
use crate::config::{Config, GCLOUD_OPTIONS};

pub const DEVICE_ID: &str = "NexusLowRes";
pub const OS_VERSION: &str = "25";
pub const LOCALE: &str = "en";
pub const ORIENTATION: &str = "portrait";
pub const TIMEOUT: &str = "25m";
pub const DIRECTORIES_TO_PULL: &str = "--directories-to-pull=/sdcard";

/// Kind of Test Lab run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    /// Automated exploratory crawl of the app
    Robo,
    /// Runs a supplied test APK against the app
    Instrumentation,
}

impl TestType {
    pub fn as_str(self) -> &'static str {
        match self {
            TestType::Robo => "robo",
            TestType::Instrumentation => "instrumentation",
        }
    }
}

impl fmt::Display for TestType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assembled arguments for a Test Lab run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestInvocation {
    pub test_type: TestType,
    pub args: Vec<String>,
}

/// Build the argument list for `config`, storing results under `results_dir`
pub fn build(config: &Config, results_dir: &str) -> TestInvocation {
    let mut args = Vec::new();

    let test_type = match &config.test_apk {
        Some(test_apk) => {
            args.push("--test".to_string());
            args.push(test_apk.display().to_string());
            args.push(DIRECTORIES_TO_PULL.to_string());
            TestType::Instrumentation
        }
        None => TestType::Robo,
    };

    args.push(test_type.to_string());
    args.extend([
        "--app".to_string(),
        config.app_apk.display().to_string(),
        "--device-ids".to_string(),
        DEVICE_ID.to_string(),
        "--os-version-ids".to_string(),
        OS_VERSION.to_string(),
        "--locales".to_string(),
        LOCALE.to_string(),
        "--orientations".to_string(),
        ORIENTATION.to_string(),
        "--timeout".to_string(),
        TIMEOUT.to_string(),
        format!("--results-bucket={}", config.results_bucket),
        format!("--results-dir={results_dir}"),
    ]);

    TestInvocation { test_type, args }
}

/// Split the user's option string using POSIX shell quoting
pub fn parse_user_options(options: &str) -> Result<Vec<String>> {
    shlex::split(options).ok_or_else(|| Error::invalid(GCLOUD_OPTIONS, "unbalanced quoting"))
}
