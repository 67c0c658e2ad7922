//! Step configuration
//!
//! All inputs arrive through environment variables set by the CI workflow.
//! They are read once here; every later stage receives a [`Config`].

use std::fmt;
use std::path::{Path, PathBuf};

use base64::Engine;
use serde::Deserialize;

use crate::common::{Error, Result};

/// Service-account identity; read from the key file when unset
pub const GCLOUD_USER: &str = "GCLOUD_USER";
/// Cloud project id; read from the key file when unset
pub const GCLOUD_PROJECT: &str = "GCLOUD_PROJECT";
pub const GCLOUD_BUCKET: &str = "GCLOUD_BUCKET";
pub const GCLOUD_OPTIONS: &str = "GCLOUD_OPTIONS";
pub const APP_APK: &str = "APP_APK";
/// Presence switches the run to instrumentation tests
pub const TEST_APK: &str = "TEST_APK";
/// Base64 encoded service-account JSON key
pub const GCLOUD_KEY: &str = "GCLOUD_KEY";
pub const HOME: &str = "HOME";

/// File name of the decoded key, written under `$HOME`
pub const KEY_FILE_NAME: &str = "gcloudkey.json";

/// Fully validated step configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Bucket receiving the test results
    pub results_bucket: String,
    /// Free-form, shell-quoted gcloud options
    pub options: String,
    /// Service-account email
    pub user: String,
    /// Cloud project id
    pub project: String,
    /// Where the decoded credential was written
    pub key_path: PathBuf,
    pub app_apk: PathBuf,
    pub test_apk: Option<PathBuf>,
}

/// The subset of a service-account key used to backfill identity
#[derive(Debug, Default, Deserialize)]
pub struct KeyFile {
    #[serde(default)]
    pub project_id: String,
    #[serde(default)]
    pub client_email: String,
}

impl KeyFile {
    /// Parse a decoded service-account key
    pub fn parse(raw: &[u8]) -> Result<Self> {
        serde_json::from_slice(raw).map_err(|e| Error::invalid(GCLOUD_KEY, e))
    }
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::load_from(|name| std::env::var(name).ok())
    }

    /// Load configuration using `lookup` to resolve variables
    ///
    /// Validates every input, then writes the decoded credential to
    /// `$HOME/gcloudkey.json`, overwriting any previous key.
    pub fn load_from<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let optional = |name: &str| lookup(name).filter(|v| !v.is_empty());
        let required =
            |name: &str| optional(name).ok_or_else(|| Error::ConfigurationMissing(name.to_string()));

        let results_bucket = required(GCLOUD_BUCKET)?;
        // Must be present, but an empty option string is valid
        let options =
            lookup(GCLOUD_OPTIONS).ok_or_else(|| Error::ConfigurationMissing(GCLOUD_OPTIONS.into()))?;

        let app_apk = PathBuf::from(required(APP_APK)?);
        ensure_artifact(APP_APK, &app_apk)?;

        let test_apk = optional(TEST_APK).map(PathBuf::from);
        if let Some(path) = &test_apk {
            ensure_artifact(TEST_APK, path)?;
        }

        let encoded_key = required(GCLOUD_KEY)?;
        let home = PathBuf::from(required(HOME)?);

        let key = base64::engine::general_purpose::STANDARD
            .decode(encoded_key.trim())
            .map_err(|e| Error::invalid(GCLOUD_KEY, e))?;

        let (user, project) = resolve_identity(optional(GCLOUD_USER), optional(GCLOUD_PROJECT), &key)?;

        let key_path = home.join(KEY_FILE_NAME);
        write_key_file(&key_path, &key)?;

        let config = Self {
            results_bucket,
            options,
            user,
            project,
            key_path,
            app_apk,
            test_apk,
        };
        tracing::info!(%config, "Loaded configuration");
        Ok(config)
    }

    /// Whether a test artifact was supplied
    pub fn has_test_apk(&self) -> bool {
        self.test_apk.is_some()
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "bucket={} user={} project={} key={} app={}",
            self.results_bucket,
            self.user,
            self.project,
            self.key_path.display(),
            self.app_apk.display()
        )?;
        if let Some(test) = &self.test_apk {
            write!(f, " test={}", test.display())?;
        }
        Ok(())
    }
}

/// Fill in user and project from the key file when either is unset
///
/// The key is only parsed when something needs backfilling.
fn resolve_identity(
    user: Option<String>,
    project: Option<String>,
    key: &[u8],
) -> Result<(String, String)> {
    if let (Some(user), Some(project)) = (&user, &project) {
        return Ok((user.clone(), project.clone()));
    }

    let parsed = KeyFile::parse(key)?;

    let user = match user {
        Some(user) => user,
        None if !parsed.client_email.is_empty() => {
            tracing::debug!("Using client_email from key file");
            parsed.client_email
        }
        None => return Err(Error::ConfigurationMissing(GCLOUD_USER.to_string())),
    };

    let project = match project {
        Some(project) => project,
        None if !parsed.project_id.is_empty() => {
            tracing::debug!("Using project_id from key file");
            parsed.project_id
        }
        None => return Err(Error::ConfigurationMissing(GCLOUD_PROJECT.to_string())),
    };

    Ok((user, project))
}

fn ensure_artifact(name: &str, path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::ArtifactNotFound {
            name: name.to_string(),
            path: path.to_path_buf(),
        })
    }
}

/// Write the decoded credential, readable by owner/group/other, writable by owner
fn write_key_file(path: &Path, key: &[u8]) -> Result<()> {
    let fs_err = |source: std::io::Error| Error::FileSystem {
        path: path.to_path_buf(),
        source,
    };

    std::fs::write(path, key).map_err(fs_err)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o644)).map_err(fs_err)?;
    }

    tracing::debug!(path = %path.display(), "Wrote service-account key");
    Ok(())
}
