//! External process execution
//!
//! Two flavours: [`run_line`]/[`run`] stream the child's output straight into
//! the CI log, [`run_captured`] collects it for diagnostics.
//! There is no timeout; a hung child hangs the step.

use std::path::PathBuf;
use std::process::Stdio;

use tokio::process::Command;

use crate::common::{Error, Result};

/// Run a whitespace-separated command line with inherited stdout/stderr
///
/// No quoting is supported: `"a b"` is two arguments.
pub async fn run_line(command_line: &str) -> Result<()> {
    let mut fields = command_line.split_whitespace();
    let program = fields.next().ok_or(Error::EmptyCommand)?;
    let args: Vec<&str> = fields.collect();
    run(program, &args).await
}

/// Run `program` with inherited stdout/stderr, failing on non-zero exit
pub async fn run<S: AsRef<str>>(program: &str, args: &[S]) -> Result<()> {
    let path = resolve(program)?;
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let command = display_command(program, &args);
    tracing::info!(command = %command, "Running");

    let status = Command::new(&path)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .status()
        .await
        .map_err(|source| Error::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    if !status.success() {
        return Err(Error::SubprocessFailed {
            command,
            status,
            output: None,
        });
    }

    Ok(())
}

/// Run `program` capturing stdout and stderr, returning them combined
///
/// On non-zero exit the captured output travels inside the error.
pub async fn run_captured<S: AsRef<str>>(program: &str, args: &[S]) -> Result<String> {
    let path = resolve(program)?;
    let args: Vec<&str> = args.iter().map(|a| a.as_ref()).collect();
    let command = display_command(program, &args);
    tracing::debug!(command = %command, "Running (captured)");

    let output = Command::new(&path)
        .args(&args)
        .stdin(Stdio::null())
        .output()
        .await
        .map_err(|source| Error::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));

    if !output.status.success() {
        return Err(Error::SubprocessFailed {
            command,
            status: output.status,
            output: Some(combined),
        });
    }

    Ok(combined)
}

/// Locate `program` on PATH (or accept it as a path)
fn resolve(program: &str) -> Result<PathBuf> {
    which::which(program).map_err(|_| Error::ProgramNotFound {
        program: program.to_string(),
    })
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_run_line_success() {
        run_line("true").await.unwrap();
        run_line("  sh -c true  ").await.unwrap();
    }

    #[tokio::test]
    async fn test_run_line_failure() {
        let err = run_line("false").await.unwrap_err();
        assert!(matches!(err, Error::SubprocessFailed { output: None, .. }));
    }

    #[tokio::test]
    async fn test_run_line_empty() {
        assert!(matches!(run_line("   ").await, Err(Error::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_unknown_program() {
        let err = run_line("no-such-program-for-this-step --flag").await.unwrap_err();
        assert!(matches!(err, Error::ProgramNotFound { ref program } if program == "no-such-program-for-this-step"));
    }

    #[tokio::test]
    async fn test_run_captured_combines_streams() {
        let out = run_captured("sh", &["-c", "echo out; echo err >&2"]).await.unwrap();
        assert_eq!(out, "out\nerr\n");
    }

    #[tokio::test]
    async fn test_run_captured_failure_keeps_output() {
        let err = run_captured("sh", &["-c", "echo nope; exit 3"]).await.unwrap_err();
        match err {
            Error::SubprocessFailed { status, output, .. } => {
                assert_eq!(status.code(), Some(3));
                assert_eq!(output.as_deref(), Some("nope\n"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_display_command() {
        assert_eq!(display_command("gcloud", &["config", "set"]), "gcloud config set");
        assert_eq!(display_command("gcloud", &[]), "gcloud");
    }
}
