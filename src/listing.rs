/// Accounting listing capture: spawn the firewall binary, wait for it,
/// return its combined stdout+stderr as text.
use std::path::{Path, PathBuf};
use std::process::ExitStatus;
use tokio::process::Command;

/// Flags requesting a numeric, verbose, extended-byte-count rule listing.
/// The scanner's column assumptions depend on this exact set.
const LIST_FLAGS: [&str; 4] = ["-L", "-n", "-v", "-x"];

/// Errors that can occur while capturing the listing. Both are fatal to the
/// check; there is no retry and no partial-output processing.
#[derive(Debug)]
pub enum CaptureError {
    /// The firewall binary could not be started.
    Spawn {
        bin: PathBuf,
        source: std::io::Error,
    },
    /// The command ran but exited non-zero (or was killed by a signal).
    Failed {
        status: ExitStatus,
        /// Combined stdout+stderr captured before the failure.
        output: String,
    },
}

impl std::fmt::Display for CaptureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CaptureError::Spawn { bin, source } => {
                write!(f, "failed to run {}: {}", bin.display(), source)
            }
            CaptureError::Failed { status, output } => {
                write!(f, "listing command failed ({}): {}", status, output.trim_end())
            }
        }
    }
}

impl std::error::Error for CaptureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CaptureError::Spawn { source, .. } => Some(source),
            CaptureError::Failed { .. } => None,
        }
    }
}

/// Run `<bin> <ftype> -L -n -v -x` and capture its output.
///
/// `ftype` is passed through uninterpreted; the binary itself rejects types
/// it does not know. Spawns exactly one process and blocks until it exits.
pub async fn capture_listing(bin: &Path, ftype: &str) -> Result<String, CaptureError> {
    tracing::debug!(bin = %bin.display(), ftype, "running firewall listing");

    let result = Command::new(bin)
        .arg(ftype)
        .args(LIST_FLAGS)
        .output()
        .await
        .map_err(|e| CaptureError::Spawn {
            bin: bin.to_path_buf(),
            source: e,
        })?;

    // Stream interleaving is lost with separate pipes; stdout carries the
    // listing and stderr is empty unless the command itself complains.
    let mut output = String::from_utf8_lossy(&result.stdout).into_owned();
    output.push_str(&String::from_utf8_lossy(&result.stderr));

    if !result.status.success() {
        return Err(CaptureError::Failed {
            status: result.status,
            output,
        });
    }

    tracing::debug!(bytes = output.len(), "listing captured");
    Ok(output)
}

/// Test helper: write an executable script that ignores its arguments and
/// runs `body` in place of the real firewall binary.
#[cfg(test)]
pub(crate) fn fake_firewall(dir: &Path, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join("fake-xtables");
    std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
    path
}
