use crate::errors::{GovendError, Result};
use std::path::Path;
use std::process::Command;

/// Derive the clone URL for a Go module identifier.
pub fn clone_url(module: &str) -> String {
    format!("https://{module}.git")
}

/// Shallow-fetches a repository into a destination directory.
///
/// Abstracted so the pipeline can be driven by a fake in tests; the
/// real implementation shells out to `git`.
pub trait Fetcher {
    fn fetch(&self, module: &str, dest: &Path, depth: u32) -> Result<()>;
}

/// `git clone --depth <n>` via subprocess. The exit status decides
/// success; captured stdout/stderr travel with the error as diagnostics.
#[derive(Debug, Clone, Copy, Default)]
pub struct GitCliFetcher;

impl Fetcher for GitCliFetcher {
    fn fetch(&self, module: &str, dest: &Path, depth: u32) -> Result<()> {
        let url = clone_url(module);
        tracing::info!("Cloning {url} (depth {depth}) into {}", dest.display());

        let output = Command::new("git")
            .arg("clone")
            .arg(format!("--depth={depth}"))
            .arg(&url)
            .arg(dest)
            .output()?;

        if !output.status.success() {
            let mut diagnostic = String::from_utf8_lossy(&output.stdout).into_owned();
            diagnostic.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(GovendError::Fetch {
                module: module.to_string(),
                status: output.status.to_string(),
                output: diagnostic,
            });
        }
        Ok(())
    }
}
