use crate::classify::Classifier;
use crate::errors::{GovendError, Result};
use crate::fetch::Fetcher;
use crate::report::{FailureStage, FileFailure, RewriteReport, VendorReport};
use crate::rewrite::{FileOutcome, Rewriter};
use crate::walk;
use std::path::{Path, PathBuf};

/// Everything one vendoring run needs, passed in explicitly. No ambient
/// globals, so two pipelines with different prefixes can coexist in one
/// process.
#[derive(Debug, Clone)]
pub struct VendorConfig {
    /// Prefix applied to every rewritten external import.
    pub base: String,
    /// Root of the local vendor tree (conventionally `vendor`).
    pub vendor_root: PathBuf,
    /// Clone depth for the shallow fetch.
    pub depth: u32,
    /// Exclude globs applied during the walk.
    pub exclude: Vec<String>,
    /// Suppress the progress bar.
    pub quiet: bool,
}

pub struct Pipeline<'a> {
    config: VendorConfig,
    fetcher: &'a dyn Fetcher,
    classifier: &'a dyn Classifier,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: VendorConfig,
        fetcher: &'a dyn Fetcher,
        classifier: &'a dyn Classifier,
    ) -> Result<Self> {
        if config.base.is_empty() {
            return Err(GovendError::Config("base prefix must not be empty".into()));
        }
        Ok(Self {
            config,
            fetcher,
            classifier,
        })
    }

    /// Vendor one module: clean slate, shallow fetch, strip VCS
    /// metadata, then rewrite every import in the fetched tree.
    ///
    /// Setup and fetch failures abort this module; per-file rewrite
    /// failures are accumulated in the returned report.
    pub fn vendor(&self, module: &str) -> Result<VendorReport> {
        let dest = self.dest_for(module)?;

        // Clean slate: nothing from a previous vendoring of a different
        // revision may survive the fetch.
        if dest.exists() {
            std::fs::remove_dir_all(&dest)?;
        }
        std::fs::create_dir_all(&dest)?;

        if let Err(err) = self.fetcher.fetch(module, &dest, self.config.depth) {
            // Leave no partial clone behind.
            let _ = std::fs::remove_dir_all(&dest);
            let _ = std::fs::create_dir_all(&dest);
            return Err(err);
        }

        // The clone's own metadata must be neither walked nor shipped.
        let git_meta = dest.join(".git");
        if git_meta.exists() {
            std::fs::remove_dir_all(&git_meta)?;
        }

        let rewrite = rewrite_tree(
            &dest,
            &self.config.base,
            self.classifier,
            &self.config.exclude,
            self.config.quiet,
        )?;

        Ok(VendorReport {
            module: module.to_string(),
            dest,
            rewrite,
        })
    }

    /// Nest the vendor subdirectory by the module identifier's path
    /// segments: `github.com/gorilla/mux` lands under
    /// `<vendor_root>/github.com/gorilla/mux`.
    fn dest_for(&self, module: &str) -> Result<PathBuf> {
        if module.is_empty() {
            return Err(GovendError::Config("target module must not be empty".into()));
        }
        let mut dest = self.config.vendor_root.clone();
        for segment in module.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." {
                return Err(GovendError::Config(format!(
                    "invalid target module path: {module}"
                )));
            }
            dest.push(segment);
        }
        Ok(dest)
    }
}

/// Walk `root` and rewrite each selected file with `base`.
///
/// One bad file never aborts the pass: parse and write failures are
/// logged and collected into the report alongside walk failures.
pub fn rewrite_tree(
    root: &Path,
    base: &str,
    classifier: &dyn Classifier,
    exclude: &[String],
    quiet: bool,
) -> Result<RewriteReport> {
    let discovery = walk::discover_files(root, exclude)?;

    let mut report = RewriteReport {
        root: root.to_path_buf(),
        base: base.to_string(),
        ..Default::default()
    };
    for failure in discovery.failures {
        tracing::warn!("Walk failure: {}", failure.message);
        report.failures.push(FileFailure {
            file: failure.path,
            stage: FailureStage::Walk,
            message: failure.message,
        });
    }

    let progress = if !quiet {
        let pb = indicatif::ProgressBar::new(discovery.files.len() as u64);
        pb.set_style(
            indicatif::ProgressStyle::default_bar()
                .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} files ({eta})")
                .unwrap()
                .progress_chars("#>-"),
        );
        Some(pb)
    } else {
        None
    };

    let rewriter = Rewriter::new(base, classifier);

    for file in &discovery.files {
        report.files_visited += 1;

        match rewriter.rewrite_file(file) {
            Ok(FileOutcome::Rewritten { imports_rewritten }) => {
                report.files_rewritten += 1;
                report.imports_rewritten += imports_rewritten;
            }
            Ok(FileOutcome::Unchanged) => {
                report.files_unchanged += 1;
            }
            Err(err) => {
                tracing::warn!("Skipping {}: {}", file.display(), err);
                let stage = match err {
                    GovendError::Parse { .. } => FailureStage::Parse,
                    _ => FailureStage::Io,
                };
                report.failures.push(FileFailure {
                    file: Some(file.clone()),
                    stage,
                    message: err.to_string(),
                });
            }
        }

        if let Some(ref pb) = progress {
            pb.inc(1);
        }
    }

    if let Some(pb) = progress {
        pb.finish_and_clear();
    }

    Ok(report)
}
