use crate::classify::HeuristicClassifier;
use crate::errors::{GovendError, Result};
use crate::fetch::GitCliFetcher;
use crate::report::{self, OutputFormat};
use crate::vendor::{Pipeline, VendorConfig};
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct VendorArgs {
    /// Module identifiers to vendor (e.g. github.com/gorilla/mux)
    #[arg(required = true)]
    pub targets: Vec<String>,

    /// Prefix applied to every rewritten external import
    #[arg(long)]
    pub base: String,

    /// Root of the local vendor tree
    #[arg(long, default_value = "vendor")]
    pub vendor_dir: PathBuf,

    /// Clone depth for the shallow fetch
    #[arg(long, default_value_t = 1)]
    pub depth: u32,

    /// Exclude glob patterns (e.g. *_test.go)
    #[arg(long)]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(long, default_value = "text")]
    pub format: OutputFormat,

    /// Suppress progress output
    #[arg(long)]
    pub quiet: bool,
}

pub fn run(args: &VendorArgs) -> Result<()> {
    let fetcher = GitCliFetcher;
    let classifier = HeuristicClassifier;
    let config = VendorConfig {
        base: args.base.clone(),
        vendor_root: args.vendor_dir.clone(),
        depth: args.depth,
        exclude: args.exclude.clone(),
        quiet: args.quiet,
    };
    let pipeline = Pipeline::new(config, &fetcher, &classifier)?;

    // Modules vendor strictly sequentially; a hard failure on one is
    // reported and the run moves on to the next.
    let mut reports = Vec::new();
    let mut failed = 0usize;
    for target in &args.targets {
        match pipeline.vendor(target) {
            Ok(report) => reports.push(report),
            Err(err) => {
                tracing::error!("Vendoring {target} failed: {err}");
                failed += 1;
            }
        }
    }

    let mut stdout = std::io::stdout();
    match args.format {
        OutputFormat::Text => {
            for report in &reports {
                report::write_vendor_text(&mut stdout, report)?;
            }
        }
        OutputFormat::Json => {
            report::write_json(&mut stdout, &reports)?;
        }
    }

    if failed > 0 {
        return Err(GovendError::Partial {
            failed,
            total: args.targets.len(),
        });
    }
    Ok(())
}
