use crate::classify::HeuristicClassifier;
use crate::errors::{GovendError, Result};
use crate::report::{self, OutputFormat};
use crate::vendor::rewrite_tree;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct RewriteArgs {
    /// Directory whose Go files should be rewritten
    pub path: PathBuf,

    /// Prefix applied to every rewritten external import
    #[arg(long)]
    pub base: String,

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

pub fn run(args: &RewriteArgs) -> Result<()> {
    if args.base.is_empty() {
        return Err(GovendError::Config("base prefix must not be empty".into()));
    }
    let root = args.path.canonicalize()?;

    let report = rewrite_tree(
        &root,
        &args.base,
        &HeuristicClassifier,
        &args.exclude,
        args.quiet,
    )?;

    let mut stdout = std::io::stdout();
    match args.format {
        OutputFormat::Text => report::write_rewrite_text(&mut stdout, &report)?,
        OutputFormat::Json => report::write_json(&mut stdout, &report)?,
    }
    Ok(())
}
