pub mod rewrite;
pub mod vendor;

use crate::errors::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(
    name = "govend",
    version,
    about = "Vendor Go modules and rewrite their imports under your namespace"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Fetch modules into the vendor tree and rewrite their imports
    Vendor(vendor::VendorArgs),
    /// Rewrite imports under an existing directory without fetching
    Rewrite(rewrite::RewriteArgs),
}

/// Dispatch to the appropriate command handler.
pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Vendor(args) => vendor::run(&args),
        Commands::Rewrite(args) => rewrite::run(&args),
    }
}
