use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Diagnostic, Debug)]
pub enum GovendError {
    #[error("Configuration error: {0}")]
    #[diagnostic(code(govend::config))]
    Config(String),

    #[error("Fetch of {module} failed ({status}):\n{output}")]
    #[diagnostic(code(govend::fetch))]
    Fetch {
        module: String,
        status: String,
        output: String,
    },

    #[error("{failed} of {total} modules failed to vendor")]
    #[diagnostic(code(govend::partial))]
    Partial { failed: usize, total: usize },

    #[error("Parse error in {file}: {message}")]
    #[diagnostic(code(govend::parse_error))]
    Parse { file: PathBuf, message: String },

    #[error(transparent)]
    #[diagnostic(code(govend::io))]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    #[diagnostic(code(govend::glob))]
    Glob(#[from] globset::Error),

    #[error(transparent)]
    #[diagnostic(code(govend::json))]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, GovendError>;
