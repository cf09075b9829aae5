use crate::errors::Result;
use clap::ValueEnum;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

#[derive(Debug, Default, Clone, Copy, ValueEnum, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Pipeline stage at which a per-file failure occurred.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FailureStage {
    Walk,
    Parse,
    Io,
}

/// One non-fatal failure, attributed to a file where known.
#[derive(Debug, Serialize)]
pub struct FileFailure {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    pub stage: FailureStage,
    pub message: String,
}

/// Accumulated outcome of one walk-and-rewrite pass over a tree.
#[derive(Debug, Default, Serialize)]
pub struct RewriteReport {
    pub root: PathBuf,
    pub base: String,
    pub files_visited: usize,
    pub files_rewritten: usize,
    pub files_unchanged: usize,
    pub imports_rewritten: usize,
    pub failures: Vec<FileFailure>,
}

/// Outcome of vendoring one module: where it landed, plus the rewrite pass.
#[derive(Debug, Serialize)]
pub struct VendorReport {
    pub module: String,
    pub dest: PathBuf,
    #[serde(flatten)]
    pub rewrite: RewriteReport,
}

/// Write a rewrite report as human-readable text.
pub fn write_rewrite_text<W: Write>(writer: &mut W, report: &RewriteReport) -> Result<()> {
    writeln!(writer, "Rewrote imports under {}", report.root.display())?;
    writeln!(writer, "Base prefix: {}", report.base)?;
    writeln!(writer, "Visited:   {} files", report.files_visited)?;
    writeln!(writer, "Rewritten: {} files", report.files_rewritten)?;
    writeln!(writer, "Unchanged: {} files", report.files_unchanged)?;
    writeln!(writer, "Imports:   {} rewritten", report.imports_rewritten)?;
    write_failures(writer, &report.failures)?;
    Ok(())
}

/// Write a vendor report as human-readable text.
pub fn write_vendor_text<W: Write>(writer: &mut W, report: &VendorReport) -> Result<()> {
    writeln!(
        writer,
        "Vendored {} into {}",
        report.module,
        report.dest.display()
    )?;
    writeln!(writer, "Base prefix: {}", report.rewrite.base)?;
    writeln!(writer, "Visited:   {} files", report.rewrite.files_visited)?;
    writeln!(writer, "Rewritten: {} files", report.rewrite.files_rewritten)?;
    writeln!(writer, "Unchanged: {} files", report.rewrite.files_unchanged)?;
    writeln!(
        writer,
        "Imports:   {} rewritten",
        report.rewrite.imports_rewritten
    )?;
    write_failures(writer, &report.rewrite.failures)?;
    Ok(())
}

fn write_failures<W: Write>(writer: &mut W, failures: &[FileFailure]) -> Result<()> {
    if failures.is_empty() {
        return Ok(());
    }
    writeln!(writer)?;
    writeln!(writer, "Failures ({})", failures.len())?;
    for failure in failures {
        match &failure.file {
            Some(file) => writeln!(
                writer,
                "  [{:?}] {}: {}",
                failure.stage,
                file.display(),
                failure.message
            )?,
            None => writeln!(writer, "  [{:?}] {}", failure.stage, failure.message)?,
        }
    }
    Ok(())
}

/// Write any serializable report as pretty JSON.
pub fn write_json<W: Write, T: Serialize>(writer: &mut W, report: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, report)?;
    writeln!(writer)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> RewriteReport {
        RewriteReport {
            root: PathBuf::from("vendor/github.com/foo/bar"),
            base: "acme/vendor".to_string(),
            files_visited: 3,
            files_rewritten: 2,
            files_unchanged: 1,
            imports_rewritten: 5,
            failures: vec![FileFailure {
                file: Some(PathBuf::from("bad.go")),
                stage: FailureStage::Parse,
                message: "source contains syntax errors".to_string(),
            }],
        }
    }

    #[test]
    fn text_report_lists_counts_and_failures() {
        let mut out = Vec::new();
        write_rewrite_text(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("Visited:   3 files"));
        assert!(text.contains("Rewritten: 2 files"));
        assert!(text.contains("Failures (1)"));
        assert!(text.contains("bad.go"));
    }

    #[test]
    fn json_report_round_trips_counts() {
        let mut out = Vec::new();
        write_json(&mut out, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["files_visited"], 3);
        assert_eq!(value["failures"][0]["stage"], "parse");
    }
}
