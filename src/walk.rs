use crate::errors::Result;
use globset::{Glob, GlobSet, GlobSetBuilder};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Dot-prefixed VCS metadata directories that must never be visited.
const VCS_DIRS: &[&str] = &[".git", ".hg", ".svn", ".bzr"];

/// Outcome of one directory traversal: the selected files plus any
/// per-entry failures, so one unreadable subtree does not hide the rest.
#[derive(Debug, Default)]
pub struct Discovery {
    pub files: Vec<PathBuf>,
    pub failures: Vec<WalkFailure>,
}

#[derive(Debug)]
pub struct WalkFailure {
    pub path: Option<PathBuf>,
    pub message: String,
}

fn is_vcs_dir(entry: &walkdir::DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| VCS_DIRS.contains(&name))
}

fn build_exclude_set(patterns: &[String]) -> Result<GlobSet> {
    let mut builder = GlobSetBuilder::new();
    for pattern in patterns {
        builder.add(Glob::new(pattern)?);
    }
    Ok(builder.build()?)
}

/// Discover Go source files under `root`, depth-first.
///
/// VCS metadata directories are pruned entirely. Exclude globs are
/// matched against root-relative paths and bare file names, so both
/// `internal/gen/*.go` and `*_test.go` work. Traversal errors are
/// collected rather than halting the walk; this deliberately does NOT
/// honor `.gitignore` — a vendored tree must be rewritten in full.
pub fn discover_files(root: &Path, exclude_patterns: &[String]) -> Result<Discovery> {
    let exclude_set = build_exclude_set(exclude_patterns)?;

    let mut discovery = Discovery::default();

    let walker = WalkDir::new(root)
        .into_iter()
        .filter_entry(|entry| !is_vcs_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                discovery.failures.push(WalkFailure {
                    path: e.path().map(Path::to_path_buf),
                    message: e.to_string(),
                });
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let path = entry.path();
        let is_go = path
            .extension()
            .and_then(|e| e.to_str())
            .is_some_and(|ext| ext == "go");
        if !is_go {
            continue;
        }

        let relative = path.strip_prefix(root).unwrap_or(path);
        if exclude_set.is_match(relative) {
            continue;
        }
        if let Some(fname) = path.file_name() {
            if exclude_set.is_match(Path::new(fname)) {
                continue;
            }
        }

        discovery.files.push(path.to_path_buf());
    }

    // Sort for deterministic reports; rewriting itself is order-independent.
    discovery.files.sort();

    Ok(discovery)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(path: &Path) {
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, b"package x\n").unwrap();
    }

    #[test]
    fn selects_only_go_files() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.go"));
        touch(&dir.path().join("README.md"));
        touch(&dir.path().join("sub/b.go"));

        let discovery = discover_files(dir.path(), &[]).unwrap();
        let names: Vec<_> = discovery
            .files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(discovery.failures.len(), 0);
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"a.go".to_string()));
        assert!(names.contains(&"b.go".to_string()));
    }

    #[test]
    fn prunes_vcs_metadata_even_with_go_files_inside() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("a.go"));
        touch(&dir.path().join(".git/hooks/sample.go"));
        touch(&dir.path().join("pkg/.hg/stale.go"));

        let discovery = discover_files(dir.path(), &[]).unwrap();
        assert_eq!(discovery.files.len(), 1);
        assert!(discovery.files[0].ends_with("a.go"));
    }

    #[test]
    fn exclude_globs_match_file_names() {
        let dir = tempfile::tempdir().unwrap();
        touch(&dir.path().join("mux.go"));
        touch(&dir.path().join("mux_test.go"));

        let discovery = discover_files(dir.path(), &["*_test.go".to_string()]).unwrap();
        assert_eq!(discovery.files.len(), 1);
        assert!(discovery.files[0].ends_with("mux.go"));
    }

    #[test]
    fn bad_exclude_glob_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(discover_files(dir.path(), &["[".to_string()]).is_err());
    }
}
