use crate::classify::{Classifier, ImportClass};
use crate::errors::{GovendError, Result};
use std::io::Write;
use std::path::Path;
use streaming_iterator::StreamingIterator;

/// Tree-sitter query matching the path literal of every import spec,
/// whether the spec is standalone or inside a grouped import block.
/// Raw string literals (`import ` + backquotes) are legal Go, so both
/// literal forms are captured.
const IMPORT_QUERY: &str =
    r#"(import_spec path: [(interpreted_string_literal) (raw_string_literal)] @import_path)"#;

/// What a rewrite pass did to one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileOutcome {
    /// At least one import was prefixed and the file was written back.
    Rewritten { imports_rewritten: usize },
    /// Nothing qualified; the file on disk was not touched.
    Unchanged,
}

/// Rewrites external import paths in Go source files under a base prefix.
pub struct Rewriter<'a> {
    base: String,
    classifier: &'a dyn Classifier,
}

impl<'a> Rewriter<'a> {
    pub fn new(base: impl Into<String>, classifier: &'a dyn Classifier) -> Self {
        Self {
            base: base.into(),
            classifier,
        }
    }

    /// Rewrite the file at `path` in place.
    ///
    /// The new content is written to a temporary file in the same
    /// directory and renamed over the original, so a failure at any
    /// point leaves the original untouched. A file that needs no edits
    /// is not rewritten at all, which makes repeated passes no-ops.
    pub fn rewrite_file(&self, path: &Path) -> Result<FileOutcome> {
        let source = std::fs::read(path)?;

        let rewritten = match self.rewrite_source(&source, path)? {
            Some(r) => r,
            None => return Ok(FileOutcome::Unchanged),
        };

        let parent = path.parent().unwrap_or(Path::new("."));
        let mut tmp = tempfile::NamedTempFile::new_in(parent)?;
        tmp.write_all(&rewritten.source)?;
        tmp.persist(path).map_err(|e| GovendError::Io(e.error))?;

        Ok(FileOutcome::Rewritten {
            imports_rewritten: rewritten.imports_rewritten,
        })
    }

    /// Rewrite `source` and return the new bytes, or `None` when no
    /// import qualifies. Splices the prefix into the import literals
    /// only; every other byte of the file is carried over verbatim.
    pub fn rewrite_source(&self, source: &[u8], file: &Path) -> Result<Option<RewrittenSource>> {
        let mut parser = tree_sitter::Parser::new();
        parser
            .set_language(&tree_sitter_go::LANGUAGE.into())
            .expect("failed to set Go language");

        let tree = parser
            .parse(source, None)
            .ok_or_else(|| GovendError::Parse {
                file: file.to_path_buf(),
                message: "parser produced no tree".to_string(),
            })?;
        if tree.root_node().has_error() {
            return Err(GovendError::Parse {
                file: file.to_path_buf(),
                message: "source contains syntax errors".to_string(),
            });
        }

        let language = tree_sitter_go::LANGUAGE.into();
        let query = tree_sitter::Query::new(&language, IMPORT_QUERY)
            .expect("failed to compile Go import query");

        let mut cursor = tree_sitter::QueryCursor::new();
        let mut matches = cursor.matches(&query, tree.root_node(), source);

        // Byte offsets just after each qualifying literal's opening
        // delimiter, collected in document order.
        let mut insert_points: Vec<usize> = Vec::new();

        while let Some(m) = matches.next() {
            for capture in m.captures {
                let node = capture.node;
                let literal = node.utf8_text(source).unwrap_or_default();
                if literal.len() < 2 {
                    continue;
                }

                // Strip the delimiters (double quote or backquote).
                let import_path = &literal[1..literal.len() - 1];
                if import_path.is_empty() {
                    continue;
                }

                if self.classifier.classify(import_path) == ImportClass::Stdlib {
                    continue;
                }
                // Idempotence guard: already under the base prefix.
                if import_path.contains(&self.base) {
                    continue;
                }

                insert_points.push(node.start_byte() + 1);
            }
        }

        if insert_points.is_empty() {
            return Ok(None);
        }

        // Splice back-to-front so earlier offsets stay valid.
        let prefix = format!("{}/", self.base);
        let mut out = source.to_vec();
        for &at in insert_points.iter().rev() {
            out.splice(at..at, prefix.bytes());
        }

        Ok(Some(RewrittenSource {
            source: out,
            imports_rewritten: insert_points.len(),
        }))
    }
}

/// Result of rewriting one file's source bytes.
#[derive(Debug)]
pub struct RewrittenSource {
    pub source: Vec<u8>,
    pub imports_rewritten: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::HeuristicClassifier;
    use pretty_assertions::assert_eq;

    fn rewrite(source: &str, base: &str) -> Option<String> {
        let rewriter = Rewriter::new(base, &HeuristicClassifier);
        rewriter
            .rewrite_source(source.as_bytes(), Path::new("main.go"))
            .unwrap()
            .map(|r| String::from_utf8(r.source).unwrap())
    }

    #[test]
    fn stdlib_only_file_is_untouched() {
        let source = "package main\n\nimport \"fmt\"\n";
        assert_eq!(rewrite(source, "acme/vendor"), None);
    }

    #[test]
    fn external_import_gets_prefix() {
        let source = "package main\n\nimport \"github.com/foo/bar\"\n";
        assert_eq!(
            rewrite(source, "acme/vendor").unwrap(),
            "package main\n\nimport \"acme/vendor/github.com/foo/bar\"\n"
        );
    }

    #[test]
    fn grouped_imports_rewrite_only_external_entries() {
        let source = r#"package main

import (
	"fmt"
	"net/http"
	"github.com/gorilla/mux"
)
"#;
        let expected = r#"package main

import (
	"fmt"
	"net/http"
	"acme/vendor/github.com/gorilla/mux"
)
"#;
        assert_eq!(rewrite(source, "acme/vendor").unwrap(), expected);
    }

    #[test]
    fn second_pass_is_a_no_op() {
        let source = "package main\n\nimport \"github.com/foo/bar\"\n";
        let once = rewrite(source, "acme/vendor").unwrap();
        assert_eq!(rewrite(&once, "acme/vendor"), None);
    }

    #[test]
    fn aliased_import_keeps_its_alias() {
        let source = "package main\n\nimport m \"github.com/gorilla/mux\"\n";
        assert_eq!(
            rewrite(source, "acme/vendor").unwrap(),
            "package main\n\nimport m \"acme/vendor/github.com/gorilla/mux\"\n"
        );
    }

    #[test]
    fn raw_string_import_keeps_backquote_delimiters() {
        let source = "package main\n\nimport `github.com/foo/bar`\n";
        assert_eq!(
            rewrite(source, "acme/vendor").unwrap(),
            "package main\n\nimport `acme/vendor/github.com/foo/bar`\n"
        );
    }

    #[test]
    fn non_import_content_is_byte_identical() {
        let source = r#"// Package demo does things.
package demo

import (
	"strings"
	"github.com/foo/bar"
)

// Shout returns s uppercased via bar.
func Shout(s string) string {
	return strings.ToUpper(bar.Tag(s))
}
"#;
        let out = rewrite(source, "acme/vendor").unwrap();
        // Only the one import line changed.
        let diff: Vec<(&str, &str)> = source
            .lines()
            .zip(out.lines())
            .filter(|(a, b)| a != b)
            .collect();
        assert_eq!(diff, vec![("\t\"github.com/foo/bar\"", "\t\"acme/vendor/github.com/foo/bar\"")]);
    }

    #[test]
    fn malformed_source_is_a_parse_error() {
        let rewriter = Rewriter::new("acme/vendor", &HeuristicClassifier);
        let err = rewriter
            .rewrite_source(b"package main\n\nfunc {{{\n", Path::new("broken.go"))
            .unwrap_err();
        assert!(matches!(err, GovendError::Parse { .. }));
    }

    #[test]
    fn rewrite_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("main.go");
        std::fs::write(&path, "package main\n\nimport \"github.com/foo/bar\"\n").unwrap();

        let rewriter = Rewriter::new("acme/vendor", &HeuristicClassifier);
        let outcome = rewriter.rewrite_file(&path).unwrap();
        assert_eq!(outcome, FileOutcome::Rewritten { imports_rewritten: 1 });
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "package main\n\nimport \"acme/vendor/github.com/foo/bar\"\n"
        );

        // A second pass must not touch the file.
        assert_eq!(rewriter.rewrite_file(&path).unwrap(), FileOutcome::Unchanged);
    }
}
