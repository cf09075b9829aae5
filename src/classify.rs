/// Classification of a single Go import path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportClass {
    /// Standard-library package (`fmt`, `net/http`)
    Stdlib,
    /// Anything fetched from elsewhere (`github.com/user/repo/pkg`)
    External,
}

/// Decides whether an import path is stdlib or external.
///
/// Kept as a trait so the heuristic can be swapped for a stricter
/// classifier (e.g. an allow-list built from `go list std`) without
/// touching the rewriter.
pub trait Classifier {
    fn classify(&self, import_path: &str) -> ImportClass;
}

/// Syntactic heuristic: stdlib import paths have no domain in front,
/// so a `.` in the first path segment marks the import external.
///
/// Known limitation: a non-domain dotted first segment (e.g. a
/// version-qualified internal path) misclassifies as external. There is
/// no registry lookup to correct it.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeuristicClassifier;

impl Classifier for HeuristicClassifier {
    fn classify(&self, import_path: &str) -> ImportClass {
        let first_segment = import_path.split('/').next().unwrap_or(import_path);
        if first_segment.contains('.') {
            ImportClass::External
        } else {
            ImportClass::Stdlib
        }
    }
}
