//! Reference validation against the set of available views

use crate::references::extract_references;
use crate::view::{SourceProvider, ViewFile};
use crate::view_name::ViewName;
use std::collections::HashSet;

/// Names of every view in a file set
pub fn available_names(files: &[ViewFile]) -> HashSet<ViewName> {
    files.iter().map(|f| f.name.clone()).collect()
}

/// Check every `ref()` in `targets` against `available`.
///
/// Returns one message per unknown `(view, reference)` pair, plus one per
/// unreadable file. An empty result means every reference resolves. The
/// registry is deliberately not consulted: it holds synthesized defaults
/// for names that do not exist.
pub fn validate_references(
    targets: &[ViewFile],
    available: &HashSet<ViewName>,
    sources: &dyn SourceProvider,
) -> Vec<String> {
    let mut errors = Vec::new();

    for file in targets {
        let raw = match sources.read_source(&file.path) {
            Ok(raw) => raw,
            Err(e) => {
                errors.push(format!("Error reading {}: {}", file.path.display(), e));
                continue;
            }
        };

        let mut reported = HashSet::new();
        for reference in extract_references(&raw) {
            if !available.contains(reference.as_str()) && reported.insert(reference.clone()) {
                errors.push(format!(
                    "View '{}' references unknown view '{}'",
                    file.name, reference
                ));
            }
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::InMemorySources;

    fn available(names: &[&str]) -> HashSet<ViewName> {
        names.iter().map(|n| ViewName::new(*n)).collect()
    }

    #[test]
    fn test_unknown_reference_reported_once() {
        let mut sources = InMemorySources::new();
        let file = sources.insert(
            "views/x.sql",
            "SELECT * FROM {{ ref('c') }} JOIN {{ ref('a') }} USING (id) JOIN {{ ref('c') }}",
        );

        let errors = validate_references(&[file], &available(&["a", "b"]), &sources);
        assert_eq!(errors, vec!["View 'x' references unknown view 'c'"]);
    }

    #[test]
    fn test_known_references_are_valid() {
        let mut sources = InMemorySources::new();
        let file = sources.insert("views/x.sql", "SELECT * FROM {{ ref('a') }}, {{ ref(\"b\") }}");

        assert!(validate_references(&[file], &available(&["a", "b"]), &sources).is_empty());
    }

    #[test]
    fn test_every_file_is_checked() {
        let mut sources = InMemorySources::new();
        let one = sources.insert("views/one.sql", "SELECT * FROM {{ ref('ghost') }}");
        let two = sources.insert("views/two.sql", "SELECT * FROM {{ ref('phantom') }}");

        let errors = validate_references(&[one, two], &available(&["one", "two"]), &sources);
        assert_eq!(errors.len(), 2);
        assert!(errors[0].contains("ghost"));
        assert!(errors[1].contains("phantom"));
    }

    #[test]
    fn test_unreadable_file_is_an_error() {
        let sources = InMemorySources::new();
        let file = ViewFile::from_path("views/missing.sql").unwrap();

        let errors = validate_references(&[file], &available(&[]), &sources);
        assert_eq!(errors.len(), 1);
        assert!(errors[0].starts_with("Error reading views/missing.sql"));
    }

    #[test]
    fn test_available_names() {
        let files = vec![
            ViewFile::from_path("v/a.sql").unwrap(),
            ViewFile::from_path("v/sub/b.sql").unwrap(),
        ];
        let names = available_names(&files);
        assert!(names.contains("a"));
        assert!(names.contains("b"));
    }
}
