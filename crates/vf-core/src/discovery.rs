//! View file discovery: full directory scans and explicit selections

use crate::config::Config;
use crate::error::{CoreError, CoreResult};
use crate::view::ViewFile;
use std::collections::{BTreeSet, HashMap};
use std::path::{Path, PathBuf};

/// Which views a command operates on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Every view matched by the include/exclude patterns
    All,
    /// Paths, file names or bare view names given by the user
    Explicit(Vec<String>),
}

impl Selection {
    /// `All` when no items were given, otherwise `Explicit`
    pub fn from_items(items: Vec<String>) -> Self {
        if items.is_empty() {
            Selection::All
        } else {
            Selection::Explicit(items)
        }
    }
}

/// Resolve a selection to view files under a project root
pub fn discover(root: &Path, config: &Config, selection: &Selection) -> CoreResult<Vec<ViewFile>> {
    match selection {
        Selection::All => scan_views(root, config),
        Selection::Explicit(items) => {
            let files = resolve_explicit(root, config, items);
            ensure_unique_names(&files)?;
            Ok(files)
        }
    }
}

/// Fail when two files share a stem, since a view name identifies exactly
/// one file within a run
pub fn ensure_unique_names(files: &[ViewFile]) -> CoreResult<()> {
    let mut seen: HashMap<&str, &Path> = HashMap::with_capacity(files.len());
    for file in files {
        if let Some(first) = seen.insert(file.name.as_str(), &file.path) {
            return Err(CoreError::DuplicateViewName {
                name: file.name.to_string(),
                path1: first.display().to_string(),
                path2: file.path.display().to_string(),
            });
        }
    }
    Ok(())
}

/// Scan the views directory with the configured include and exclude patterns.
///
/// Include patterns match recursively. Exclude patterns match either the
/// file name or the path relative to the views directory. Results are
/// sorted by path. Two files with the same stem are an error.
pub fn scan_views(root: &Path, config: &Config) -> CoreResult<Vec<ViewFile>> {
    let views_dir = config.views_dir_absolute(root);
    if !views_dir.is_dir() {
        return Err(CoreError::ViewsDirNotFound {
            path: views_dir.display().to_string(),
        });
    }

    let excludes = config
        .sql
        .exclude_patterns
        .iter()
        .map(|p| {
            glob::Pattern::new(p).map_err(|e| CoreError::InvalidPattern {
                pattern: p.clone(),
                message: e.to_string(),
            })
        })
        .collect::<CoreResult<Vec<_>>>()?;

    let base = glob::Pattern::escape(&views_dir.to_string_lossy());
    let mut paths = BTreeSet::new();

    for include in &config.sql.include_patterns {
        let pattern = format!("{}/**/{}", base, include);
        let entries = glob::glob(&pattern).map_err(|e| CoreError::InvalidPattern {
            pattern: include.clone(),
            message: e.to_string(),
        })?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => {
                    paths.insert(path);
                }
                Ok(_) => {}
                Err(e) => log::warn!("Cannot read {}: {}", e.path().display(), e.error()),
            }
        }
    }

    let files: Vec<ViewFile> = paths
        .into_iter()
        .filter(|path| !is_excluded(path, &views_dir, &excludes))
        .filter_map(into_view_file)
        .collect();
    ensure_unique_names(&files)?;
    Ok(files)
}

fn is_excluded(path: &Path, views_dir: &Path, excludes: &[glob::Pattern]) -> bool {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    let relative = path
        .strip_prefix(views_dir)
        .map(|p| p.to_string_lossy().into_owned())
        .unwrap_or_default();
    excludes
        .iter()
        .any(|pattern| pattern.matches(&file_name) || pattern.matches(&relative))
}

fn into_view_file(path: PathBuf) -> Option<ViewFile> {
    match ViewFile::from_path(path) {
        Ok(file) => Some(file),
        Err(e) => {
            log::warn!("Skipping view file: {}", e);
            None
        }
    }
}

/// Candidate paths tried for one explicit selection item, in order
fn candidates(root: &Path, views_dir: &Path, item: &str) -> Vec<PathBuf> {
    let mut candidates = vec![root.join(item)];
    if !item.contains('/') && !item.contains('\\') {
        if !item.ends_with(".sql") {
            candidates.push(views_dir.join(format!("{}.sql", item)));
        }
        candidates.push(views_dir.join(item));
    }
    candidates
}

fn has_sql_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("sql"))
}

/// Resolve explicit paths, file names or bare view names.
///
/// A candidate must exist and end in `.sql`. Candidates outside the views
/// directory are accepted only when the item named that exact path.
/// Unresolved items are logged and skipped.
pub fn resolve_explicit(root: &Path, config: &Config, items: &[String]) -> Vec<ViewFile> {
    let views_dir = config.views_dir_absolute(root);
    let mut paths = BTreeSet::new();

    for item in items {
        let tried = candidates(root, &views_dir, item);
        let exact = &tried[0];
        let found = tried.iter().find(|candidate| {
            candidate.is_file()
                && has_sql_extension(candidate)
                && (candidate.starts_with(&views_dir) || *candidate == exact)
        });

        match found {
            Some(path) => {
                paths.insert(path.clone());
            }
            None => {
                let tried: Vec<String> = tried.iter().map(|c| c.display().to_string()).collect();
                log::warn!(
                    "Could not find SQL file for '{}', skipping (tried: {})",
                    item,
                    tried.join(", ")
                );
            }
        }
    }

    paths.into_iter().filter_map(into_view_file).collect()
}

/// Union of a full scan and the selected targets, sorted by path.
///
/// Used as the reference universe when deploying a subset.
pub fn available_views(all: &[ViewFile], targets: &[ViewFile]) -> Vec<ViewFile> {
    all.iter()
        .chain(targets)
        .cloned()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
#[path = "discovery_test.rs"]
mod tests;
