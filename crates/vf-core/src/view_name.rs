//! Strongly-typed view name.

use crate::newtype_string::define_name_type;
use std::path::Path;

define_name_type! {
    /// Logical view identifier: the base filename (stem) of a SQL source.
    pub struct ViewName;
}

impl ViewName {
    /// Derive the view name from a source path's file stem.
    ///
    /// Returns `None` for paths without a non-empty, UTF-8 stem.
    pub fn from_path(path: &Path) -> Option<Self> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .and_then(Self::try_new)
    }
}

#[cfg(test)]
#[path = "view_name_test.rs"]
mod tests;
