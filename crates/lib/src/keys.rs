//! # Object Key Helpers
//!
//! Pure helpers for deriving names from blob store object keys. Keys always use
//! `/` as the separator, whatever the host platform.

use crate::constants::{OUTPUT_EXTENSION, OUTPUT_KEY_PREFIX};
use std::fmt;

/// Returns the last path segment of an object key.
pub fn basename(key: &str) -> &str {
    key.rsplit('/').next().unwrap_or(key)
}

/// Splits a file name into its stem and extension (with the leading dot).
///
/// Leading dots do not start an extension, so `.bashrc` has none.
pub fn split_extension(name: &str) -> (&str, &str) {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name[leading_dots..].rfind('.') {
        Some(idx) => name.split_at(leading_dots + idx),
        None => (name, ""),
    }
}

/// The extension of an object key's last segment, including the dot.
pub fn extension(key: &str) -> &str {
    split_extension(basename(key)).1
}

/// The key of the linearized artifact for a source object key.
///
/// Only the last segment of the source key is kept, so the result does not
/// depend on how deep the source object is nested.
pub fn output_key(key: &str) -> String {
    let (stem, _) = split_extension(basename(key));
    format!("{OUTPUT_KEY_PREFIX}/{stem}.{OUTPUT_EXTENSION}")
}

/// A URI identifying an object within the blob store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocator {
    pub scheme: String,
    pub bucket: String,
    pub key: String,
}

impl SourceLocator {
    pub fn new(scheme: &str, bucket: &str, key: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }
}

impl fmt::Display for SourceLocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/{}", self.scheme, self.bucket, self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_extension() {
        assert_eq!(split_extension("a.pdf"), ("a", ".pdf"));
        assert_eq!(split_extension("a.tar.gz"), ("a.tar", ".gz"));
        assert_eq!(split_extension("README"), ("README", ""));
        assert_eq!(split_extension(".bashrc"), (".bashrc", ""));
        assert_eq!(split_extension("..weird.png"), ("..weird", ".png"));
        assert_eq!(split_extension("trailing."), ("trailing", "."));
        assert_eq!(split_extension(""), ("", ""));
    }

    #[test]
    fn test_extension_ignores_dots_in_directories() {
        assert_eq!(extension("docs/a.pdf"), ".pdf");
        assert_eq!(extension("dir.v1/file"), "");
        assert_eq!(extension("scan.TIF"), ".TIF");
    }

    #[test]
    fn test_output_key_is_independent_of_depth() {
        assert_eq!(output_key("a.pdf"), "cde_output/layout/a.txt");
        assert_eq!(output_key("docs/a.pdf"), "cde_output/layout/a.txt");
        assert_eq!(output_key("x/y/z/a.pdf"), "cde_output/layout/a.txt");
        assert_eq!(output_key("x/report.v2.png"), "cde_output/layout/report.v2.txt");
        assert_eq!(output_key("noext"), "cde_output/layout/noext.txt");
    }

    #[test]
    fn test_source_locator_display() {
        let locator = SourceLocator::new("store", "b", "docs/a.pdf");
        assert_eq!(locator.to_string(), "store://b/docs/a.pdf");
    }
}
