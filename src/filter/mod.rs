//! Exclusion matching for snapshot tree walking
//!
//! Patterns are compiled once into an [`ExclusionSet`] and evaluated against
//! `/`-separated paths relative to the snapshot root. Matching is a pure
//! predicate: the result depends only on the path and the pattern set, never
//! on traversal order.

pub mod pattern;

pub use pattern::ExclusionPattern;

use std::path::Path;

use crate::error::{SnapkeepError, SnapkeepResult};

/// An ordered set of compiled exclusion patterns.
///
/// A path is excluded if it matches *any* member. Order never affects the
/// result, only which pattern is reported as the first match.
#[derive(Debug, Clone)]
pub struct ExclusionSet {
    patterns: Vec<ExclusionPattern>,
}

impl ExclusionSet {
    /// Compile a list of pattern strings into an exclusion set.
    ///
    /// A malformed glob is a configuration error here, never a failure at
    /// match time.
    pub fn compile(patterns: &[String]) -> SnapkeepResult<Self> {
        let compiled = patterns
            .iter()
            .map(|p| {
                ExclusionPattern::compile(p).map_err(|e| {
                    SnapkeepError::Config(format!("Invalid exclusion pattern '{}': {}", p, e))
                })
            })
            .collect::<SnapkeepResult<Vec<_>>>()?;

        Ok(Self { patterns: compiled })
    }

    /// Check whether a root-relative path matches any pattern in the set.
    ///
    /// The path must use `/` separators; see [`relative_path_str`].
    pub fn matches(&self, relative_path: &str) -> bool {
        self.patterns.iter().any(|p| p.matches(relative_path))
    }

    /// Like [`matches`](Self::matches), but reports the source text of the
    /// first matching pattern. For diagnostics only.
    pub fn first_match(&self, relative_path: &str) -> Option<&str> {
        self.patterns
            .iter()
            .find(|p| p.matches(relative_path))
            .map(|p| p.source())
    }

    /// Source strings of all patterns, in order.
    pub fn sources(&self) -> Vec<&str> {
        self.patterns.iter().map(|p| p.source()).collect()
    }

    /// Number of patterns in the set.
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether the set contains no patterns.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Render a relative path with `/` separators regardless of the host
/// platform's conventions.
pub fn relative_path_str(path: &Path) -> String {
    let parts: Vec<String> = path
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    parts.join("/")
}
