//! Compiled exclusion pattern variants
//!
//! Each pattern string is classified once at compile time, so matching never
//! re-derives the pattern kind per path.

use globset::{Glob, GlobMatcher};

/// A single exclusion pattern, compiled into its match strategy.
#[derive(Debug, Clone)]
pub enum ExclusionPattern {
    /// No wildcard: matches the path exactly, or as a directory prefix
    /// (`build` matches `build` and `build/x`, never `buildtools.txt`).
    Exact(String),
    /// Trailing wildcard (`prefix*`): matches any path starting with the
    /// prefix.
    Prefix { source: String, prefix: String },
    /// Leading wildcard (`*suffix`): matches any path ending with the
    /// suffix.
    Suffix { source: String, suffix: String },
    /// Wildcard elsewhere (`a*b`): full shell-glob match. `*` crosses path
    /// separators, as in fnmatch.
    Glob { source: String, matcher: GlobMatcher },
}

impl ExclusionPattern {
    /// Classify and compile a pattern string.
    ///
    /// Classification mirrors the match contract: a trailing `*` wins over a
    /// leading `*`, and anything else containing `*` becomes a full glob.
    pub fn compile(pattern: &str) -> Result<Self, globset::Error> {
        if !pattern.contains('*') {
            return Ok(Self::Exact(pattern.to_string()));
        }

        if let Some(prefix) = pattern.strip_suffix('*') {
            if !prefix.contains('*') {
                return Ok(Self::Prefix {
                    source: pattern.to_string(),
                    prefix: prefix.to_string(),
                });
            }
        }

        if let Some(suffix) = pattern.strip_prefix('*') {
            if !suffix.contains('*') {
                return Ok(Self::Suffix {
                    source: pattern.to_string(),
                    suffix: suffix.to_string(),
                });
            }
        }

        let matcher = Glob::new(pattern)?.compile_matcher();
        Ok(Self::Glob {
            source: pattern.to_string(),
            matcher,
        })
    }

    /// Check whether a root-relative `/`-separated path matches this pattern.
    pub fn matches(&self, relative_path: &str) -> bool {
        match self {
            Self::Exact(pattern) => {
                relative_path == pattern
                    || relative_path
                        .strip_prefix(pattern.as_str())
                        .is_some_and(|rest| rest.starts_with('/'))
            }
            Self::Prefix { prefix, .. } => relative_path.starts_with(prefix.as_str()),
            Self::Suffix { suffix, .. } => relative_path.ends_with(suffix.as_str()),
            Self::Glob { matcher, .. } => matcher.is_match(relative_path),
        }
    }

    /// The original pattern text.
    pub fn source(&self) -> &str {
        match self {
            Self::Exact(pattern) => pattern,
            Self::Prefix { source, .. } => source,
            Self::Suffix { source, .. } => source,
            Self::Glob { source, .. } => source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compile(pattern: &str) -> ExclusionPattern {
        ExclusionPattern::compile(pattern).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let p = compile("node_modules");
        assert!(p.matches("node_modules"));
        assert!(p.matches("node_modules/x/y.js"));
        assert!(!p.matches("node_modules_backup"));
        assert!(!p.matches("src/node_modules_like"));
    }

    #[test]
    fn test_exact_requires_separator_after_prefix() {
        // "build" must not swallow a file literally named "buildtools.txt"
        let p = compile("build");
        assert!(p.matches("build"));
        assert!(p.matches("build/out.js"));
        assert!(!p.matches("buildtools.txt"));
    }

    #[test]
    fn test_exact_with_slash() {
        let p = compile(".vscode/settings.json");
        assert!(p.matches(".vscode/settings.json"));
        assert!(!p.matches(".vscode/extensions.json"));
    }

    #[test]
    fn test_prefix_glob() {
        let p = compile("npm-debug.log*");
        assert!(p.matches("npm-debug.log"));
        assert!(p.matches("npm-debug.log.1"));
        assert!(!p.matches("yarn-debug.log"));
        assert!(matches!(p, ExclusionPattern::Prefix { .. }));
    }

    #[test]
    fn test_suffix_glob() {
        let p = compile("*.log");
        assert!(p.matches("app.log"));
        assert!(p.matches("logs/server.log"));
        assert!(!p.matches("app.log.bak"));
        assert!(matches!(p, ExclusionPattern::Suffix { .. }));

        let tilde = compile("*~");
        assert!(tilde.matches("notes.txt~"));
        assert!(!tilde.matches("notes.txt"));
    }

    #[test]
    fn test_full_glob_inner_wildcard() {
        let p = compile(".env.*.local");
        assert!(matches!(p, ExclusionPattern::Glob { .. }));
        assert!(p.matches(".env.staging.local"));
        assert!(p.matches(".env.production.local"));
        assert!(!p.matches(".env.local"));
        assert!(!p.matches(".env.staging"));
    }

    #[test]
    fn test_full_glob_crosses_separators() {
        let p = compile("a*b");
        assert!(p.matches("ab"));
        assert!(p.matches("a/x/b"));
        assert!(!p.matches("a/x/c"));
    }

    #[test]
    fn test_source_roundtrip() {
        for pattern in ["node_modules", "npm-debug.log*", "*.log", ".env.*.local"] {
            assert_eq!(compile(pattern).source(), pattern);
        }
    }
}
