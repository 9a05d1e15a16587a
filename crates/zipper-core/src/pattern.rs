//! Path glob matching
//!
//! Patterns are matched segment by segment. A path segment is the name of a
//! directory or file, bounded by `/` (patterns may also use `\`). Within a
//! segment `*` matches zero or more characters and `?` matches exactly one.
//! A segment consisting of `**` matches zero or more whole segments, so
//! `**/*.class` matches `A.class` as well as `a/b/A.class`, and
//! `**/test/**/XYZ*` matches `abc/test/def/ghi/XYZ123`.
//!
//! A pattern that starts with a separator only matches paths that start with
//! one, and vice versa. A pattern that ends with a separator behaves as if
//! `**` were appended. Matching is case-insensitive.

use crate::filter::FilterPatterns;
use crate::Result;
use glob::MatchOptions;

/// Pattern used when no include pattern is given
pub const MATCH_ALL: &str = "**";

const RECURSIVE_WILDCARD: &str = "**";

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

#[derive(Debug, Clone)]
enum Segment {
    /// `**`: zero or more whole segments
    AnyDepth,
    /// Single segment wildcard, compiled by the `glob` crate
    Name(glob::Pattern),
}

/// A compiled path pattern
#[derive(Debug, Clone)]
pub struct PathPattern {
    source: String,
    anchored: bool,
    segments: Vec<Segment>,
}

impl PathPattern {
    /// Compile a pattern. Square brackets are literal characters and
    /// a run of `*` inside a segment acts as a single `*`, so the only
    /// failures left are ones reported by the segment compiler itself.
    pub fn new(pattern: &str) -> Result<Self> {
        let mut normalized = pattern.replace('\\', "/");
        if normalized.ends_with('/') {
            normalized.push_str(RECURSIVE_WILDCARD);
        }

        let anchored = normalized.starts_with('/');
        let mut segments = Vec::new();

        for part in normalized.split('/').filter(|s| !s.is_empty()) {
            if part == RECURSIVE_WILDCARD {
                // Consecutive `**` segments are equivalent to one
                if !matches!(segments.last(), Some(Segment::AnyDepth)) {
                    segments.push(Segment::AnyDepth);
                }
            } else {
                segments.push(Segment::Name(glob::Pattern::new(&segment_source(part))?));
            }
        }

        Ok(Self {
            source: pattern.to_string(),
            anchored,
            segments,
        })
    }

    /// The pattern as it was given
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Match a `/`-separated path against this pattern
    pub fn matches(&self, path: &str) -> bool {
        if self.anchored != path.starts_with('/') {
            return false;
        }

        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match_segments(&self.segments, &parts)
    }
}

/// Translate one pattern segment into `glob` syntax
fn segment_source(segment: &str) -> String {
    let mut source = String::with_capacity(segment.len());
    let mut previous_star = false;

    for c in segment.chars() {
        match c {
            '*' if previous_star => continue,
            '[' => source.push_str("[[]"),
            ']' => source.push_str("[]]"),
            _ => source.push(c),
        }
        previous_star = c == '*';
    }

    source
}

fn match_segments(pattern: &[Segment], path: &[&str]) -> bool {
    match pattern.split_first() {
        None => path.is_empty(),
        Some((Segment::AnyDepth, rest)) => {
            (0..=path.len()).any(|skip| match_segments(rest, &path[skip..]))
        }
        Some((Segment::Name(glob), rest)) => match path.split_first() {
            Some((name, tail)) => {
                glob.matches_with(name, MATCH_OPTIONS) && match_segments(rest, tail)
            }
            None => false,
        },
    }
}

/// Compiled include and exclude patterns
#[derive(Debug, Clone)]
pub struct PatternSet {
    includes: Vec<PathPattern>,
    excludes: Vec<PathPattern>,
}

impl PatternSet {
    /// Compile a filter. An empty include list becomes [`MATCH_ALL`].
    pub fn compile(filter: &FilterPatterns) -> Result<Self> {
        let includes = if filter.includes().is_empty() {
            vec![PathPattern::new(MATCH_ALL)?]
        } else {
            filter
                .includes()
                .iter()
                .map(|p| PathPattern::new(p))
                .collect::<Result<Vec<_>>>()?
        };

        let excludes = filter
            .excludes()
            .iter()
            .map(|p| PathPattern::new(p))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { includes, excludes })
    }

    pub fn is_included(&self, path: &str) -> bool {
        self.includes.iter().any(|p| p.matches(path))
    }

    pub fn is_excluded(&self, path: &str) -> bool {
        self.excludes.iter().any(|p| p.matches(path))
    }

    /// Selected iff at least one include and no exclude matches
    pub fn is_selected(&self, path: &str) -> bool {
        self.is_included(path) && !self.is_excluded(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn matches(pattern: &str, path: &str) -> bool {
        PathPattern::new(pattern).unwrap().matches(path)
    }

    #[test]
    fn test_recursive_wildcard() {
        assert!(matches("**", "a"));
        assert!(matches("**", "a/b/c.txt"));
        assert!(matches("**/*.class", "A.class"));
        assert!(matches("**/*.class", "x/y/A.class"));
        assert!(!matches("**/*.class", "x/y/A.java"));
        assert!(matches("**/test/**/XYZ*", "abc/test/def/ghi/XYZ123"));
        assert!(matches("**/test/**/XYZ*", "test/XYZ"));
        assert!(!matches("**/test/**/XYZ*", "abc/testing/XYZ1"));
        assert!(matches("src/**/*.rs", "src/main.rs"));
    }

    #[test]
    fn test_single_segment_wildcards() {
        assert!(matches("test/a??.java", "test/abc.java"));
        assert!(!matches("test/a??.java", "test/ab.java"));
        assert!(!matches("test/a??.java", "other/test/abc.java"));
        // `*` never crosses a separator
        assert!(!matches("*.txt", "dir/a.txt"));
        assert!(matches("*.txt", "a.txt"));
        assert!(matches("*", ".hidden"));
    }

    #[test]
    fn test_case_insensitive() {
        assert!(matches("**/*.JAVA", "src/Main.java"));
        assert!(matches("SRC/**", "src/lib.rs"));
    }

    #[test]
    fn test_anchoring() {
        assert!(!matches("/src/**", "src/a.rs"));
        assert!(matches("/src/**", "/src/a.rs"));
        assert!(!matches("src/**", "/src/a.rs"));
    }

    #[test]
    fn test_trailing_separator_and_backslash() {
        assert!(matches("target/", "target/debug/app"));
        assert!(matches("modules\\*\\**", "modules/core/src/a.java"));
        assert!(!matches("modules\\*\\**", "src/modules.java"));
    }

    #[test]
    fn test_literal_brackets_and_star_runs() {
        assert!(matches("[draft]*.md", "[draft]notes.md"));
        assert!(!matches("[draft]*.md", "d.md"));
        assert!(matches("a***b", "aXYZb"));
    }

    #[test]
    fn test_pattern_set_defaults_to_match_all() {
        let set = PatternSet::compile(&FilterPatterns::default()).unwrap();
        assert!(set.is_selected("any/file.bin"));
        assert!(!set.is_excluded("any/file.bin"));
    }

    #[test]
    fn test_pattern_set_include_and_exclude() {
        let filter = FilterPatterns::parse(Some("**/*.java,!**/test/**"));
        let set = PatternSet::compile(&filter).unwrap();
        assert!(set.is_selected("src/Main.java"));
        assert!(!set.is_selected("src/test/MainTest.java"));
        assert!(!set.is_selected("README.md"));
        assert_eq!(set.includes[0].as_str(), "**/*.java");
    }
}
