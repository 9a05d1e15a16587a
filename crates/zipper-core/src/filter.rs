//! Filter string parsing
//!
//! A filter string is a comma and/or newline separated list of glob
//! patterns. Patterns starting with `!` exclude files, all others include
//! them:
//!
//! ```
//! use zipper_core::filter::FilterPatterns;
//!
//! let filter = FilterPatterns::parse(Some("**/*.java, !**/test/**\n*.xml"));
//! assert_eq!(filter.includes(), ["**/*.java", "*.xml"]);
//! assert_eq!(filter.excludes(), ["**/test/**"]);
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Marker that turns a pattern into an exclude pattern
pub const EXCLUDE_MARKER: char = '!';

const DELIMITERS: [char; 2] = [',', '\n'];

/// Include and exclude glob lists, in input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterPatterns {
    includes: Vec<String>,
    excludes: Vec<String>,
}

impl FilterPatterns {
    /// Build from already separated include and exclude lists
    pub fn new<I, E>(includes: &[I], excludes: &[E]) -> Self
    where
        I: AsRef<str>,
        E: AsRef<str>,
    {
        Self {
            includes: includes.iter().map(|p| p.as_ref().to_string()).collect(),
            excludes: excludes.iter().map(|p| p.as_ref().to_string()).collect(),
        }
    }

    /// Parse a delimited filter string. `None` or an empty string yields
    /// empty lists, which the selector treats as "match everything".
    pub fn parse(filter: Option<&str>) -> Self {
        let mut patterns = Self::default();

        let Some(filter) = filter else {
            return patterns;
        };

        for token in filter.split(DELIMITERS.as_slice()) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }

            // The remainder after the marker is kept verbatim
            if let Some(exclude) = token.strip_prefix(EXCLUDE_MARKER) {
                debug!("Exclude pattern detected: >{}<", exclude);
                patterns.excludes.push(exclude.to_string());
            } else {
                debug!("Include pattern detected: >{}<", token);
                patterns.includes.push(token.to_string());
            }
        }

        patterns
    }

    pub fn includes(&self) -> &[String] {
        &self.includes
    }

    pub fn excludes(&self) -> &[String] {
        &self.excludes
    }

    /// True when neither includes nor excludes were given
    pub fn is_empty(&self) -> bool {
        self.includes.is_empty() && self.excludes.is_empty()
    }
}
