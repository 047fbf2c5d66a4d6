//! Content type matching

use condense_core::{Error, Result};
use regex::{RegexSet, RegexSetBuilder};

/// Compiled set of content type patterns
///
/// Each pattern must match the whole media type; matching ignores case.
#[derive(Debug, Clone)]
pub struct ContentTypeMatcher {
    set: RegexSet,
}

impl ContentTypeMatcher {
    /// Compile `patterns`, failing on the first invalid one
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let anchored = patterns
            .iter()
            .map(|pattern| format!("^(?:{})$", pattern.as_ref()));

        let set = RegexSetBuilder::new(anchored)
            .case_insensitive(true)
            .build()
            .map_err(|e| Error::Config(format!("Invalid content type pattern: {e}")))?;

        Ok(Self { set })
    }

    /// Check a media type such as `text/xml`
    pub fn matches(&self, media_type: &str) -> bool {
        self.set.is_match(media_type.trim())
    }

    /// Number of patterns
    pub fn len(&self) -> usize {
        self.set.len()
    }

    /// Whether no pattern was configured
    pub fn is_empty(&self) -> bool {
        self.set.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FilterConfig;

    #[test]
    fn test_default_patterns() {
        let matcher = ContentTypeMatcher::new(&FilterConfig::default().content_types).unwrap();

        assert!(matcher.matches("text/xml"));
        assert!(matcher.matches("application/xml"));
        assert!(matcher.matches("application/atom+xml"));
        assert!(matcher.matches("Application/RSS+XML"));

        assert!(!matcher.matches("application/json"));
        assert!(!matcher.matches("text/html"));
        assert!(!matcher.matches("text/xml-external-parsed-entity"));
    }

    #[test]
    fn test_patterns_are_anchored() {
        let matcher = ContentTypeMatcher::new(&["xml"]).unwrap();
        assert!(!matcher.matches("text/xml"));
        assert!(matcher.matches("XML"));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let err = ContentTypeMatcher::new(&["text/(xml"]).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_empty_matcher_matches_nothing() {
        let matcher = ContentTypeMatcher::new::<&str>(&[]).unwrap();
        assert!(matcher.is_empty());
        assert!(!matcher.matches("text/xml"));
    }
}
