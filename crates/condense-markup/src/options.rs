//! Compressor options

use serde::{Deserialize, Serialize};

/// Switches understood by the built-in compressors
///
/// The defaults are the compressor defaults: comments and whitespace between
/// tags are both removed. Callers that want comments kept must say so.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompressorOptions {
    /// Drop `<!-- -->` comments
    pub remove_comments: bool,
    /// Drop whitespace-only text between tags
    pub remove_intertag_spaces: bool,
}

impl Default for CompressorOptions {
    fn default() -> Self {
        Self {
            remove_comments: true,
            remove_intertag_spaces: true,
        }
    }
}

impl CompressorOptions {
    /// Set `remove_comments`
    pub fn with_remove_comments(mut self, enable: bool) -> Self {
        self.remove_comments = enable;
        self
    }

    /// Set `remove_intertag_spaces`
    pub fn with_remove_intertag_spaces(mut self, enable: bool) -> Self {
        self.remove_intertag_spaces = enable;
        self
    }
}
