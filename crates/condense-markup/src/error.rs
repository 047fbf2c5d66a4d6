//! Markup errors

/// Raised when markup cannot be compressed without risking corruption
///
/// Offsets are byte positions of the construct's opening `<`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MarkupError {
    /// `<!--` without `-->`
    #[error("unterminated comment at byte {offset}")]
    UnterminatedComment {
        /// Byte offset
        offset: usize,
    },

    /// `<![CDATA[` without `]]>`
    #[error("unterminated CDATA section at byte {offset}")]
    UnterminatedCData {
        /// Byte offset
        offset: usize,
    },

    /// `<?` without `?>`
    #[error("unterminated processing instruction at byte {offset}")]
    UnterminatedInstruction {
        /// Byte offset
        offset: usize,
    },

    /// `<!` declaration without `>`
    #[error("unterminated declaration at byte {offset}")]
    UnterminatedDeclaration {
        /// Byte offset
        offset: usize,
    },

    /// Tag without a closing `>`, or with an unbalanced quote
    #[error("unterminated tag at byte {offset}")]
    UnterminatedTag {
        /// Byte offset
        offset: usize,
    },

    /// Raw text element (`<script>`, `<pre>`, ...) that is never closed
    #[error("element <{name}> opened at byte {offset} is never closed")]
    UnclosedElement {
        /// Element name, lowercased
        name: String,
        /// Byte offset
        offset: usize,
    },
}

impl MarkupError {
    /// Byte offset of the offending construct
    pub fn offset(&self) -> usize {
        match self {
            Self::UnterminatedComment { offset }
            | Self::UnterminatedCData { offset }
            | Self::UnterminatedInstruction { offset }
            | Self::UnterminatedDeclaration { offset }
            | Self::UnterminatedTag { offset }
            | Self::UnclosedElement { offset, .. } => *offset,
        }
    }
}
