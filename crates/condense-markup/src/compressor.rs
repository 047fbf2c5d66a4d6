//! Built-in markup compressors

use crate::lexer::{compact_tag, is_blank, is_space, tokenize, trim, Dialect, Token};
use crate::{CompressorOptions, MarkupError};
use std::fmt;

/// Reduces the size of markup without changing its structure
///
/// Implementations must be deterministic and must never return output longer
/// than their input. An error means the input could not be compressed
/// safely; callers are expected to fall back to the original markup.
pub trait Compressor: Send + Sync + fmt::Debug {
    /// Compress `markup` according to `options`
    fn compress(&self, markup: &str, options: &CompressorOptions) -> Result<String, MarkupError>;
}

/// XML compressor
///
/// Removes whitespace between tags and inside tags, and optionally comments.
/// Character data, CDATA sections, processing instructions and declarations
/// are kept byte for byte.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCompressor;

impl XmlCompressor {
    /// Create a new XML compressor
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for XmlCompressor {
    fn compress(&self, markup: &str, options: &CompressorOptions) -> Result<String, MarkupError> {
        let tokens = tokenize(markup, Dialect::Xml)?;
        Ok(assemble(&tokens, Dialect::Xml, options, markup.len()))
    }
}

/// HTML compressor
///
/// Same rules as [`XmlCompressor`], plus whitespace runs in text collapse to a
/// single space. Content of `script`, `style`, `pre` and `textarea` is kept
/// verbatim, and conditional comments survive comment removal.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlCompressor;

impl HtmlCompressor {
    /// Create a new HTML compressor
    pub fn new() -> Self {
        Self
    }
}

impl Compressor for HtmlCompressor {
    fn compress(&self, markup: &str, options: &CompressorOptions) -> Result<String, MarkupError> {
        let tokens = tokenize(markup, Dialect::Html)?;
        Ok(assemble(&tokens, Dialect::Html, options, markup.len()))
    }
}

fn assemble(
    tokens: &[Token<'_>],
    dialect: Dialect,
    options: &CompressorOptions,
    capacity: usize,
) -> String {
    let mut out = String::with_capacity(capacity);
    // Adjacent text (split by a removed comment) is handled as one run
    let mut text = String::new();

    for (i, token) in tokens.iter().enumerate() {
        let verbatim = match *token {
            Token::Text(t) => {
                text.push_str(t);
                continue;
            }
            Token::Comment(c)
                if options.remove_comments
                    && !keeps_comment(c, dialect)
                    && !splices_construct(&text, tokens.get(i + 1)) =>
            {
                continue
            }
            Token::Tag(tag) => {
                flush_text(&mut text, dialect, options, &mut out);
                compact_tag(tag, dialect, &mut out);
                continue;
            }
            Token::Comment(s)
            | Token::CData(s)
            | Token::Declaration(s)
            | Token::Instruction(s)
            | Token::Raw(s) => s,
        };
        flush_text(&mut text, dialect, options, &mut out);
        out.push_str(verbatim);
    }
    flush_text(&mut text, dialect, options, &mut out);

    let trimmed = trim(&out);
    if trimmed.len() == out.len() {
        out
    } else {
        trimmed.to_string()
    }
}

fn flush_text(text: &mut String, dialect: Dialect, options: &CompressorOptions, out: &mut String) {
    if text.is_empty() {
        return;
    }
    if !(options.remove_intertag_spaces && is_blank(text)) {
        match dialect {
            Dialect::Xml => out.push_str(text),
            Dialect::Html => collapse_spaces(text, out),
        }
    }
    text.clear();
}

fn collapse_spaces(text: &str, out: &mut String) {
    let mut in_space = false;
    for c in text.chars() {
        if is_space(c) {
            if !in_space {
                out.push(' ');
                in_space = true;
            }
        } else {
            out.push(c);
            in_space = false;
        }
    }
}

/// Conditional comments carry markup for old browsers
fn keeps_comment(comment: &str, dialect: Dialect) -> bool {
    dialect == Dialect::Html
        && (comment.starts_with("<!--[if") || comment.ends_with("<![endif]-->"))
}

/// Whether joining `before` with the text token that follows would form a
/// tag or a character reference that neither half contains
fn splices_construct(before: &str, next: Option<&Token<'_>>) -> bool {
    let Some(Token::Text(after)) = next else {
        return false;
    };
    let Some(first) = after.chars().next() else {
        return false;
    };

    if before.ends_with("</") {
        return first.is_ascii_alphabetic() || matches!(first, '_' | ':');
    }
    if before.ends_with('<') {
        return first.is_ascii_alphabetic() || matches!(first, '_' | ':' | '/' | '!' | '?');
    }
    match before.rfind('&') {
        Some(at) => {
            before[at + 1..]
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'#')
                && (first.is_ascii_alphanumeric() || matches!(first, '#' | ';'))
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn keep_comments() -> CompressorOptions {
        CompressorOptions::default().with_remove_comments(false)
    }

    #[test]
    fn test_xml_keeps_comment_and_drops_intertag_spaces() {
        let out = XmlCompressor
            .compress("<a>   <!-- c --> <b/> </a>", &keep_comments())
            .unwrap();
        assert_eq!(out, "<a><!-- c --><b/></a>");
    }

    #[test]
    fn test_xml_default_options_remove_comments() {
        let out = XmlCompressor
            .compress("<a>   <!-- c --> <b/> </a>", &CompressorOptions::default())
            .unwrap();
        assert_eq!(out, "<a><b/></a>");
    }

    #[test]
    fn test_xml_preserves_character_data() {
        let src = "<?xml version=\"1.0\"?>\n<feed>\n  <title>  Two  spaces </title>\n  <data><![CDATA[\n  keep   me\n]]></data>\n</feed>\n";
        let out = XmlCompressor.compress(src, &keep_comments()).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\"?><feed><title>  Two  spaces </title><data><![CDATA[\n  keep   me\n]]></data></feed>"
        );
    }

    #[test]
    fn test_xml_without_intertag_removal() {
        let options = keep_comments().with_remove_intertag_spaces(false);
        let out = XmlCompressor
            .compress("  <a>\n  <b   x='1' />\n</a>  ", &options)
            .unwrap();
        assert_eq!(out, "<a>\n  <b x='1'/>\n</a>");
    }

    #[test]
    fn test_xml_malformed_input() {
        let err = XmlCompressor
            .compress("<a><!-- never closed </a>", &keep_comments())
            .unwrap_err();
        assert_eq!(err, MarkupError::UnterminatedComment { offset: 3 });
    }

    #[test]
    fn test_html_collapses_text() {
        let out = HtmlCompressor
            .compress(
                "<p>\n  Hello,\n\n   world  </p>\n<pre>  a\n   b </pre>",
                &keep_comments(),
            )
            .unwrap();
        assert_eq!(out, "<p> Hello, world </p><pre>  a\n   b </pre>");
    }

    #[test]
    fn test_html_keeps_conditional_comments() {
        let src = "<head><!--[if IE]><link href=ie.css><![endif]--> <!-- plain --></head>";
        let out = HtmlCompressor
            .compress(src, &CompressorOptions::default())
            .unwrap();
        assert_eq!(out, "<head><!--[if IE]><link href=ie.css><![endif]--></head>");
    }

    #[test]
    fn test_html_removed_comment_joins_text() {
        let out = HtmlCompressor
            .compress("<p>a <!-- x --> b</p>", &CompressorOptions::default())
            .unwrap();
        assert_eq!(out, "<p>a b</p>");
    }

    #[test]
    fn test_removed_comment_never_forms_a_tag() {
        let options = CompressorOptions::default();
        for src in ["<p>1 <<!-- x -->b>2</p>", "<p>1 </<!-- x -->b>2</p>"] {
            assert_eq!(XmlCompressor.compress(src, &options).unwrap(), src);
            assert_eq!(HtmlCompressor.compress(src, &options).unwrap(), src);
        }
    }

    #[test]
    fn test_removed_comment_never_forms_an_entity() {
        let options = CompressorOptions::default();
        let src = "<p>&am<!-- -->p; &#<!-- -->60;</p>";
        let out = XmlCompressor.compress(src, &options).unwrap();
        assert!(!out.contains("&amp;"));
        assert!(!out.contains("&#60;"));
        assert_eq!(out, src);
    }

    #[test]
    fn test_comment_between_plain_text_is_removed() {
        let out = XmlCompressor
            .compress("<p>1 < 2<!-- x --> & 3</p>", &CompressorOptions::default())
            .unwrap();
        assert_eq!(out, "<p>1 < 2 & 3</p>");
    }

    #[test]
    fn test_html_script_is_verbatim() {
        let src = "<script>\n  if (a <b) {  x(); }\n</script>";
        let out = HtmlCompressor.compress(src, &keep_comments()).unwrap();
        assert_eq!(out, src);
    }

    #[test]
    fn test_non_ascii_whitespace_is_content() {
        let src = "<p>\u{a0}x\u{a0}</p>";
        assert_eq!(HtmlCompressor.compress(src, &keep_comments()).unwrap(), src);
        assert_eq!(XmlCompressor.compress(src, &keep_comments()).unwrap(), src);
    }

    fn markup() -> impl Strategy<Value = String> {
        let piece = prop_oneof![
            Just("<a>"),
            Just("</a>"),
            Just("<b x = 'y  z' />"),
            Just("<img src=i.png >"),
            Just("  "),
            Just("\n\t"),
            Just("text"),
            Just("é"),
            Just("1 < 2"),
            Just("<!-- c -->"),
            Just("<![CDATA[ x  ]]>"),
            Just("<pre> p  q </pre>"),
            Just("<"),
            Just("b>"),
            Just("&am"),
            Just("p;"),
        ];
        prop::collection::vec(piece, 0..24).prop_map(|pieces| pieces.concat())
    }

    fn options() -> impl Strategy<Value = CompressorOptions> {
        (any::<bool>(), any::<bool>()).prop_map(|(comments, spaces)| CompressorOptions {
            remove_comments: comments,
            remove_intertag_spaces: spaces,
        })
    }

    proptest! {
        #[test]
        fn prop_output_never_grows(src in markup(), options in options()) {
            let xml = XmlCompressor.compress(&src, &options).unwrap();
            let html = HtmlCompressor.compress(&src, &options).unwrap();
            prop_assert!(xml.len() <= src.len());
            prop_assert!(html.len() <= src.len());
        }

        #[test]
        fn prop_compression_is_idempotent(src in markup(), options in options()) {
            let once = XmlCompressor.compress(&src, &options).unwrap();
            prop_assert_eq!(XmlCompressor.compress(&once, &options).unwrap(), once);

            let once = HtmlCompressor.compress(&src, &options).unwrap();
            prop_assert_eq!(HtmlCompressor.compress(&once, &options).unwrap(), once);
        }
    }
}
