//! Markup tokenizer shared by the XML and HTML compressors
//!
//! The lexer only finds construct boundaries. It does not check nesting or
//! attribute syntax; it fails only when a construct is left open, since
//! rewriting whitespace inside an unterminated construct could corrupt it.

use crate::MarkupError;

/// Elements whose content HTML keeps verbatim
pub(crate) const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style", "pre", "textarea"];

/// A slice of the source, tagged with the construct it belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Token<'a> {
    /// Character data between constructs
    Text(&'a str),
    /// `<name ...>`, `</name>` or `<name .../>`
    Tag(&'a str),
    /// `<!-- ... -->`
    Comment(&'a str),
    /// `<![CDATA[ ... ]]>`
    CData(&'a str),
    /// `<!DOCTYPE ...>` and other `<!...>` declarations
    Declaration(&'a str),
    /// `<? ... ?>`
    Instruction(&'a str),
    /// Content of an HTML raw text element
    Raw(&'a str),
}

/// Markup flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dialect {
    Xml,
    Html,
}

pub(crate) struct Lexer<'a> {
    src: &'a str,
    pos: usize,
    dialect: Dialect,
    /// Raw text element whose content comes next, with its tag offset
    raw: Option<(&'static str, usize)>,
    failed: bool,
}

impl<'a> Lexer<'a> {
    pub(crate) fn new(src: &'a str, dialect: Dialect) -> Self {
        Self {
            src,
            pos: 0,
            dialect,
            raw: None,
            failed: false,
        }
    }

    fn next_token(&mut self) -> Result<Option<Token<'a>>, MarkupError> {
        if let Some((name, offset)) = self.raw.take() {
            let end = self.find_raw_end(name).ok_or_else(|| MarkupError::UnclosedElement {
                name: name.to_string(),
                offset,
            })?;
            if end > self.pos {
                return Ok(Some(Token::Raw(self.take(end))));
            }
        }

        let start = self.pos;
        if start >= self.src.len() {
            return Ok(None);
        }
        let src = self.src;
        let rest = &src[start..];

        let token = if rest.starts_with("<!--") {
            let end = self
                .find_end(start + 4, "-->")
                .ok_or(MarkupError::UnterminatedComment { offset: start })?;
            Token::Comment(self.take(end))
        } else if rest.starts_with("<![CDATA[") {
            let end = self
                .find_end(start + 9, "]]>")
                .ok_or(MarkupError::UnterminatedCData { offset: start })?;
            Token::CData(self.take(end))
        } else if rest.starts_with("<!") {
            let end = self
                .find_end(start + 2, ">")
                .ok_or(MarkupError::UnterminatedDeclaration { offset: start })?;
            Token::Declaration(self.take(end))
        } else if rest.starts_with("<?") {
            let end = self
                .find_end(start + 2, "?>")
                .ok_or(MarkupError::UnterminatedInstruction { offset: start })?;
            Token::Instruction(self.take(end))
        } else if is_tag_start(rest) {
            let end = self
                .tag_end(start)
                .ok_or(MarkupError::UnterminatedTag { offset: start })?;
            let tag = self.take(end);
            if self.dialect == Dialect::Html {
                self.raw = raw_text_element(tag).map(|name| (name, start));
            }
            Token::Tag(tag)
        } else {
            let end = self.text_end(start);
            Token::Text(self.take(end))
        };

        Ok(Some(token))
    }

    /// Consume up to `end` and return the consumed slice
    fn take(&mut self, end: usize) -> &'a str {
        let src = self.src;
        let slice = &src[self.pos..end];
        self.pos = end;
        slice
    }

    /// Index just past the first `needle` at or after `from`
    fn find_end(&self, from: usize, needle: &str) -> Option<usize> {
        self.src
            .get(from..)?
            .find(needle)
            .map(|i| from + i + needle.len())
    }

    /// Index just past the `>` closing the tag at `start`
    fn tag_end(&self, start: usize) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut quote: Option<u8> = None;
        let mut prev = b'<';

        for (i, &b) in bytes.iter().enumerate().skip(start + 1) {
            match quote {
                Some(q) => {
                    if b == q {
                        quote = None;
                        prev = b;
                    }
                }
                None if b == b'>' => return Some(i + 1),
                None if (b == b'"' || b == b'\'') && prev == b'=' => quote = Some(b),
                None if b.is_ascii_whitespace() => {}
                None => prev = b,
            }
        }
        None
    }

    /// Text runs until the next `<` that opens a construct
    fn text_end(&self, start: usize) -> usize {
        let first = self.src[start..].chars().next().map_or(1, char::len_utf8);
        let mut from = start + first;
        while let Some(i) = self.src.get(from..).and_then(|s| s.find('<')) {
            let at = from + i;
            if is_markup_start(&self.src[at..]) {
                return at;
            }
            from = at + 1;
        }
        self.src.len()
    }

    /// Offset of the `</name` that closes the current raw text element
    fn find_raw_end(&self, name: &str) -> Option<usize> {
        let bytes = self.src.as_bytes();
        let mut from = self.pos;

        while let Some(i) = self.src[from..].find("</") {
            let at = from + i;
            let name_end = at + 2 + name.len();
            let matches_name = bytes
                .get(at + 2..name_end)
                .is_some_and(|candidate| candidate.eq_ignore_ascii_case(name.as_bytes()));
            let name_ends = bytes
                .get(name_end)
                .map_or(true, |&b| b.is_ascii_whitespace() || b == b'>' || b == b'/');
            if matches_name && name_ends {
                return Some(at);
            }
            from = at + 2;
        }
        None
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token<'a>, MarkupError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        match self.next_token() {
            Ok(token) => token.map(Ok),
            Err(e) => {
                self.failed = true;
                Some(Err(e))
            }
        }
    }
}

/// Split `src` into tokens
pub(crate) fn tokenize(src: &str, dialect: Dialect) -> Result<Vec<Token<'_>>, MarkupError> {
    Lexer::new(src, dialect).collect()
}

fn is_name_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_' || b == b':'
}

/// `<name` or `</name`
fn is_tag_start(s: &str) -> bool {
    let bytes = s.as_bytes();
    let name_at = if bytes.get(1) == Some(&b'/') { 2 } else { 1 };
    bytes.first() == Some(&b'<') && bytes.get(name_at).copied().is_some_and(is_name_start)
}

fn is_markup_start(s: &str) -> bool {
    s.starts_with("<!") || s.starts_with("<?") || is_tag_start(s)
}

/// Name of the raw text element a start tag opens, if any
fn raw_text_element(tag: &str) -> Option<&'static str> {
    if tag.starts_with("</") || tag.ends_with("/>") {
        return None;
    }
    let name_len = tag[1..]
        .bytes()
        .take_while(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b':'))
        .count();
    let name = &tag[1..1 + name_len];
    RAW_TEXT_ELEMENTS
        .iter()
        .copied()
        .find(|element| element.eq_ignore_ascii_case(name))
}

/// Whitespace as XML and HTML define it; U+00A0 is not included
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

pub(crate) fn is_blank(s: &str) -> bool {
    s.chars().all(is_space)
}

pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(is_space)
}

/// Write `tag` with whitespace outside quoted values collapsed
///
/// Whitespace before `>` is dropped unless it follows a `/`. Whitespace
/// before `/>` is dropped in XML, and in HTML only after a quoted value,
/// where it cannot be read as part of an unquoted attribute.
pub(crate) fn compact_tag(tag: &str, dialect: Dialect, out: &mut String) {
    let mut quote: Option<char> = None;
    let mut prev: Option<char> = None;
    let mut pending_space = false;
    let mut chars = tag.chars().peekable();

    while let Some(c) = chars.next() {
        if let Some(q) = quote {
            out.push(c);
            if c == q {
                quote = None;
                prev = Some(c);
            }
            continue;
        }
        if is_space(c) {
            pending_space = true;
            continue;
        }
        if std::mem::take(&mut pending_space) {
            let drop_space = match c {
                '>' => prev != Some('/'),
                '/' if chars.peek() == Some(&'>') => match dialect {
                    Dialect::Xml => true,
                    Dialect::Html => matches!(prev, Some('"' | '\'')),
                },
                _ => false,
            };
            if !drop_space {
                out.push(' ');
            }
        }
        if (c == '"' || c == '\'') && prev == Some('=') {
            quote = Some(c);
        }
        out.push(c);
        prev = Some(c);
    }
}
