//! XML parser implementation

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Pos, Result, Span};
use crate::lexer::Cursor;
use crate::xml::model::{Content, Document, Element};

/// Deepest nesting the parser accepts, whatever the configured limit.
///
/// Elements are parsed, written and dropped recursively, so the tree depth is
/// bounded by the stack.
pub const MAX_NESTING: u16 = 512;

/// Configuration for the XML parser
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Maximum element nesting depth (0 means up to [`MAX_NESTING`])
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Create a new config with unlimited size and the largest supported
    /// depth ([`MAX_NESTING`])
    pub const fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
        }
    }

    /// Create a new config with specific limits
    pub const fn new(max_depth: u16, max_size: usize) -> Self {
        Self {
            max_depth,
            max_size,
        }
    }
}

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
    config: Config,
    depth: u16,
}

impl<'a> Parser<'a> {
    /// Create a new parser with default configuration
    pub fn new(input: &'a [u8]) -> Self {
        Self::with_config(input, Config::default())
    }

    /// Create a new parser with custom configuration
    pub const fn with_config(input: &'a [u8], config: Config) -> Self {
        Self {
            cursor: Cursor::new(input),
            config,
            depth: 0,
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        let max_size = self.config.max_size;
        if max_size > 0 && self.cursor.remaining().len() > max_size {
            return Err(Error::at(
                ErrorKind::MaxSizeExceeded { max: max_size },
                self.cursor.position(),
            ));
        }

        if self.cursor.starts_with(b"\xEF\xBB\xBF") {
            self.cursor.advance_by(3);
        }

        let mut declaration = None;
        let mut prolog = Vec::new();
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.is_eof() {
                return Err(Error::at(ErrorKind::MissingRoot, self.cursor.position()));
            }

            if self.at_declaration() {
                if declaration.is_some() {
                    return Err(self.error_here(ErrorKind::InvalidToken, "repeated xml declaration"));
                }
                declaration = Some(self.parse_declaration()?);
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else if self.cursor.starts_with(b"<!--") {
                prolog.push(self.parse_comment()?);
            } else if self.cursor.starts_with(b"<!") {
                self.skip_doctype()?;
            } else if self.cursor.current() == Some(b'<') {
                break;
            } else {
                return Err(self.error_here(ErrorKind::InvalidToken, "text before root element"));
            }
        }

        let root = self.parse_element()?;
        self.skip_misc()?;

        if !self.cursor.is_eof() {
            return Err(self.error_here(ErrorKind::InvalidToken, "content after root element"));
        }

        Ok(Document {
            declaration,
            prolog,
            root,
        })
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.enter()?;
        self.expect_byte(b'<')?;

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.consume(b'/') {
            self.expect_byte(b'>')?;
            self.depth = self.depth.saturating_sub(1);
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;

        let mut children = Vec::new();
        loop {
            if self.cursor.starts_with(b"</") {
                let close_pos = self.cursor.position();
                self.cursor.advance_by(2);
                let close_name = self.parse_name()?;
                if close_name != name {
                    return Err(Error::at(
                        ErrorKind::MismatchedTag {
                            expected: name,
                            found: close_name,
                        },
                        close_pos,
                    ));
                }
                self.cursor.skip_whitespace();
                self.expect_byte(b'>')?;
                break;
            }

            if self.cursor.starts_with(b"<!--") {
                children.push(Content::Comment(self.parse_comment()?));
                continue;
            }

            if self.cursor.starts_with(b"<![CDATA[") {
                let text = self.parse_cdata()?;
                push_text(&mut children, text);
                continue;
            }

            if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
                continue;
            }

            if self.cursor.current() == Some(b'<') {
                let child = self.parse_element()?;
                children.push(Content::Element(child));
                continue;
            }

            if self.cursor.is_eof() {
                return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated element"));
            }

            if let Some(text) = self.parse_text()? {
                push_text(&mut children, text);
            }
        }

        self.depth = self.depth.saturating_sub(1);
        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated tag")),
            }

            let name_pos = self.cursor.position();
            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(Error::at(ErrorKind::DuplicateAttribute { name }, name_pos));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => {
                return Err(self.error_here(ErrorKind::InvalidToken, "expected quoted attribute value"))
            }
        };
        self.cursor.advance();

        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw, start_pos)?;
                return decode_entities(&text, start_pos);
            }
            if b == b'<' {
                return Err(self.error_here(ErrorKind::InvalidToken, "'<' in attribute value"));
            }
            self.cursor.advance();
        }

        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw, start_pos)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            decode_entities(&text, start_pos).map(Some)
        }
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here(ErrorKind::UnexpectedEof, "expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::with_message(
                ErrorKind::InvalidToken,
                Span::at(start_pos),
                "expected name",
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start), start_pos)
    }

    fn at_declaration(&self) -> bool {
        self.cursor.starts_with(b"<?xml")
            && matches!(
                self.cursor.peek(5),
                Some(b' ' | b'\t' | b'\r' | b'\n' | b'?')
            )
    }

    fn parse_declaration(&mut self) -> Result<String> {
        // cursor currently at "<?xml"
        self.cursor.advance_by(5);
        self.cursor.skip_whitespace();
        let start_pos = self.cursor.position();
        let raw = self.take_until(b"?>")?;
        Ok(bytes_to_string(raw, start_pos)?.trim_end().to_string())
    }

    fn parse_comment(&mut self) -> Result<String> {
        // cursor currently at "<!--"
        self.cursor.advance_by(4);
        let start_pos = self.cursor.position();
        let raw = self.take_until(b"-->")?;
        bytes_to_string(raw, start_pos)
    }

    fn parse_cdata(&mut self) -> Result<String> {
        // cursor currently at "<![CDATA["
        self.cursor.advance_by(9);
        let start_pos = self.cursor.position();
        let raw = self.take_until(b"]]>")?;
        bytes_to_string(raw, start_pos)
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at "<?"
        self.cursor.advance_by(2);
        self.take_until(b"?>").map(|_| ())
    }

    /// Skip a `<!DOCTYPE ...>` declaration.
    ///
    /// Nothing from it is kept: entities declared in an internal subset are
    /// not available to [`decode_entities`] and the declaration is not
    /// written back.
    fn skip_doctype(&mut self) -> Result<()> {
        // cursor currently at "<!"; an internal subset may nest brackets
        self.cursor.advance_by(2);
        let mut brackets = 0usize;
        while let Some(b) = self.cursor.current() {
            self.cursor.advance();
            match b {
                b'[' => brackets += 1,
                b']' => brackets = brackets.saturating_sub(1),
                b'>' if brackets == 0 => return Ok(()),
                _ => {}
            }
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated declaration"))
    }

    /// Skip whitespace, comments and processing instructions after the root
    fn skip_misc(&mut self) -> Result<()> {
        loop {
            self.cursor.skip_whitespace();
            if self.cursor.starts_with(b"<!--") {
                self.parse_comment()?;
            } else if self.cursor.starts_with(b"<?") {
                self.skip_processing_instruction()?;
            } else {
                return Ok(());
            }
        }
    }

    /// Consume input up to and including `pattern`, returning the bytes before it
    fn take_until(&mut self, pattern: &[u8]) -> Result<&'a [u8]> {
        let start = self.cursor.pos();
        while !self.cursor.is_eof() {
            if self.cursor.starts_with(pattern) {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(pattern.len());
                return Ok(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here(ErrorKind::UnexpectedEof, "unterminated markup"))
    }

    fn enter(&mut self) -> Result<()> {
        let max = match self.config.max_depth {
            0 => MAX_NESTING,
            max => max.min(MAX_NESTING),
        };
        self.depth = self
            .depth
            .checked_add(1)
            .filter(|depth| *depth <= max)
            .ok_or_else(|| {
                Error::at(ErrorKind::MaxDepthExceeded { max }, self.cursor.position())
            })?;
        Ok(())
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else if self.cursor.is_eof() {
            Err(self.error_here(ErrorKind::UnexpectedEof, "unexpected end of input"))
        } else {
            Err(self.error_here(
                ErrorKind::InvalidToken,
                &format!("expected '{}'", char::from(expected)),
            ))
        }
    }

    fn error_here(&self, kind: ErrorKind, message: &str) -> Error {
        Error::with_message(kind, Span::at(self.cursor.position()), message)
    }
}

/// Append text, merging with a preceding text node (e.g. text next to CDATA)
fn push_text(children: &mut Vec<Content>, text: String) {
    if let Some(Content::Text(last)) = children.last_mut() {
        last.push_str(&text);
    } else {
        children.push(Content::Text(text));
    }
}

fn bytes_to_string(bytes: &[u8], pos: Pos) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(str::to_string)
        .map_err(|_| Error::at(ErrorKind::InvalidUtf8, pos))
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':') || b >= 0x80
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

/// Replace the predefined entities and numeric character references.
///
/// Any other named entity, including one declared in a DOCTYPE, is an
/// [`ErrorKind::InvalidEntity`].
fn decode_entities(input: &str, pos: Pos) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        let mut terminated = false;
        for next in chars.by_ref() {
            if next == ';' {
                terminated = true;
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            _ if !terminated => None,
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => return Err(Error::at(ErrorKind::InvalidEntity { entity }, pos)),
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}
