//! XML tokenizer
//!
//! Pull tokenizer over a byte slice. Produces element tags plus the markup
//! the tree builder skips over (text, comments, CDATA, processing
//! instructions, DOCTYPE). Malformed markup is reported once with its byte
//! position; the tokenizer then stops.

use super::scanner::{is_whitespace, Scanner};
use crate::error::TokenizerError;

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

/// Current tokenizer state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseState {
    Init,
    Running,
    Done,
}

/// Type of XML token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `<name ...>`
    StartTag,
    /// `</name>`
    EndTag,
    /// `<name .../>`
    EmptyTag,
    Text,
    CData,
    Comment,
    /// `<?target ...?>`, including the XML declaration
    ProcessingInstruction,
    DocType,
    Eof,
}

/// A token with its raw span in the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    /// Raw span in input (start, end), end exclusive
    pub span: (usize, usize),
    /// Element name for tags, target for processing instructions
    pub name: Option<&'a str>,
    /// Span of the attribute region inside a start or empty tag
    pub attr_span: Option<(usize, usize)>,
}

impl<'a> Token<'a> {
    fn new(kind: TokenKind, span: (usize, usize)) -> Self {
        Token {
            kind,
            span,
            name: None,
            attr_span: None,
        }
    }

    fn with_name(mut self, name: &'a str) -> Self {
        self.name = Some(name);
        self
    }
}

pub struct Tokenizer<'a> {
    input: &'a [u8],
    scanner: Scanner<'a>,
    state: ParseState,
}

impl<'a> Tokenizer<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        Tokenizer {
            input,
            scanner: Scanner::new(input),
            state: ParseState::Init,
        }
    }

    #[cfg(test)]
    fn state(&self) -> ParseState {
        self.state
    }

    /// The raw input this tokenizer reads from
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Next token; `Eof` is produced once, then `None`
    pub fn next_token(&mut self) -> Option<Result<Token<'a>, TokenizerError>> {
        match self.state {
            ParseState::Done => return None,
            ParseState::Init => {
                if self.scanner.starts_with(UTF8_BOM) {
                    self.scanner.advance(UTF8_BOM.len());
                }
                self.state = ParseState::Running;
            }
            ParseState::Running => {}
        }

        if self.scanner.is_eof() {
            self.state = ParseState::Done;
            let end = self.scanner.position();
            return Some(Ok(Token::new(TokenKind::Eof, (end, end))));
        }

        let result = if self.scanner.peek() == Some(b'<') {
            self.parse_markup()
        } else {
            Ok(self.parse_text())
        };

        if result.is_err() {
            self.state = ParseState::Done;
        }
        Some(result)
    }

    fn error(&self, message: &str, position: usize) -> TokenizerError {
        TokenizerError::new(message, position)
    }

    fn parse_markup(&mut self) -> Result<Token<'a>, TokenizerError> {
        let start = self.scanner.position();

        if self.scanner.starts_with(b"<!--") {
            self.parse_delimited(start, 4, b"-->", TokenKind::Comment, "unterminated comment")
        } else if self.scanner.starts_with(b"<![CDATA[") {
            self.parse_delimited(start, 9, b"]]>", TokenKind::CData, "unterminated CDATA section")
        } else if self.scanner.starts_with(b"<!") {
            self.parse_doctype(start)
        } else if self.scanner.starts_with(b"<?") {
            self.parse_pi(start)
        } else if self.scanner.starts_with(b"</") {
            self.parse_end_tag(start)
        } else {
            self.parse_start_tag(start)
        }
    }

    /// Comment or CDATA: skip `open_len` bytes, then run to `close`
    fn parse_delimited(
        &mut self,
        start: usize,
        open_len: usize,
        close: &[u8],
        kind: TokenKind,
        message: &str,
    ) -> Result<Token<'a>, TokenizerError> {
        self.scanner.advance(open_len);
        let end = self
            .scanner
            .find_sequence(close)
            .ok_or_else(|| self.error(message, start))?;
        self.scanner.set_position(end + close.len());
        Ok(Token::new(kind, (start, end + close.len())))
    }

    fn parse_pi(&mut self, start: usize) -> Result<Token<'a>, TokenizerError> {
        self.scanner.advance(2);
        let target = self.read_name_str("invalid processing instruction target")?;
        let end = self
            .scanner
            .find_sequence(b"?>")
            .ok_or_else(|| self.error("unterminated processing instruction", start))?;
        self.scanner.set_position(end + 2);
        Ok(Token::new(TokenKind::ProcessingInstruction, (start, end + 2)).with_name(target))
    }

    /// `<!DOCTYPE ...>` with an optional `[...]` internal subset
    fn parse_doctype(&mut self, start: usize) -> Result<Token<'a>, TokenizerError> {
        self.scanner.advance(2);
        let mut bracket_depth = 0usize;
        let mut quote: Option<u8> = None;

        while let Some(b) = self.scanner.peek() {
            self.scanner.advance(1);
            match (quote, b) {
                (Some(q), _) if q == b => quote = None,
                (Some(_), _) => {}
                (None, b'"' | b'\'') => quote = Some(b),
                (None, b'[') => bracket_depth += 1,
                (None, b']') => bracket_depth = bracket_depth.saturating_sub(1),
                (None, b'>') if bracket_depth == 0 => {
                    return Ok(Token::new(TokenKind::DocType, (start, self.scanner.position())));
                }
                _ => {}
            }
        }
        Err(self.error("unterminated DOCTYPE declaration", start))
    }

    fn parse_end_tag(&mut self, start: usize) -> Result<Token<'a>, TokenizerError> {
        self.scanner.advance(2);
        let name = self.read_name_str("invalid end tag name")?;
        self.scanner.skip_whitespace();
        match self.scanner.peek() {
            Some(b'>') => {
                self.scanner.advance(1);
                Ok(Token::new(TokenKind::EndTag, (start, self.scanner.position())).with_name(name))
            }
            Some(_) => Err(self.error("unexpected content in end tag", self.scanner.position())),
            None => Err(self.error("unterminated end tag", start)),
        }
    }

    fn parse_start_tag(&mut self, start: usize) -> Result<Token<'a>, TokenizerError> {
        self.scanner.advance(1);
        let name = self.read_name_str("invalid element name")?;
        let attr_start = self.scanner.position();
        let close = self
            .scanner
            .find_tag_end_quoted()
            .ok_or_else(|| self.error("unterminated start tag", start))?;

        let is_empty = close > attr_start && self.input[close - 1] == b'/';
        let attr_end = if is_empty { close - 1 } else { close };
        if attr_end > attr_start && !is_whitespace(self.input[attr_start]) {
            return Err(self.error("invalid character in element name", attr_start));
        }

        self.scanner.set_position(close + 1);
        let kind = if is_empty { TokenKind::EmptyTag } else { TokenKind::StartTag };
        let mut token = Token::new(kind, (start, close + 1)).with_name(name);
        token.attr_span = Some((attr_start, attr_end));
        Ok(token)
    }

    fn parse_text(&mut self) -> Token<'a> {
        let start = self.scanner.position();
        let end = self.scanner.find_tag_start().unwrap_or(self.input.len());
        self.scanner.set_position(end);
        Token::new(TokenKind::Text, (start, end))
    }

    fn read_name_str(&mut self, message: &str) -> Result<&'a str, TokenizerError> {
        let at = self.scanner.position();
        let name = self.scanner.read_name().ok_or_else(|| self.error(message, at))?;
        std::str::from_utf8(name).map_err(|_| self.error("name is not valid UTF-8", at))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token<'a>, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        match self.next_token()? {
            Ok(token) if token.kind == TokenKind::Eof => None,
            other => Some(other),
        }
    }
}
