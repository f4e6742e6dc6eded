//! Slice reader
//!
//! Token source over a complete in-memory document. Turns tokenizer output
//! into open/close events and drops everything else.

use super::events::{EndElement, StartElement, XmlEvent};
use crate::core::attributes::parse_attributes;
use crate::core::tokenizer::{Token, TokenKind, Tokenizer};
use crate::error::TokenizerError;

/// Zero-copy event reader over a byte slice
pub struct SliceReader<'a> {
    tokenizer: Tokenizer<'a>,
    /// Close half of an empty tag, emitted right after its open half
    pending_close: Option<&'a str>,
    failed: bool,
}

impl<'a> SliceReader<'a> {
    pub fn new(input: &'a [u8]) -> Self {
        SliceReader {
            tokenizer: Tokenizer::new(input),
            pending_close: None,
            failed: false,
        }
    }

    /// Next structural event, `None` at clean end of input
    pub fn next_event(&mut self) -> Option<Result<XmlEvent<'a>, TokenizerError>> {
        if self.failed {
            return None;
        }
        if let Some(name) = self.pending_close.take() {
            return Some(Ok(XmlEvent::Close(EndElement::new(name))));
        }

        loop {
            let token = match self.tokenizer.next_token()? {
                Ok(token) => token,
                Err(e) => {
                    self.failed = true;
                    return Some(Err(e));
                }
            };

            match token.kind {
                TokenKind::Eof => return None,
                TokenKind::StartTag | TokenKind::EmptyTag => {
                    let event = self.start_element(&token);
                    match &event {
                        Ok(_) if token.kind == TokenKind::EmptyTag => self.pending_close = token.name,
                        Ok(_) => {}
                        Err(_) => self.failed = true,
                    }
                    return Some(event.map(XmlEvent::Open));
                }
                TokenKind::EndTag => {
                    if let Some(name) = token.name {
                        return Some(Ok(XmlEvent::Close(EndElement::new(name))));
                    }
                }
                TokenKind::Text
                | TokenKind::CData
                | TokenKind::Comment
                | TokenKind::ProcessingInstruction
                | TokenKind::DocType => {}
            }
        }
    }

    fn start_element(&self, token: &Token<'a>) -> Result<StartElement<'a>, TokenizerError> {
        let name = token
            .name
            .ok_or_else(|| TokenizerError::new("start tag without a name", token.span.0))?;
        let attributes = match token.attr_span {
            Some((start, end)) => parse_attributes(&self.tokenizer.input()[start..end], start)?,
            None => Vec::new(),
        };
        Ok(StartElement::new(name, attributes))
    }
}

impl<'a> Iterator for SliceReader<'a> {
    type Item = Result<XmlEvent<'a>, TokenizerError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_event()
    }
}

/// Read every structural event of `input`, stopping at the first error
pub fn parse_events(input: &[u8]) -> Result<Vec<XmlEvent<'_>>, TokenizerError> {
    SliceReader::new(input).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_element() {
        let events = parse_events(b"<database>hello</database>").unwrap();
        assert_eq!(events.len(), 2);
        assert!(matches!(&events[0], XmlEvent::Open(e) if e.name == "database"));
        assert!(matches!(&events[1], XmlEvent::Close(e) if e.name == "database"));
    }

    #[test]
    fn test_empty_element_expands() {
        let events = parse_events(b"<table name=\"Bond\"/>").unwrap();
        assert_eq!(events.len(), 2);
        match &events[0] {
            XmlEvent::Open(e) => {
                assert_eq!(e.name, "table");
                assert_eq!(e.get_attribute_value("name"), Some("Bond"));
            }
            other => panic!("expected open, got {other:?}"),
        }
        assert!(matches!(&events[1], XmlEvent::Close(e) if e.name == "table"));
    }

    #[test]
    fn test_skips_non_structural_markup() {
        let input = b"<?xml version=\"1.0\"?><!-- dump --><db><![CDATA[x]]>text<?pi?></db>";
        let events = parse_events(input).unwrap();
        let names: Vec<_> = events.iter().map(|e| (e.is_open(), e.name())).collect();
        assert_eq!(names, vec![(true, "db"), (false, "db")]);
    }

    #[test]
    fn test_attribute_error_is_fatal() {
        let err = parse_events(b"<db><row ref=R1/></db>").unwrap_err();
        assert_eq!(err.position, 13);
    }

    #[test]
    fn test_attribute_error_stops_iteration() {
        let mut reader = SliceReader::new(b"<db a=1><row/></db>");
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }

    #[test]
    fn test_error_stops_iteration() {
        let mut reader = SliceReader::new(b"<db><!-- never closed");
        assert!(reader.next().unwrap().is_ok());
        assert!(reader.next().unwrap().is_err());
        assert!(reader.next().is_none());
    }
}
