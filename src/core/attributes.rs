//! Attribute parsing
//!
//! Parses the `name="value"` pairs that follow an element name inside a tag.

use super::entities::decode_text;
use super::scanner::{is_name_char, is_name_start_char, is_whitespace};
use crate::error::TokenizerError;
use std::borrow::Cow;

/// A parsed attribute, value already entity-decoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'a str,
    pub value: Cow<'a, str>,
}

/// Parse attributes from the tag content between the element name and
/// `>` / `/>`.
///
/// `offset` is the absolute position of `input` in the document, used for
/// error positions. Duplicate names are returned as-is, in order.
pub fn parse_attributes(input: &[u8], offset: usize) -> Result<Vec<Attribute<'_>>, TokenizerError> {
    let mut attrs = Vec::new();
    let mut pos = 0;
    let err = |msg: &str, at: usize| TokenizerError::new(msg, offset + at);

    loop {
        let before_ws = pos;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() {
            break;
        }
        if pos == before_ws && !attrs.is_empty() {
            return Err(err("attributes must be separated by whitespace", pos));
        }

        let name_start = pos;
        if !is_name_start_char(input[pos]) {
            return Err(err("attribute name must start with a letter, underscore or colon", pos));
        }
        while pos < input.len() && is_name_char(input[pos]) {
            pos += 1;
        }
        let name = std::str::from_utf8(&input[name_start..pos])
            .map_err(|_| err("attribute name is not valid UTF-8", name_start))?;

        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }
        if pos >= input.len() || input[pos] != b'=' {
            return Err(err("attribute value required", pos));
        }
        pos += 1;
        while pos < input.len() && is_whitespace(input[pos]) {
            pos += 1;
        }

        let quote = match input.get(pos) {
            Some(&q @ (b'"' | b'\'')) => q,
            _ => return Err(err("attribute value must be quoted", pos)),
        };
        pos += 1;
        let value_start = pos;
        let value_len = memchr::memchr(quote, &input[value_start..])
            .ok_or_else(|| err("attribute value has mismatched quotes", value_start - 1))?;
        let raw = &input[value_start..value_start + value_len];
        if let Some(lt) = memchr::memchr(b'<', raw) {
            return Err(err("attribute value cannot contain '<'", value_start + lt));
        }
        let raw = std::str::from_utf8(raw)
            .map_err(|_| err("attribute value is not valid UTF-8", value_start))?;
        pos = value_start + value_len + 1;

        attrs.push(Attribute {
            name,
            value: decode_text(raw),
        });
    }

    Ok(attrs)
}
