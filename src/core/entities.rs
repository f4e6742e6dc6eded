//! XML entity decoding for attribute values
//!
//! Handles the predefined entities (&lt; &gt; &amp; &quot; &apos;) and
//! numeric character references (&#123; &#x7B;). Anything else is kept
//! verbatim. Borrowed when the input holds no '&'.

use memchr::memchr;
use std::borrow::Cow;

/// Decode entity references in `input`
#[inline]
pub fn decode_text(input: &str) -> Cow<'_, str> {
    if memchr(b'&', input.as_bytes()).is_none() {
        return Cow::Borrowed(input);
    }
    Cow::Owned(decode_entities(input))
}

fn decode_entities(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut result = String::with_capacity(input.len());
    let mut pos = 0;

    // '&' and ';' are ASCII, so every slice boundary below is a char boundary
    while let Some(amp) = memchr(b'&', &bytes[pos..]) {
        result.push_str(&input[pos..pos + amp]);
        pos += amp;

        let decoded = memchr(b';', &bytes[pos..])
            .and_then(|semi| decode_entity(&bytes[pos + 1..pos + semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                result.push(c);
                pos += semi + 1;
            }
            None => {
                result.push('&');
                pos += 1;
            }
        }
    }
    result.push_str(&input[pos..]);

    result
}

/// Decode a single entity body (without '&' and ';')
fn decode_entity(entity: &[u8]) -> Option<char> {
    match entity {
        b"lt" => Some('<'),
        b"gt" => Some('>'),
        b"amp" => Some('&'),
        b"quot" => Some('"'),
        b"apos" => Some('\''),
        [b'#', b'x' | b'X', hex @ ..] => {
            let hex = std::str::from_utf8(hex).ok()?;
            char::from_u32(u32::from_str_radix(hex, 16).ok()?)
        }
        [b'#', dec @ ..] => {
            let dec = std::str::from_utf8(dec).ok()?;
            char::from_u32(dec.parse::<u32>().ok()?)
        }
        _ => None,
    }
}
