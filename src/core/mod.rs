//! Core XML parsing primitives
//!
//! - Scanner: SIMD-accelerated delimiter detection using memchr
//! - Tokenizer: pull tokenizer for tags and the markup around them
//! - Entities: entity decoding with Cow (zero-copy when possible)
//! - Attributes: attribute parsing and validation

pub mod attributes;
pub mod entities;
pub mod scanner;
pub mod tokenizer;
