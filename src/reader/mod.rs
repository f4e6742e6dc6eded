//! Token source
//!
//! - SliceReader: zero-copy event reader over a complete document buffer
//! - Events: the open/close events the tree builder consumes

pub mod events;
pub mod slice;

pub use events::{EndElement, StartElement, XmlEvent};
pub use slice::{parse_events, SliceReader};
