//! DOM Module - Arena-based document tree
//!
//! - Arena allocation for nodes, root in slot 0
//! - NodeId (u32) indices for both child and parent links, so the
//!   parent back-reference never creates an ownership cycle
//! - Stack-driven builder over the open/close event stream

pub mod builder;
pub mod document;
pub mod inspect;
pub mod node;

pub use builder::TreeBuilder;
pub use document::{AncestorIter, DescendantIter, Tree};
pub use node::{Node, NodeId};
