//! xapidb - navigate XAPI database dumps by following references
//!
//! Pipeline:
//! 1. Tokenize the XML dump into open/close events (`reader`)
//! 2. Build an arena tree with parent links (`dom`)
//! 3. Index every element carrying the reference attribute (`index`)
//! 4. Resolve a reference to its node plus the ancestors to unfold (`resolve`)
//!
//! `Database` owns the tree and its index together; `DatabaseResource`
//! shares one between threads and swaps it on reload.

pub mod config;
pub mod core;
pub mod database;
pub mod dom;
pub mod error;
pub mod index;
pub mod reader;
pub mod resolve;
pub mod resource;

pub use config::Keys;
pub use database::Database;
pub use dom::{Node, NodeId, Tree, TreeBuilder};
pub use error::{LoadError, ReloadError, ResolveError, ResourceError, StructureError, TokenizerError};
pub use index::{build_parallel, ReferenceIndex};
pub use resolve::{resolve, Resolution};
pub use resource::DatabaseResource;
