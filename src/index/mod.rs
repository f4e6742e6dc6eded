//! Reference Index Module
//!
//! Cross-reference lookup from a reference value (an `OpaqueRef:...` string
//! in XAPI dumps) to the node that declares it. Three ways to build it, all
//! with the same result:
//!
//! - fused into the tree builder (`TreeBuilder::with_reference_key`)
//! - a sequential pass over a finished tree (`ReferenceIndex::build`)
//! - a parallel pass over a finished tree (`build_parallel`)

pub mod parallel;
pub mod reference;

pub use parallel::build_parallel;
pub use reference::ReferenceIndex;
