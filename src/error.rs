//! Error types
//!
//! Loading errors are fatal for the document being loaded. Resolution errors
//! are ordinary values: a stale or mistyped reference is expected input.

use thiserror::Error;

/// Malformed bytes at the token source boundary
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("malformed XML at byte {position}: {message}")]
pub struct TokenizerError {
    pub message: String,
    pub position: usize,
}

impl TokenizerError {
    pub fn new(message: impl Into<String>, position: usize) -> Self {
        TokenizerError {
            message: message.into(),
            position,
        }
    }
}

/// Unbalanced or inconsistent open/close structure
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StructureError {
    #[error("unexpected end tag </{name}> with no open element")]
    UnexpectedClose { name: String },
    #[error("tag mismatch: <{expected}> closed with </{found}>")]
    MismatchedClose { expected: String, found: String },
    #[error("document has multiple root elements (second root <{name}>)")]
    MultipleRoots { name: String },
}

/// Failure while turning bytes into a tree
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Tokenizer(#[from] TokenizerError),
    #[error(transparent)]
    Structure(#[from] StructureError),
}

/// Failure while following a reference
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResolveError {
    #[error("failed to find {reference} in the reference index")]
    NotFound { reference: String },
    #[error("{reference} is declared on the root element and has no owning collection")]
    Orphan { reference: String },
    #[error("{reference} has a parent chain that does not reach the root")]
    Unreachable { reference: String },
    #[error("{reference} is not a followable reference")]
    NotAReference { reference: String },
}

impl ResolveError {
    /// The reference string that failed
    pub fn reference(&self) -> &str {
        match self {
            ResolveError::NotFound { reference }
            | ResolveError::Orphan { reference }
            | ResolveError::Unreachable { reference }
            | ResolveError::NotAReference { reference } => reference,
        }
    }
}

/// Shared database handle failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ResourceError {
    #[error("database lock poisoned")]
    Poisoned,
    #[error("no database loaded")]
    NoDatabase,
}

/// Failure while reloading a shared database
#[derive(Error, Debug)]
pub enum ReloadError {
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Resource(#[from] ResourceError),
}

pub type Result<T> = std::result::Result<T, LoadError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_error_message() {
        let err = TokenizerError::new("unterminated tag", 12);
        assert_eq!(err.to_string(), "malformed XML at byte 12: unterminated tag");
    }

    #[test]
    fn test_load_error_is_transparent() {
        let err: LoadError = StructureError::UnexpectedClose { name: "row".into() }.into();
        assert_eq!(err.to_string(), "unexpected end tag </row> with no open element");
    }

    #[test]
    fn test_resolve_error_reference() {
        let err = ResolveError::NotFound { reference: "OpaqueRef:1".into() };
        assert_eq!(err.reference(), "OpaqueRef:1");
        assert!(err.to_string().contains("OpaqueRef:1"));
    }
}
