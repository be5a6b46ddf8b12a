//! Error types for xsdgo
//!
//! Every failure is fatal: resolution, parsing and I/O errors propagate
//! unchanged to [`crate::generate`], which aborts the run on the first one.

use std::fmt;
use thiserror::Error;

/// Result type alias using the xsdgo Error
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of schema component a symbol names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolKind {
    /// Global element declaration
    Element,
    /// Global attribute declaration
    Attribute,
    /// Named simple or complex type
    Type,
    /// Named attribute group
    AttributeGroup,
    /// Named model group (`xs:group`)
    Group,
}

impl fmt::Display for SymbolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element => write!(f, "element"),
            Self::Attribute => write!(f, "attribute"),
            Self::Type => write!(f, "type"),
            Self::AttributeGroup => write!(f, "attributeGroup"),
            Self::Group => write!(f, "group"),
        }
    }
}

/// Main error type for xsdgo operations
#[derive(Error, Debug)]
pub enum Error {
    /// A `ref`/`type`/`base` names a symbol absent from the whole schema graph
    #[error("unresolved {kind} reference '{name}'\n\nSource:\n{fragment}")]
    UnresolvedReference {
        /// Symbol space that was searched
        kind: SymbolKind,
        /// Reference as `{namespace}local`
        name: String,
        /// Serialized XML of the referencing node
        fragment: String,
    },

    /// The same local name was registered twice in one document
    #[error("duplicate {kind} definition '{name}' in {document}")]
    DuplicateDefinition {
        /// Symbol space of the duplicate
        kind: SymbolKind,
        /// Local name of the duplicate
        name: String,
        /// Path of the declaring document
        document: String,
    },

    /// A construct the generator does not know how to interpret
    #[error("malformed construct: {message}\n\nSource:\n{fragment}")]
    MalformedConstruct {
        /// What is wrong with the construct
        message: String,
        /// Serialized XML of the construct
        fragment: String,
    },

    /// A `schemaLocation` could not be opened
    #[error("cannot load schema '{location}': {reason}")]
    MissingIncludeTarget {
        /// Location as written or resolved
        location: String,
        /// Underlying cause
        reason: String,
    },

    /// A `ref`/`base`/group chain leads back to itself
    #[error("cyclic {kind} reference: {chain}")]
    CyclicReference {
        /// Symbol space of the chain
        kind: SymbolKind,
        /// The chain, joined with ` -> `
        chain: String,
    },

    /// XML parsing error
    #[error("XML error: {0}")]
    Xml(String),

    /// Namespace error (unknown prefix)
    #[error("namespace error: {0}")]
    Namespace(String),

    /// Limit exceeded error
    #[error("limit exceeded: {0}")]
    LimitExceeded(String),

    /// Invalid generator configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Create an unresolved reference error
    pub fn unresolved(kind: SymbolKind, name: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::UnresolvedReference {
            kind,
            name: name.into(),
            fragment: fragment.into(),
        }
    }

    /// Create a malformed construct error
    pub fn malformed(message: impl Into<String>, fragment: impl Into<String>) -> Self {
        Self::MalformedConstruct {
            message: message.into(),
            fragment: fragment.into(),
        }
    }

    /// Create a missing include target error
    pub fn missing_target(location: impl Into<String>, reason: impl fmt::Display) -> Self {
        Self::MissingIncludeTarget {
            location: location.into(),
            reason: reason.to_string(),
        }
    }

    /// Create a cyclic reference error from the chain of names visited
    pub fn cyclic<S: AsRef<str>>(kind: SymbolKind, chain: &[S]) -> Self {
        Self::CyclicReference {
            kind,
            chain: chain
                .iter()
                .map(|s| s.as_ref())
                .collect::<Vec<_>>()
                .join(" -> "),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(e: roxmltree::Error) -> Self {
        Self::Xml(e.to_string())
    }
}
