//! XML namespace handling
//!
//! This module provides qualified names (QNames) and the prefix mappings
//! used to turn `type="a:Foo"`-style attribute values into them.

use crate::error::{Error, Result};
use crate::names::split_qname;
use indexmap::IndexMap;
use std::fmt;

/// XML Namespace URI
pub type NamespaceUri = String;

/// Namespace prefix
pub type Prefix = String;

/// The prefix that is bound to the XML namespace without a declaration
const XML_PREFIX: &str = "xml";

/// Qualified name (QName) - combination of namespace and local name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct QName {
    /// Namespace URI (None for no namespace)
    pub namespace: Option<NamespaceUri>,
    /// Local name
    pub local_name: String,
}

impl QName {
    /// Create a new QName
    pub fn new(namespace: Option<impl Into<String>>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(|s| s.into()),
            local_name: local_name.into(),
        }
    }

    /// Create a QName without a namespace
    pub fn local(local_name: impl Into<String>) -> Self {
        Self {
            namespace: None,
            local_name: local_name.into(),
        }
    }

    /// Create a QName with a namespace
    pub fn namespaced(namespace: impl Into<String>, local_name: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
            local_name: local_name.into(),
        }
    }

    /// Namespace as a string slice
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Whether this name lives in the given namespace (both absent counts)
    pub fn in_namespace(&self, namespace: Option<&str>) -> bool {
        self.namespace.as_deref() == namespace
    }
}

impl fmt::Display for QName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.namespace {
            Some(ns) => write!(f, "{{{}}}{}", ns, self.local_name),
            None => write!(f, "{}", self.local_name),
        }
    }
}

/// Namespace context for resolving prefixes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceContext {
    /// Mapping from prefix to namespace URI
    prefixes: IndexMap<Prefix, NamespaceUri>,
    /// Default namespace (no prefix)
    default_namespace: Option<NamespaceUri>,
}

impl NamespaceContext {
    /// Create a new empty namespace context
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a namespace prefix mapping
    pub fn add_prefix(&mut self, prefix: impl Into<String>, namespace: impl Into<String>) {
        self.prefixes.insert(prefix.into(), namespace.into());
    }

    /// Set the default namespace
    pub fn set_default_namespace(&mut self, namespace: impl Into<String>) {
        self.default_namespace = Some(namespace.into());
    }

    /// Get the namespace for a prefix
    pub fn get_namespace(&self, prefix: &str) -> Option<&str> {
        self.prefixes.get(prefix).map(|s| s.as_str())
    }

    /// Get the default namespace
    pub fn get_default_namespace(&self) -> Option<&str> {
        self.default_namespace.as_deref()
    }

    /// Iterate over prefix bindings in declaration order
    pub fn iter(&self) -> impl Iterator<Item = (&Prefix, &NamespaceUri)> {
        self.prefixes.iter()
    }

    /// Resolve a prefixed name to a QName
    ///
    /// Unprefixed names take the default namespace, or no namespace when
    /// none is declared.
    pub fn resolve(&self, prefixed_name: &str) -> Result<QName> {
        match split_qname(prefixed_name.trim()) {
            (Some(XML_PREFIX), local) if self.get_namespace(XML_PREFIX).is_none() => {
                Ok(QName::namespaced(crate::XML_NAMESPACE, local))
            }
            (Some(prefix), local) => {
                let namespace = self.get_namespace(prefix).ok_or_else(|| {
                    Error::Namespace(format!(
                        "Unknown prefix '{}' in '{}'",
                        prefix, prefixed_name
                    ))
                })?;
                Ok(QName::namespaced(namespace, local))
            }
            (None, local) => Ok(QName::new(self.default_namespace.clone(), local)),
        }
    }
}
