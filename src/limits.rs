//! Limits and constraints for schema loading
//!
//! Bounds the size of individual schema files, the nesting depth of their
//! XML trees and the number of documents a single schema graph may pull in.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Loader limits configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum element nesting depth of one schema document
    pub max_xml_depth: usize,

    /// Maximum schema file size in bytes
    pub max_xml_size: usize,

    /// Maximum number of schema documents in one graph
    pub max_documents: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_xml_depth: 256,
            max_xml_size: 64 * 1024 * 1024, // 64 MB
            max_documents: 4096,
        }
    }
}

impl Limits {
    /// Create a new Limits with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Create strict limits (more restrictive)
    pub fn strict() -> Self {
        Self {
            max_xml_depth: 64,
            max_xml_size: 10 * 1024 * 1024, // 10 MB
            max_documents: 256,
        }
    }

    /// Check if XML depth is within limits
    pub fn check_xml_depth(&self, depth: usize) -> Result<()> {
        if depth > self.max_xml_depth {
            Err(Error::LimitExceeded(format!(
                "XML depth {} exceeds maximum {}",
                depth, self.max_xml_depth
            )))
        } else {
            Ok(())
        }
    }

    /// Check if XML size is within limits
    pub fn check_xml_size(&self, size: usize) -> Result<()> {
        if size > self.max_xml_size {
            Err(Error::LimitExceeded(format!(
                "XML size {} bytes exceeds maximum {} bytes",
                size, self.max_xml_size
            )))
        } else {
            Ok(())
        }
    }

    /// Check if the number of loaded documents is within limits
    pub fn check_documents(&self, count: usize) -> Result<()> {
        if count > self.max_documents {
            Err(Error::LimitExceeded(format!(
                "schema graph holds {} documents, maximum is {}",
                count, self.max_documents
            )))
        } else {
            Ok(())
        }
    }
}
