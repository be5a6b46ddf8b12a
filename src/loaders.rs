//! Resource loading utilities
//!
//! This module reads schema documents from disk, enforcing the configured
//! size limit.

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::locations::Location;
use std::fs;
use tracing::debug;

/// Resource loader for schema documents
#[derive(Debug, Clone, Default)]
pub struct Loader {
    /// Resource limits
    limits: Limits,
}

impl Loader {
    /// Create a new loader with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the limits
    pub fn with_limits(mut self, limits: Limits) -> Self {
        self.limits = limits;
        self
    }

    /// The limits this loader enforces
    pub fn limits(&self) -> &Limits {
        &self.limits
    }

    /// Load a resource as a string
    pub fn load(&self, location: &Location) -> Result<String> {
        match location {
            Location::Path(path) => {
                debug!(path = %path.display(), "reading schema");
                let content = fs::read_to_string(path)
                    .map_err(|e| Error::missing_target(path.display().to_string(), e))?;

                self.limits.check_xml_size(content.len())?;

                Ok(content)
            }
            Location::Url(url) => Err(Error::missing_target(
                url.as_str(),
                "remote schema locations are not supported",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "<xs:schema/>").unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let content = Loader::new().load(&location).unwrap();

        assert!(content.contains("<xs:schema/>"));
    }

    #[test]
    fn test_missing_file() {
        let location = Location::Path("/definitely/not/here.xsd".into());
        let err = Loader::new().load(&location).unwrap_err();
        assert!(matches!(err, Error::MissingIncludeTarget { .. }));
    }

    #[test]
    fn test_remote_rejected() {
        let location = Location::Url("https://example.com/a.xsd".parse().unwrap());
        let err = Loader::new().load(&location).unwrap_err();
        assert!(matches!(err, Error::MissingIncludeTarget { .. }));
    }

    #[test]
    fn test_size_limit() {
        let mut file = NamedTempFile::new().unwrap();
        let large_content = "x".repeat(11 * 1024 * 1024); // 11 MB
        write!(file, "{}", large_content).unwrap();

        let location = Location::Path(file.path().to_path_buf());
        let loader = Loader::new().with_limits(Limits::strict());
        let result = loader.load(&location);

        assert!(matches!(result, Err(Error::LimitExceeded(_))));
    }
}
