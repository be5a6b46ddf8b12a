//! Schema location resolution
//!
//! Turns the `schemaLocation` of an `xs:include`/`xs:import` into something
//! the loader can open. Relative locations are joined to the directory of
//! the document that references them.

use std::path::{Component, Path, PathBuf};
use url::Url;

/// Resource location of a schema document
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    /// File system path
    Path(PathBuf),
    /// Remote URL (http, https, ftp, ...)
    Url(Url),
}

impl Location {
    /// Resolve a `schemaLocation` value against a base directory
    pub fn resolve(location: &str, base_dir: &Path) -> Self {
        if let Ok(url) = Url::parse(location) {
            if url.scheme() == "file" {
                if let Ok(path) = url.to_file_path() {
                    return Location::Path(normalize(&path));
                }
            } else if url.scheme().len() > 1 {
                // single-letter schemes are Windows drive letters
                return Location::Url(url);
            }
        }

        let path = Path::new(location);
        if path.is_absolute() {
            Location::Path(normalize(path))
        } else {
            Location::Path(normalize(&base_dir.join(path)))
        }
    }

    /// Get the location as a string
    pub fn as_str(&self) -> String {
        match self {
            Location::Path(p) => p.to_string_lossy().to_string(),
            Location::Url(u) => u.to_string(),
        }
    }

    /// Check if this is a remote location (URL)
    pub fn is_remote(&self) -> bool {
        matches!(self, Location::Url(_))
    }
}

/// Lexically normalize a path, folding `.` and `..` components
pub fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !out.pop() {
                    out.push("..");
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}
