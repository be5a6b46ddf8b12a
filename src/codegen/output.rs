//! Output sinks
//!
//! Generated files are handed to an [`OutputSink`] as (package, file name,
//! contents). [`FsOutput`] writes them below an output root with one
//! directory per package; [`MemoryOutput`] keeps them in memory.

use indexmap::IndexMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::error::Result;

/// Destination of generated files
pub trait OutputSink {
    /// Write one generated file
    fn write_file(&mut self, package: &str, file_name: &str, contents: &str) -> Result<()>;
}

/// Writes files to `<root>/<package>/<file_name>`
#[derive(Debug, Clone)]
pub struct FsOutput {
    root: PathBuf,
}

impl FsOutput {
    /// Create a sink writing below `root`
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Output root
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl OutputSink for FsOutput {
    fn write_file(&mut self, package: &str, file_name: &str, contents: &str) -> Result<()> {
        let dir = self.root.join(package);
        fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        fs::write(&path, contents)?;
        info!(path = %path.display(), "wrote file");
        Ok(())
    }
}

/// Keeps generated files in memory, keyed by `<package>/<file_name>`
#[derive(Debug, Clone, Default)]
pub struct MemoryOutput {
    files: IndexMap<String, String>,
}

impl MemoryOutput {
    /// Create an empty sink
    pub fn new() -> Self {
        Self::default()
    }

    /// Contents of a generated file
    pub fn get(&self, package: &str, file_name: &str) -> Option<&str> {
        self.files
            .get(&format!("{}/{}", package, file_name))
            .map(String::as_str)
    }

    /// All files as (`<package>/<file_name>`, contents), in write order
    pub fn files(&self) -> impl Iterator<Item = (&str, &str)> {
        self.files.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of files written
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Check if nothing was written
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl OutputSink for MemoryOutput {
    fn write_file(&mut self, package: &str, file_name: &str, contents: &str) -> Result<()> {
        self.files
            .insert(format!("{}/{}", package, file_name), contents.to_string());
        Ok(())
    }
}
