//! Generator configuration
//!
//! Options can be built in code, loaded from a JSON file, or assembled by
//! the CLI. Every field has a default, so a config file only needs the
//! values it changes.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::limits::Limits;
use crate::names::{is_valid_package_name, package_from_namespace};

/// Options for one generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Directory holding the schemas; roots are relative to it
    pub input_dir: PathBuf,

    /// Root schema files; empty means every `*.xsd` in `input_dir`
    pub roots: Vec<PathBuf>,

    /// Output root, one sub-directory per package
    pub output_dir: PathBuf,

    /// Package for definitions without a target namespace
    pub package: String,

    /// Import path prefix for cross-package references
    pub base_module: String,

    /// Explicit namespace URI to package name mapping
    pub namespace_packages: IndexMap<String, String>,

    /// Export every named symbol, not only those reachable from root elements
    pub recursive: bool,

    /// Keep the first of duplicate definitions and accept empty complex types
    pub permissive: bool,

    /// Loader limits
    pub limits: Limits,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("."),
            roots: Vec::new(),
            output_dir: PathBuf::from("generated"),
            package: "schema".to_string(),
            base_module: String::new(),
            namespace_packages: IndexMap::new(),
            recursive: false,
            permissive: false,
            limits: Limits::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a configuration reading schemas from `input_dir`
    pub fn new(input_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_dir: input_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = fs::read_to_string(path.as_ref())?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Add a root schema
    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.roots.push(root.into());
        self
    }

    /// Set the output root
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Set the package for no-namespace definitions
    pub fn with_package(mut self, package: impl Into<String>) -> Self {
        self.package = package.into();
        self
    }

    /// Set the import path prefix
    pub fn with_base_module(mut self, base_module: impl Into<String>) -> Self {
        self.base_module = base_module.into();
        self
    }

    /// Map a namespace URI to an explicit package name
    pub fn with_namespace_package(mut self, namespace: impl Into<String>, package: impl Into<String>) -> Self {
        self.namespace_packages.insert(namespace.into(), package.into());
        self
    }

    /// Enable or disable recursive mode
    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// Enable or disable permissive mode
    pub fn with_permissive(mut self, permissive: bool) -> Self {
        self.permissive = permissive;
        self
    }

    /// Check that package names are usable Go identifiers
    pub fn validate(&self) -> Result<()> {
        if !is_valid_package_name(&self.package) {
            return Err(Error::Config(format!(
                "invalid package name '{}'",
                self.package
            )));
        }
        for (namespace, package) in &self.namespace_packages {
            if !is_valid_package_name(package) {
                return Err(Error::Config(format!(
                    "invalid package name '{}' for namespace '{}'",
                    package, namespace
                )));
            }
        }
        if self.output_dir.as_os_str().is_empty() {
            return Err(Error::Config("output directory is empty".to_string()));
        }
        Ok(())
    }

    /// Root schema paths, joined to `input_dir`
    ///
    /// Without explicit roots every `*.xsd` file directly inside `input_dir`
    /// is a root, in sorted order.
    pub fn root_paths(&self) -> Result<Vec<PathBuf>> {
        if !self.roots.is_empty() {
            return Ok(self.roots.iter().map(|r| self.input_dir.join(r)).collect());
        }

        let dir = self.input_dir.to_string_lossy();
        let pattern = format!("{}/*.xsd", glob::Pattern::escape(&dir));
        let entries = glob::glob(&pattern).map_err(|e| Error::Config(e.to_string()))?;

        let mut roots = Vec::new();
        for entry in entries {
            roots.push(entry.map_err(|e| Error::Config(e.to_string()))?);
        }
        roots.sort();

        if roots.is_empty() {
            return Err(Error::Config(format!(
                "no *.xsd files found in '{}'",
                self.input_dir.display()
            )));
        }
        Ok(roots)
    }

    /// Package name for a target namespace
    pub fn package_for(&self, namespace: Option<&str>) -> String {
        match namespace {
            None => self.package.clone(),
            Some(ns) => self
                .namespace_packages
                .get(ns)
                .cloned()
                .unwrap_or_else(|| package_from_namespace(ns)),
        }
    }

    /// Import path of a generated package
    pub fn import_path(&self, package: &str) -> String {
        let base = self.base_module.trim_end_matches('/');
        if base.is_empty() {
            package.to_string()
        } else {
            format!("{}/{}", base, package)
        }
    }
}
