//! Schema graph
//!
//! Registry of every loaded schema document, keyed by file path, plus the
//! `include`/`import` edges between them. Documents are loaded with an
//! iterative worklist so deep or cyclic include chains neither recurse nor
//! load a file twice. Symbol queries only run once the whole graph is
//! loaded.

use indexmap::IndexMap;
use std::collections::{HashSet, VecDeque};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::config::GeneratorConfig;
use crate::documents::Document;
use crate::error::{Result, SymbolKind};
use crate::limits::Limits;
use crate::loaders::Loader;
use crate::locations::{normalize, Location};
use crate::namespaces::QName;

use super::model::{DocId, Model, Span};
use super::parser::{parse_schema, Directive};
use super::symbols::{SymbolId, SymbolTable};

/// How a document was reached from its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Include,
    Import,
}

/// Pending schema work item for iterative processing
struct PendingSchemaWork {
    location: Location,
    /// Referencing document and edge kind; None for roots
    parent: Option<(DocId, Edge)>,
}

/// A loaded schema document
#[derive(Debug)]
pub struct SchemaDocument {
    /// Normalized file path
    pub path: PathBuf,
    /// Parsed XML tree
    pub document: Document,
    /// `targetNamespace`
    pub target_namespace: Option<String>,
    /// Definitions declared directly in this document
    pub symbols: SymbolTable,
    /// Included documents, in the order they were reached
    pub includes: Vec<DocId>,
    /// Imported documents, in the order they were reached
    pub imports: Vec<DocId>,
}

/// All loaded schema documents and the model built from them
#[derive(Debug, Default)]
pub struct SchemaGraph {
    model: Model,
    documents: Vec<SchemaDocument>,
    by_path: IndexMap<PathBuf, DocId>,
    roots: Vec<DocId>,
}

impl SchemaGraph {
    /// Load the root schemas named by a generator configuration
    pub fn load(config: &GeneratorConfig) -> Result<Self> {
        let roots = config.root_paths()?;
        Self::load_roots(&roots, &config.limits, config.permissive)
    }

    /// Load root schema files and everything they include or import
    ///
    /// A file reached more than once (from several roots, or through an
    /// include cycle) is parsed only the first time.
    pub fn load_roots(paths: &[PathBuf], limits: &Limits, permissive: bool) -> Result<Self> {
        let loader = Loader::new().with_limits(limits.clone());
        let mut graph = Self::default();

        let mut pending: VecDeque<PendingSchemaWork> = paths
            .iter()
            .map(|path| PendingSchemaWork {
                location: Location::Path(normalize(path)),
                parent: None,
            })
            .collect();

        while let Some(work) = pending.pop_front() {
            if let Location::Path(path) = &work.location {
                if let Some(&existing) = graph.by_path.get(path) {
                    graph.link(work.parent, existing);
                    continue;
                }
            }

            limits.check_documents(graph.documents.len() + 1)?;
            let (id, directives) = graph.load_document(&loader, &work.location, permissive)?;
            graph.link(work.parent, id);

            let doc = &graph.documents[id.0];
            let base_dir = doc.path.parent().map(Path::to_path_buf).unwrap_or_default();
            for directive in directives {
                let (location, edge) = match directive {
                    Directive::Include { location } => (location, Edge::Include),
                    Directive::Import {
                        location: Some(location),
                        ..
                    } => (location, Edge::Import),
                    Directive::Import {
                        namespace,
                        location: None,
                    } => {
                        warn!(
                            document = %doc.path.display(),
                            namespace = namespace.as_deref().unwrap_or(""),
                            "import without schemaLocation skipped"
                        );
                        continue;
                    }
                };
                pending.push_back(PendingSchemaWork {
                    location: Location::resolve(&location, &base_dir),
                    parent: Some((id, edge)),
                });
            }
        }

        Ok(graph)
    }

    fn load_document(
        &mut self,
        loader: &Loader,
        location: &Location,
        permissive: bool,
    ) -> Result<(DocId, Vec<Directive>)> {
        let source = loader.load(location)?;
        let path = match location {
            Location::Path(path) => path.clone(),
            Location::Url(url) => PathBuf::from(url.as_str()),
        };

        let document = Document::parse(source, loader.limits())?;
        let id = DocId(self.documents.len());
        let label = path.display().to_string();
        let parsed = parse_schema(&mut self.model, &document, id, &label, permissive)?;

        info!(
            path = %label,
            namespace = parsed.target_namespace.as_deref().unwrap_or(""),
            symbols = parsed.symbols.len(),
            "loaded schema"
        );

        self.documents.push(SchemaDocument {
            path: path.clone(),
            document,
            target_namespace: parsed.target_namespace,
            symbols: parsed.symbols,
            includes: Vec::new(),
            imports: Vec::new(),
        });
        self.by_path.insert(path, id);
        Ok((id, parsed.directives))
    }

    fn link(&mut self, parent: Option<(DocId, Edge)>, child: DocId) {
        let Some((parent, edge)) = parent else {
            if !self.roots.contains(&child) {
                self.roots.push(child);
            }
            return;
        };

        if edge == Edge::Include {
            let parent_ns = &self.documents[parent.0].target_namespace;
            let child_ns = &self.documents[child.0].target_namespace;
            if parent_ns != child_ns {
                warn!(
                    document = %self.documents[parent.0].path.display(),
                    included = %self.documents[child.0].path.display(),
                    "included schema has a different target namespace"
                );
            }
        }

        let edges = match edge {
            Edge::Include => &mut self.documents[parent.0].includes,
            Edge::Import => &mut self.documents[parent.0].imports,
        };
        if !edges.contains(&child) {
            edges.push(child);
        }
    }

    /// Find a symbol visible from `from`
    ///
    /// Searches `from` itself, then its included and imported documents
    /// transitively, depth-first, visiting each document at most once. A
    /// definition matches only when its document's target namespace equals
    /// the query namespace (both absent counts as equal).
    pub fn lookup(&self, kind: SymbolKind, qname: &QName, from: DocId) -> Option<SymbolId> {
        let mut visited = HashSet::new();
        let mut stack = vec![from];

        while let Some(id) = stack.pop() {
            if !visited.insert(id) {
                continue;
            }
            let doc = &self.documents[id.0];
            if qname.in_namespace(doc.target_namespace.as_deref()) {
                if let Some(found) = doc.symbols.get(kind, &qname.local_name) {
                    debug!(%kind, name = %qname, document = %doc.path.display(), "resolved symbol");
                    return Some(found);
                }
            }
            // reversed so the first include is searched first
            for next in doc.imports.iter().rev().chain(doc.includes.iter().rev()) {
                if !visited.contains(next) {
                    stack.push(*next);
                }
            }
        }

        None
    }

    /// The model holding every component
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Get a document by id
    pub fn document(&self, id: DocId) -> &SchemaDocument {
        &self.documents[id.0]
    }

    /// Get a document by path
    pub fn document_by_path(&self, path: &Path) -> Option<DocId> {
        self.by_path.get(&normalize(path)).copied()
    }

    /// All documents with their ids, in load order
    pub fn documents(&self) -> impl Iterator<Item = (DocId, &SchemaDocument)> {
        self.documents.iter().enumerate().map(|(i, d)| (DocId(i), d))
    }

    /// Root documents in the order they were named
    pub fn roots(&self) -> &[DocId] {
        &self.roots
    }

    /// Number of loaded documents
    pub fn len(&self) -> usize {
        self.documents.len()
    }

    /// Check if no document is loaded
    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Include closure of `from`: itself plus every transitively included document
    pub fn include_closure(&self, from: DocId) -> Vec<DocId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            stack.extend(self.documents[id.0].includes.iter().rev());
        }
        order
    }

    /// Source XML of a component
    pub fn fragment(&self, span: &Span) -> &str {
        self.documents[span.doc.0].document.fragment(&span.range)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::fs;
    use tempfile::TempDir;

    const HEAD: &str = r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema""#;

    fn write(dir: &TempDir, name: &str, contents: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    fn load(paths: &[PathBuf]) -> Result<SchemaGraph> {
        SchemaGraph::load_roots(paths, &Limits::default(), false)
    }

    #[test]
    fn test_include_cycle_loads_each_file_once() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(r#"{HEAD} targetNamespace="urn:a"><xs:include schemaLocation="b.xsd"/></xs:schema>"#),
        );
        write(
            &dir,
            "b.xsd",
            &format!(r#"{HEAD} targetNamespace="urn:a"><xs:include schemaLocation="a.xsd"/></xs:schema>"#),
        );

        let graph = load(&[a.clone()]).unwrap();
        assert_eq!(graph.len(), 2);
        let a_id = graph.document_by_path(&a).unwrap();
        assert_eq!(graph.roots(), &[a_id]);
        assert_eq!(graph.include_closure(a_id).len(), 2);
    }

    #[test]
    fn test_namespace_aware_lookup() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(
                r#"{HEAD} targetNamespace="urn:a">
                     <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
                     <xs:simpleType name="Foo"><xs:restriction base="xs:string"/></xs:simpleType>
                   </xs:schema>"#
            ),
        );
        write(
            &dir,
            "b.xsd",
            &format!(
                r#"{HEAD} targetNamespace="urn:b">
                     <xs:simpleType name="Foo"><xs:restriction base="xs:int"/></xs:simpleType>
                   </xs:schema>"#
            ),
        );

        let graph = load(&[a.clone()]).unwrap();
        let from = graph.document_by_path(&a).unwrap();

        let in_a = graph.lookup(SymbolKind::Type, &QName::namespaced("urn:a", "Foo"), from);
        let in_b = graph.lookup(SymbolKind::Type, &QName::namespaced("urn:b", "Foo"), from);
        assert!(in_a.is_some());
        assert!(in_b.is_some());
        assert_ne!(in_a, in_b);

        let Some(SymbolId::Type(b_type)) = in_b else {
            panic!("expected a type");
        };
        let info = graph.model().type_def(b_type).info();
        assert_eq!(info.namespace.as_deref(), Some("urn:b"));

        assert!(graph.lookup(SymbolKind::Type, &QName::local("Foo"), from).is_none());
    }

    #[test]
    fn test_include_merges_import_does_not() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(
                r#"{HEAD} targetNamespace="urn:a">
                     <xs:include schemaLocation="common/inc.xsd"/>
                     <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
                   </xs:schema>"#
            ),
        );
        fs::create_dir(dir.path().join("common")).unwrap();
        write(
            &dir,
            "common/inc.xsd",
            &format!(r#"{HEAD} targetNamespace="urn:a"><xs:element name="Shared" type="xs:string"/></xs:schema>"#),
        );
        write(
            &dir,
            "b.xsd",
            &format!(r#"{HEAD} targetNamespace="urn:b"><xs:element name="Other" type="xs:string"/></xs:schema>"#),
        );

        let graph = load(&[a.clone()]).unwrap();
        let from = graph.document_by_path(&a).unwrap();

        assert!(graph
            .lookup(SymbolKind::Element, &QName::namespaced("urn:a", "Shared"), from)
            .is_some());
        assert!(graph
            .lookup(SymbolKind::Element, &QName::namespaced("urn:a", "Other"), from)
            .is_none());
        assert!(graph
            .lookup(SymbolKind::Element, &QName::namespaced("urn:b", "Other"), from)
            .is_some());
    }

    #[test]
    fn test_missing_include_target() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(r#"{HEAD}><xs:include schemaLocation="nowhere.xsd"/></xs:schema>"#),
        );

        let err = load(&[a]).unwrap_err();
        match err {
            Error::MissingIncludeTarget { location, .. } => assert!(location.ends_with("nowhere.xsd")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_remote_import_rejected() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(
                r#"{HEAD}><xs:import namespace="urn:x" schemaLocation="https://example.com/x.xsd"/></xs:schema>"#
            ),
        );

        assert!(matches!(load(&[a]), Err(Error::MissingIncludeTarget { .. })));
    }

    #[test]
    fn test_namespace_only_import_is_skipped() {
        let dir = TempDir::new().unwrap();
        let a = write(
            &dir,
            "a.xsd",
            &format!(r#"{HEAD}><xs:import namespace="http://www.w3.org/XML/1998/namespace"/></xs:schema>"#),
        );

        let graph = load(&[a]).unwrap();
        assert_eq!(graph.len(), 1);
    }

    #[test]
    fn test_document_limit() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.xsd", &format!(r#"{HEAD}><xs:include schemaLocation="b.xsd"/></xs:schema>"#));
        write(&dir, "b.xsd", &format!(r#"{HEAD}/>"#));

        let limits = Limits {
            max_documents: 1,
            ..Limits::default()
        };
        let err = SchemaGraph::load_roots(&[a], &limits, false).unwrap_err();
        assert!(matches!(err, Error::LimitExceeded(_)));
    }

    #[test]
    fn test_shared_root_is_loaded_once() {
        let dir = TempDir::new().unwrap();
        let a = write(&dir, "a.xsd", &format!(r#"{HEAD}><xs:include schemaLocation="b.xsd"/></xs:schema>"#));
        let b = write(&dir, "b.xsd", &format!(r#"{HEAD}/>"#));

        let graph = load(&[a, b.clone()]).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.roots().len(), 2);
        assert!(graph.roots().contains(&graph.document_by_path(&b).unwrap()));
    }
}
