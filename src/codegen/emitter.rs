//! Struct emission
//!
//! The [`Emitter`] writes one Go file per complex type, then walks on to
//! every complex type the struct refers to. Which structs were already
//! written is tracked in an explicit [`EmitContext`], keyed by package and
//! struct name, so each name is emitted at most once per run no matter how
//! many paths (or cycles) lead to it. File names are claimed the same way;
//! struct names that differ only in case get a numbered file.

use indexmap::IndexMap;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

use crate::config::GeneratorConfig;
use crate::error::Result;
use crate::names::file_name_for;
use crate::schema::graph::SchemaGraph;
use crate::schema::model::{ElementId, TypeDef, TypeId};
use crate::schema::resolver::{MemberKind, ResolvedType, Resolver};

use super::fields::{FieldProjector, TypeNaming};
use super::output::OutputSink;
use super::render::StructFile;

/// A struct written during a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmittedStruct {
    /// Go package
    pub package: String,
    /// Struct name
    pub name: String,
    /// File name inside the package directory
    pub file: String,
    /// Target namespace of the schema type
    pub namespace: Option<String>,
}

/// Emission state of one run
#[derive(Debug, Default)]
pub struct EmitContext {
    /// (package, struct name) to the type that claimed it
    emitted: IndexMap<(String, String), TypeId>,
    /// (package, file name) pairs already written
    files: HashSet<(String, String)>,
    structs: Vec<EmittedStruct>,
}

impl EmitContext {
    /// Create an empty context
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a struct name was already emitted in a package
    pub fn is_emitted(&self, package: &str, name: &str) -> bool {
        self.emitted
            .contains_key(&(package.to_string(), name.to_string()))
    }

    /// Structs written so far, in emission order
    pub fn structs(&self) -> &[EmittedStruct] {
        &self.structs
    }

    /// Consume the context, returning the written structs
    pub fn into_structs(self) -> Vec<EmittedStruct> {
        self.structs
    }

    /// Reserve a file name for a struct, numbering it if the name is taken
    fn claim_file(&mut self, package: &str, struct_name: &str) -> String {
        let preferred = file_name_for(struct_name);
        let stem = preferred.trim_end_matches(".go");
        let mut file_name = preferred.clone();
        let mut n = 2;
        while !self.files.insert((package.to_string(), file_name.clone())) {
            file_name = format!("{}_{}.go", stem, n);
            n += 1;
        }
        if file_name != preferred {
            warn!(
                package = %package,
                name = %struct_name,
                file = %file_name,
                "file name already taken by another struct, numbering it"
            );
        }
        file_name
    }
}

/// Writes Go structs for complex types
pub struct Emitter<'a, 'g> {
    resolver: Resolver<'g>,
    config: &'a GeneratorConfig,
    sink: &'a mut dyn OutputSink,
}

impl<'a, 'g> Emitter<'a, 'g> {
    /// Create an emitter over a loaded graph
    pub fn new(graph: &'g SchemaGraph, config: &'a GeneratorConfig, sink: &'a mut dyn OutputSink) -> Self {
        Self {
            resolver: Resolver::new(graph),
            config,
            sink,
        }
    }

    /// Emit a complex type and, depth-first, every complex type it refers to
    ///
    /// Types whose (package, name) is already in `ctx` are skipped.
    pub fn emit(&mut self, ctx: &mut EmitContext, id: TypeId) -> Result<()> {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let referenced = self.emit_one(ctx, id)?;
            stack.extend(referenced.into_iter().rev());
        }
        Ok(())
    }

    /// Emit the exported symbols of the graph
    ///
    /// In recursive mode that is every global element and every named
    /// complex type of every loaded document. Otherwise it is the global
    /// elements of the root documents (and the documents they include),
    /// plus whatever those reach.
    pub fn emit_roots(&mut self, ctx: &mut EmitContext) -> Result<()> {
        let graph = self.resolver.graph();

        if self.config.recursive {
            for (_, doc) in graph.documents() {
                for (_, &element) in doc.symbols.elements() {
                    self.emit_element(ctx, element)?;
                }
                for (_, &ty) in doc.symbols.types() {
                    if let TypeDef::Complex(_) = graph.model().type_def(ty) {
                        self.emit(ctx, ty)?;
                    }
                }
            }
        } else {
            for &root in graph.roots() {
                for doc in graph.include_closure(root) {
                    for (_, &element) in graph.document(doc).symbols.elements() {
                        self.emit_element(ctx, element)?;
                    }
                }
            }
        }
        Ok(())
    }

    fn emit_element(&mut self, ctx: &mut EmitContext, element: ElementId) -> Result<()> {
        match self.resolver.element_type(element)? {
            ResolvedType::Complex(id) => self.emit(ctx, id),
            _ => {
                debug!(element = ?element, "element has a simple type, nothing to emit");
                Ok(())
            }
        }
    }

    /// Write one struct; returns the complex types it refers to
    fn emit_one(&mut self, ctx: &mut EmitContext, id: TypeId) -> Result<Vec<TypeId>> {
        let graph = self.resolver.graph();
        let naming = TypeNaming::new(self.config, graph.model());
        let package = naming.package(id);
        let name = naming.struct_name(id);

        let key = (package.clone(), name.clone());
        if let Some(&owner) = ctx.emitted.get(&key) {
            if owner != id {
                warn!(
                    package = %package,
                    name = %name,
                    "struct name already taken by another type, keeping the first"
                );
            }
            return Ok(Vec::new());
        }
        // claimed before walking on, so cycles end here
        ctx.emitted.insert(key, id);

        let content = self.resolver.complex_content(id)?;
        let mut referenced = Vec::new();

        let base = content.base.map(|base| {
            referenced.push(base);
            naming.go_type(base, &package)
        });

        let mut fields = Vec::new();
        {
            let mut projector = FieldProjector::new(&mut self.resolver, naming, &package);
            if let Some(text) = &content.text {
                fields.push(projector.chardata(text));
            }
            for member in &content.members {
                let field = match member.kind {
                    MemberKind::Attribute(attribute) => projector.project_attribute(attribute, &member.name)?,
                    MemberKind::Element { id, context } => projector.project_element(id, context, &member.name)?,
                };
                referenced.extend(field.referenced);
                fields.push(field);
            }
        }

        let mut imports = BTreeMap::new();
        for go_type in base.iter().chain(fields.iter().map(|f| &f.go_type)) {
            if let Some(foreign) = &go_type.package {
                imports.insert(foreign.clone(), self.config.import_path(foreign));
            }
        }

        let info = graph.model().type_def(id).info();
        let file = StructFile {
            package,
            imports,
            name,
            documentation: info.documentation.clone(),
            base,
            fields,
        };
        let file_name = ctx.claim_file(&file.package, &file.name);
        self.sink.write_file(&file.package, &file_name, &file.render())?;
        debug!(package = %file.package, name = %file.name, "emitted struct");

        ctx.structs.push(EmittedStruct {
            package: file.package,
            name: file.name,
            file: file_name,
            namespace: info.namespace.clone(),
        });
        Ok(referenced)
    }
}
