//! Reference and content resolution
//!
//! The [`Resolver`] turns the by-name references stored in the model into
//! concrete nodes and computes the derived views code generation needs:
//! the type of an element or attribute, the scalar representation of a
//! simple type, and the effective field list of a complex type.
//!
//! Every result is memoized per node and never invalidated; the graph is
//! immutable once loaded. Chains that loop back on themselves (`ref` chains,
//! derivation chains, group references) are detected with an in-progress
//! stack and reported as [`Error::CyclicReference`].

use indexmap::IndexSet;
use std::collections::HashMap;
use std::rc::Rc;
use tracing::debug;

use crate::error::{Error, Result, SymbolKind};
use crate::names::export_name;
use crate::namespaces::QName;
use crate::XSD_NAMESPACE;

use super::builtins::{BuiltinType, Primitive};
use super::graph::SchemaGraph;
use super::model::{
    AttributeGroupId, AttributeId, AttributeItem, AttributeUse, ComplexContent, Container,
    Declaration, DerivationMethod, ElementId, Facets, GroupId, Model, ModelType, Occurs, Particle,
    SimpleDerivation, Span, TypeDef, TypeId, TypeRef,
};
use super::symbols::SymbolId;

/// Field name of the synthetic text content of simple-content types
pub const TEXT_FIELD_NAME: &str = "Text";

/// What a type reference points at
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolvedType {
    /// XSD built-in type
    Builtin(BuiltinType),
    /// Named or anonymous simple type
    Simple(TypeId),
    /// Named or anonymous complex type
    Complex(TypeId),
}

impl ResolvedType {
    /// The complex type id, if this is one
    pub fn as_complex(&self) -> Option<TypeId> {
        match self {
            Self::Complex(id) => Some(*id),
            _ => None,
        }
    }
}

/// Occurrence inherited from the model groups enclosing an element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParticleContext {
    /// Some enclosing group repeats
    pub repeated: bool,
    /// Some enclosing group is a choice or may be absent
    pub optional: bool,
}

impl ParticleContext {
    /// Context for the children of a model group
    pub fn within(self, model: ModelType, occurs: Occurs) -> Self {
        Self {
            repeated: self.repeated || occurs.is_repeated(),
            optional: self.optional || occurs.is_emptiable() || model == ModelType::Choice,
        }
    }

    fn merge(self, outer: Self) -> Self {
        Self {
            repeated: self.repeated || outer.repeated,
            optional: self.optional || outer.optional,
        }
    }
}

/// One field-producing declaration of a complex type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Exported Go field name
    pub name: String,
    /// The declaration it comes from
    pub kind: MemberKind,
}

/// Source of a [`Member`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Attribute declaration or attribute ref
    Attribute(AttributeId),
    /// Element declaration or element ref, with its group context
    Element {
        /// Declaration as written in the content model
        id: ElementId,
        /// Enclosing group occurrence
        context: ParticleContext,
    },
}

/// Text content of a simple-content type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextContent {
    /// Scalar representation of the base
    pub primitive: Primitive,
    /// Facets of a simple-content restriction
    pub facets: Facets,
}

/// Effective content of a complex type
#[derive(Debug, Clone, Default)]
pub struct ContentModel {
    /// Base type embedded by complex-content extension
    pub base: Option<TypeId>,
    /// Synthetic text field of simple content
    pub text: Option<TextContent>,
    /// Attributes then elements declared at this level, deduplicated
    pub members: Vec<Member>,
    /// Every field name visible on the type, inherited ones included
    pub field_names: IndexSet<String>,
}

impl ContentModel {
    fn add(&mut self, member: Member) {
        if self.field_names.insert(member.name.clone()) {
            self.members.push(member);
        } else {
            debug!(field = %member.name, "duplicate field dropped");
        }
    }
}

/// Memoizing resolver over a loaded schema graph
#[derive(Debug)]
pub struct Resolver<'g> {
    graph: &'g SchemaGraph,
    element_targets: HashMap<ElementId, ElementId>,
    attribute_targets: HashMap<AttributeId, AttributeId>,
    element_types: HashMap<ElementId, ResolvedType>,
    attribute_types: HashMap<AttributeId, ResolvedType>,
    scalars: HashMap<TypeId, Primitive>,
    contents: HashMap<TypeId, Rc<ContentModel>>,
    attribute_groups: HashMap<AttributeGroupId, Rc<[AttributeId]>>,
    groups: HashMap<GroupId, Rc<[Member]>>,
    scalar_stack: Vec<TypeId>,
    content_stack: Vec<TypeId>,
    attribute_group_stack: Vec<AttributeGroupId>,
    group_stack: Vec<GroupId>,
}

impl<'g> Resolver<'g> {
    /// Create a resolver with empty caches
    pub fn new(graph: &'g SchemaGraph) -> Self {
        Self {
            graph,
            element_targets: HashMap::new(),
            attribute_targets: HashMap::new(),
            element_types: HashMap::new(),
            attribute_types: HashMap::new(),
            scalars: HashMap::new(),
            contents: HashMap::new(),
            attribute_groups: HashMap::new(),
            groups: HashMap::new(),
            scalar_stack: Vec::new(),
            content_stack: Vec::new(),
            attribute_group_stack: Vec::new(),
            group_stack: Vec::new(),
        }
    }

    /// The graph being resolved
    pub fn graph(&self) -> &'g SchemaGraph {
        self.graph
    }

    fn model(&self) -> &'g Model {
        self.graph.model()
    }

    fn unresolved(&self, kind: SymbolKind, name: &QName, at: &Span) -> Error {
        Error::unresolved(kind, name.to_string(), self.graph.fragment(at))
    }

    fn malformed(&self, message: impl Into<String>, at: &Span) -> Error {
        Error::malformed(message, self.graph.fragment(at))
    }

    fn classify(&self, id: TypeId) -> ResolvedType {
        match self.model().type_def(id) {
            TypeDef::Simple(_) => ResolvedType::Simple(id),
            TypeDef::Complex(_) => ResolvedType::Complex(id),
        }
    }

    /// Resolve a type name as seen from the document of `at`
    ///
    /// Names in the XSD namespace map straight to built-in types.
    pub fn resolve_type_name(&self, name: &QName, at: &Span) -> Result<ResolvedType> {
        if name.in_namespace(Some(XSD_NAMESPACE)) {
            return BuiltinType::lookup(&name.local_name)
                .map(ResolvedType::Builtin)
                .ok_or_else(|| self.unresolved(SymbolKind::Type, name, at));
        }
        match self.graph.lookup(SymbolKind::Type, name, at.doc) {
            Some(SymbolId::Type(id)) => Ok(self.classify(id)),
            _ => Err(self.unresolved(SymbolKind::Type, name, at)),
        }
    }

    /// Resolve a named or inline type reference
    pub fn resolve_type_ref(&self, ty: &TypeRef, at: &Span) -> Result<ResolvedType> {
        match ty {
            TypeRef::Named(name) => self.resolve_type_name(name, at),
            TypeRef::Inline(id) => Ok(self.classify(*id)),
        }
    }

    /// Follow an element's `ref` chain to the declaration carrying name and type
    pub fn element_target(&mut self, id: ElementId) -> Result<ElementId> {
        if let Some(&target) = self.element_targets.get(&id) {
            return Ok(target);
        }

        let model = self.model();
        let mut chain = vec![id];
        let mut current = id;
        while let Declaration::Ref(name) = &model.element(current).decl {
            let at = &model.element(current).span;
            let next = match self.graph.lookup(SymbolKind::Element, name, at.doc) {
                Some(SymbolId::Element(next)) => next,
                _ => return Err(self.unresolved(SymbolKind::Element, name, at)),
            };
            let looped = chain.contains(&next);
            chain.push(next);
            if looped {
                let names: Vec<String> = chain
                    .iter()
                    .map(|e| declaration_label(&model.element(*e).decl))
                    .collect();
                return Err(Error::cyclic(SymbolKind::Element, &names));
            }
            current = next;
        }

        self.element_targets.insert(id, current);
        Ok(current)
    }

    /// Follow an attribute's `ref` chain to the declaration carrying name and type
    pub fn attribute_target(&mut self, id: AttributeId) -> Result<AttributeId> {
        if let Some(&target) = self.attribute_targets.get(&id) {
            return Ok(target);
        }

        let model = self.model();
        let mut chain = vec![id];
        let mut current = id;
        while let Declaration::Ref(name) = &model.attribute(current).decl {
            let at = &model.attribute(current).span;
            let next = match self.graph.lookup(SymbolKind::Attribute, name, at.doc) {
                Some(SymbolId::Attribute(next)) => next,
                _ => return Err(self.unresolved(SymbolKind::Attribute, name, at)),
            };
            let looped = chain.contains(&next);
            chain.push(next);
            if looped {
                let names: Vec<String> = chain
                    .iter()
                    .map(|a| declaration_label(&model.attribute(*a).decl))
                    .collect();
                return Err(Error::cyclic(SymbolKind::Attribute, &names));
            }
            current = next;
        }

        self.attribute_targets.insert(id, current);
        Ok(current)
    }

    /// Type of an element, after following `ref`s; untyped elements are `anyType`
    pub fn element_type(&mut self, id: ElementId) -> Result<ResolvedType> {
        if let Some(&ty) = self.element_types.get(&id) {
            return Ok(ty);
        }
        let target_id = self.element_target(id)?;
        let target = self.model().element(target_id);
        let ty = self.declared_type(&target.decl, &target.span)?;
        self.element_types.insert(id, ty);
        Ok(ty)
    }

    /// Type of an attribute, after following `ref`s; untyped attributes are `anyType`
    pub fn attribute_type(&mut self, id: AttributeId) -> Result<ResolvedType> {
        if let Some(&ty) = self.attribute_types.get(&id) {
            return Ok(ty);
        }
        let target_id = self.attribute_target(id)?;
        let target = self.model().attribute(target_id);
        let ty = self.declared_type(&target.decl, &target.span)?;
        self.attribute_types.insert(id, ty);
        Ok(ty)
    }

    fn declared_type(&self, decl: &Declaration, at: &Span) -> Result<ResolvedType> {
        match decl {
            Declaration::Named { ty: Some(ty), .. } => self.resolve_type_ref(ty, at),
            Declaration::Named { ty: None, .. } => Ok(ResolvedType::Builtin(BuiltinType::any_type())),
            Declaration::Ref(name) => Err(self.malformed(format!("unfollowed reference to '{}'", name), at)),
        }
    }

    /// XML local name of an element, after following `ref`s
    pub fn element_name(&mut self, id: ElementId) -> Result<&'g str> {
        let target_id = self.element_target(id)?;
        let target = self.model().element(target_id);
        declared_name(&target.decl).ok_or_else(|| self.malformed("element has no name", &target.span))
    }

    /// XML local name of an attribute, after following `ref`s
    pub fn attribute_name(&mut self, id: AttributeId) -> Result<&'g str> {
        let target_id = self.attribute_target(id)?;
        let target = self.model().attribute(target_id);
        declared_name(&target.decl).ok_or_else(|| self.malformed("attribute has no name", &target.span))
    }

    /// Scalar representation of a type
    ///
    /// Restrictions take their base's scalar, lists are text, unions take
    /// the members' common scalar or text when they differ, and complex
    /// types with simple content take their base's scalar.
    pub fn scalar_of(&mut self, ty: ResolvedType) -> Result<Primitive> {
        let id = match ty {
            ResolvedType::Builtin(builtin) => return Ok(builtin.primitive),
            ResolvedType::Simple(id) | ResolvedType::Complex(id) => id,
        };
        if let Some(&primitive) = self.scalars.get(&id) {
            return Ok(primitive);
        }
        if self.scalar_stack.contains(&id) {
            return Err(self.type_cycle(&self.scalar_stack, id));
        }

        self.scalar_stack.push(id);
        let result = self.compute_scalar(id);
        self.scalar_stack.pop();

        let primitive = result?;
        self.scalars.insert(id, primitive);
        Ok(primitive)
    }

    fn compute_scalar(&mut self, id: TypeId) -> Result<Primitive> {
        match self.model().type_def(id) {
            TypeDef::Simple(simple) => match &simple.derivation {
                SimpleDerivation::Restriction { base, .. } => {
                    let base = self.resolve_type_ref(base, &simple.info.span)?;
                    self.scalar_of(base)
                }
                SimpleDerivation::List { item } => {
                    // validate the item type even though lists are text
                    self.resolve_type_ref(item, &simple.info.span)?;
                    Ok(Primitive::String)
                }
                SimpleDerivation::Union { members } => {
                    let mut common = None;
                    for member in members {
                        let member = self.resolve_type_ref(member, &simple.info.span)?;
                        let primitive = self.scalar_of(member)?;
                        common = match common {
                            None => Some(primitive),
                            Some(c) if c == primitive => Some(c),
                            Some(_) => Some(Primitive::String),
                        };
                    }
                    Ok(common.unwrap_or(Primitive::String))
                }
            },
            TypeDef::Complex(complex) => match &complex.content {
                ComplexContent::Simple(derivation) => {
                    let base = match (derivation.method, derivation.inline_simple) {
                        (DerivationMethod::Restriction, Some(inline)) => self.classify(inline),
                        _ => self.resolve_type_name(&derivation.base, &derivation.span)?,
                    };
                    self.scalar_of(base)
                }
                _ if complex.mixed => Ok(Primitive::String),
                _ => Err(self.malformed(
                    format!("type '{}' has no simple content", complex.info.display_name()),
                    &complex.info.span,
                )),
            },
        }
    }

    fn type_cycle(&self, stack: &[TypeId], repeated: TypeId) -> Error {
        let model = self.model();
        let start = stack.iter().position(|t| *t == repeated).unwrap_or(0);
        let names: Vec<String> = stack[start..]
            .iter()
            .chain(std::iter::once(&repeated))
            .map(|t| model.type_def(*t).info().display_name())
            .collect();
        Error::cyclic(SymbolKind::Type, &names)
    }

    /// Facets of a simple type restriction, when it declares any
    pub fn facets_of(&self, ty: ResolvedType) -> Option<&'g Facets> {
        let ResolvedType::Simple(id) = ty else {
            return None;
        };
        match self.model().type_def(id) {
            TypeDef::Simple(simple) => match &simple.derivation {
                SimpleDerivation::Restriction { facets, .. } if !facets.is_empty() => Some(facets),
                _ => None,
            },
            TypeDef::Complex(_) => None,
        }
    }

    /// Effective content of a complex type
    ///
    /// - direct container: own attributes, then own elements
    /// - simple content: a text field of the base's scalar, the members of a
    ///   complex base, then own members
    /// - complex-content extension: the base embedded, then own members
    /// - complex-content restriction: own members only
    ///
    /// Members whose field name is already taken (by the text field, the
    /// embedded base chain or an earlier member) are dropped; the first one
    /// wins.
    pub fn complex_content(&mut self, id: TypeId) -> Result<Rc<ContentModel>> {
        if let Some(content) = self.contents.get(&id) {
            return Ok(Rc::clone(content));
        }
        if self.content_stack.contains(&id) {
            return Err(self.type_cycle(&self.content_stack, id));
        }

        self.content_stack.push(id);
        let result = self.build_content(id);
        self.content_stack.pop();

        let content = Rc::new(result?);
        self.contents.insert(id, Rc::clone(&content));
        Ok(content)
    }

    fn build_content(&mut self, id: TypeId) -> Result<ContentModel> {
        let complex = match self.model().type_def(id) {
            TypeDef::Complex(complex) => complex,
            TypeDef::Simple(simple) => {
                return Err(self.malformed(
                    format!("'{}' is not a complex type", simple.info.display_name()),
                    &simple.info.span,
                ))
            }
        };

        let mut content = ContentModel::default();
        match &complex.content {
            ComplexContent::Direct(container) => {
                self.add_container(&mut content, container)?;
            }
            ComplexContent::Simple(derivation) => {
                let primitive = self.scalar_of(ResolvedType::Complex(id))?;
                content.text = Some(TextContent {
                    primitive,
                    facets: derivation.facets.clone(),
                });
                content.field_names.insert(TEXT_FIELD_NAME.to_string());
                // attributes of a simple-content base are flattened, not embedded
                if let ResolvedType::Complex(base_id) = self.resolve_type_name(&derivation.base, &derivation.span)? {
                    let inherited = self.complex_content(base_id)?;
                    for member in &inherited.members {
                        content.add(member.clone());
                    }
                }
                self.add_container(&mut content, &derivation.container)?;
            }
            ComplexContent::Complex(derivation) => {
                let base = self.resolve_type_name(&derivation.base, &derivation.span)?;
                if derivation.method == DerivationMethod::Extension {
                    match base {
                        ResolvedType::Complex(base_id) => {
                            let inherited = self.complex_content(base_id)?;
                            content.field_names = inherited.field_names.clone();
                            content.base = Some(base_id);
                        }
                        ResolvedType::Builtin(builtin) if builtin == BuiltinType::any_type() => {}
                        _ => {
                            return Err(self.malformed(
                                format!("complexContent extends non-complex type '{}'", derivation.base),
                                &derivation.span,
                            ))
                        }
                    }
                }
                self.add_container(&mut content, &derivation.container)?;
            }
        }
        Ok(content)
    }

    fn add_container(&mut self, content: &mut ContentModel, container: &Container) -> Result<()> {
        let model = self.model();
        for id in self.expand_attributes(&container.attributes)? {
            if model.attribute(id).usage == AttributeUse::Prohibited {
                continue;
            }
            let name = export_name(self.attribute_name(id)?);
            content.add(Member {
                name,
                kind: MemberKind::Attribute(id),
            });
        }
        if let Some(particle) = &container.particle {
            for member in self.expand_particle(particle, ParticleContext::default())? {
                content.add(member);
            }
        }
        Ok(())
    }

    fn expand_attributes(&mut self, items: &[AttributeItem]) -> Result<Vec<AttributeId>> {
        let mut out = Vec::new();
        for item in items {
            match item {
                AttributeItem::Attribute(id) => out.push(*id),
                AttributeItem::GroupRef { name, span } => {
                    let group = match self.graph.lookup(SymbolKind::AttributeGroup, name, span.doc) {
                        Some(SymbolId::AttributeGroup(group)) => group,
                        _ => return Err(self.unresolved(SymbolKind::AttributeGroup, name, span)),
                    };
                    out.extend(self.expand_attribute_group(group)?.iter().copied());
                }
            }
        }
        Ok(out)
    }

    /// Attributes of a named attribute group, nested group refs inlined
    pub fn expand_attribute_group(&mut self, id: AttributeGroupId) -> Result<Rc<[AttributeId]>> {
        if let Some(attributes) = self.attribute_groups.get(&id) {
            return Ok(Rc::clone(attributes));
        }
        let model = self.model();
        if let Some(start) = self.attribute_group_stack.iter().position(|g| *g == id) {
            let names: Vec<&str> = self.attribute_group_stack[start..]
                .iter()
                .chain(std::iter::once(&id))
                .map(|g| model.attribute_group(*g).name.as_str())
                .collect();
            return Err(Error::cyclic(SymbolKind::AttributeGroup, &names));
        }

        self.attribute_group_stack.push(id);
        let result = self.expand_attributes(&model.attribute_group(id).attributes);
        self.attribute_group_stack.pop();

        let attributes: Rc<[AttributeId]> = result?.into();
        self.attribute_groups.insert(id, Rc::clone(&attributes));
        Ok(attributes)
    }

    fn expand_particle(&mut self, particle: &Particle, context: ParticleContext) -> Result<Vec<Member>> {
        match particle {
            Particle::Element(id) => {
                let name = export_name(self.element_name(*id)?);
                Ok(vec![Member {
                    name,
                    kind: MemberKind::Element { id: *id, context },
                }])
            }
            Particle::Model(group) => {
                let inner = context.within(group.model, group.occurs);
                let mut members = Vec::new();
                for particle in &group.particles {
                    members.extend(self.expand_particle(particle, inner)?);
                }
                Ok(members)
            }
            Particle::GroupRef { name, occurs, span } => {
                let group = match self.graph.lookup(SymbolKind::Group, name, span.doc) {
                    Some(SymbolId::Group(group)) => group,
                    _ => return Err(self.unresolved(SymbolKind::Group, name, span)),
                };
                let outer = context.within(ModelType::Sequence, *occurs);
                Ok(self
                    .expand_group(group)?
                    .iter()
                    .map(|member| match member.kind {
                        MemberKind::Element { id, context } => Member {
                            name: member.name.clone(),
                            kind: MemberKind::Element {
                                id,
                                context: context.merge(outer),
                            },
                        },
                        MemberKind::Attribute(_) => member.clone(),
                    })
                    .collect())
            }
        }
    }

    /// Element members of a named model group, nested group refs inlined
    pub fn expand_group(&mut self, id: GroupId) -> Result<Rc<[Member]>> {
        if let Some(members) = self.groups.get(&id) {
            return Ok(Rc::clone(members));
        }
        let model = self.model();
        if let Some(start) = self.group_stack.iter().position(|g| *g == id) {
            let names: Vec<&str> = self.group_stack[start..]
                .iter()
                .chain(std::iter::once(&id))
                .map(|g| model.group(*g).name.as_str())
                .collect();
            return Err(Error::cyclic(SymbolKind::Group, &names));
        }

        self.group_stack.push(id);
        let result = match &model.group(id).particle {
            Some(particle) => self.expand_particle(particle, ParticleContext::default()),
            None => Ok(Vec::new()),
        };
        self.group_stack.pop();

        let members: Rc<[Member]> = result?.into();
        self.groups.insert(id, Rc::clone(&members));
        Ok(members)
    }
}

fn declared_name(decl: &Declaration) -> Option<&str> {
    match decl {
        Declaration::Named { name, .. } => Some(name),
        Declaration::Ref(_) => None,
    }
}

fn declaration_label(decl: &Declaration) -> String {
    match decl {
        Declaration::Named { name, .. } => name.clone(),
        Declaration::Ref(target) => format!("ref {}", target),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::limits::Limits;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const NS: &str = "urn:t";

    fn load(body: &str) -> (TempDir, SchemaGraph) {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("t.xsd");
        fs::write(
            &path,
            format!(
                r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:t="{NS}" targetNamespace="{NS}">{body}</xs:schema>"#
            ),
        )
        .unwrap();
        let graph = SchemaGraph::load_roots(&[PathBuf::from(&path)], &Limits::default(), false).unwrap();
        (dir, graph)
    }

    fn type_id(graph: &SchemaGraph, name: &str) -> TypeId {
        let from = graph.roots()[0];
        match graph.lookup(SymbolKind::Type, &QName::namespaced(NS, name), from) {
            Some(SymbolId::Type(id)) => id,
            other => panic!("type {name} not found: {other:?}"),
        }
    }

    fn element_id(graph: &SchemaGraph, name: &str) -> ElementId {
        let from = graph.roots()[0];
        match graph.lookup(SymbolKind::Element, &QName::namespaced(NS, name), from) {
            Some(SymbolId::Element(id)) => id,
            other => panic!("element {name} not found: {other:?}"),
        }
    }

    fn names(content: &ContentModel) -> Vec<&str> {
        content.members.iter().map(|m| m.name.as_str()).collect()
    }

    #[test]
    fn test_builtin_integer_collapse() {
        let (_dir, graph) = load(
            r#"<xs:element name="a" type="xs:int"/><xs:element name="b" type="xs:long"/>
               <xs:element name="c" type="xs:short"/><xs:element name="d" type="xs:integer"/>"#,
        );
        let mut resolver = Resolver::new(&graph);
        for name in ["a", "b", "c", "d"] {
            let ty = resolver.element_type(element_id(&graph, name)).unwrap();
            assert_eq!(resolver.scalar_of(ty).unwrap(), Primitive::Integer);
        }
    }

    #[test]
    fn test_unknown_builtin_is_unresolved() {
        let (_dir, graph) = load(r#"<xs:element name="a" type="xs:nope"/>"#);
        let mut resolver = Resolver::new(&graph);
        let err = resolver.element_type(element_id(&graph, "a")).unwrap_err();
        match err {
            Error::UnresolvedReference { kind, name, fragment } => {
                assert_eq!(kind, SymbolKind::Type);
                assert_eq!(name, "{http://www.w3.org/2001/XMLSchema}nope");
                assert_eq!(fragment, r#"<xs:element name="a" type="xs:nope"/>"#);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_forward_reference_and_untyped() {
        let (_dir, graph) = load(
            r#"<xs:element name="a" type="t:Later"/><xs:element name="b"/>
               <xs:simpleType name="Later"><xs:restriction base="xs:boolean"/></xs:simpleType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let a = resolver.element_type(element_id(&graph, "a")).unwrap();
        assert_eq!(resolver.scalar_of(a).unwrap(), Primitive::Boolean);
        let b = resolver.element_type(element_id(&graph, "b")).unwrap();
        assert_eq!(b, ResolvedType::Builtin(BuiltinType::any_type()));
    }

    #[test]
    fn test_simple_type_mapping() {
        let (_dir, graph) = load(
            r#"<xs:simpleType name="Base"><xs:restriction base="xs:decimal"/></xs:simpleType>
               <xs:simpleType name="Derived"><xs:restriction base="t:Base"><xs:maxInclusive value="10"/></xs:restriction></xs:simpleType>
               <xs:simpleType name="Ints"><xs:list itemType="xs:int"/></xs:simpleType>
               <xs:simpleType name="Same"><xs:union memberTypes="xs:int xs:long"/></xs:simpleType>
               <xs:simpleType name="Mixed"><xs:union memberTypes="xs:int xs:string"/></xs:simpleType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let mut scalar = |name: &str| {
            let id = type_id(&graph, name);
            resolver.scalar_of(ResolvedType::Simple(id)).unwrap()
        };
        assert_eq!(scalar("Derived"), Primitive::Decimal);
        assert_eq!(scalar("Ints"), Primitive::String);
        assert_eq!(scalar("Same"), Primitive::Integer);
        assert_eq!(scalar("Mixed"), Primitive::String);
    }

    #[test]
    fn test_direct_content_order_and_dedupe() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="T">
                 <xs:sequence>
                   <xs:element name="name" type="xs:string"/>
                   <xs:element name="name" type="xs:int"/>
                   <xs:element name="code" type="xs:string"/>
                 </xs:sequence>
                 <xs:attribute name="id" type="xs:string"/>
                 <xs:attribute name="gone" type="xs:string" use="prohibited"/>
               </xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let content = resolver.complex_content(type_id(&graph, "T")).unwrap();
        assert_eq!(names(&content), vec!["Id", "Name", "Code"]);

        let MemberKind::Element { id, .. } = content.members[1].kind else {
            panic!("expected element member");
        };
        let ty = resolver.element_type(id).unwrap();
        assert_eq!(resolver.scalar_of(ty).unwrap(), Primitive::String);
    }

    #[test]
    fn test_extension_embeds_base() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="Base"><xs:sequence>
                 <xs:element name="id" type="xs:string"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Derived"><xs:complexContent>
                 <xs:extension base="t:Base"><xs:sequence>
                   <xs:element name="id" type="xs:int"/>
                   <xs:element name="extra" type="xs:int"/>
                 </xs:sequence></xs:extension>
               </xs:complexContent></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let base = type_id(&graph, "Base");
        let content = resolver.complex_content(type_id(&graph, "Derived")).unwrap();

        assert_eq!(content.base, Some(base));
        assert_eq!(names(&content), vec!["Extra"]);
        assert!(content.field_names.contains("Id"));
    }

    #[test]
    fn test_restriction_drops_base() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="Base"><xs:sequence>
                 <xs:element name="a" type="xs:string"/>
                 <xs:element name="b" type="xs:string" minOccurs="0"/>
               </xs:sequence></xs:complexType>
               <xs:complexType name="Narrow"><xs:complexContent>
                 <xs:restriction base="t:Base"><xs:sequence>
                   <xs:element name="a" type="xs:string"/>
                 </xs:sequence></xs:restriction>
               </xs:complexContent></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let content = resolver.complex_content(type_id(&graph, "Narrow")).unwrap();
        assert_eq!(content.base, None);
        assert_eq!(names(&content), vec!["A"]);
    }

    #[test]
    fn test_simple_content_text_field() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="Price"><xs:simpleContent>
                 <xs:extension base="xs:decimal">
                   <xs:attribute name="currency" type="xs:string"/>
                 </xs:extension>
               </xs:simpleContent></xs:complexType>
               <xs:complexType name="Euro"><xs:simpleContent>
                 <xs:restriction base="t:Price"><xs:maxInclusive value="100"/></xs:restriction>
               </xs:simpleContent></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let price = resolver.complex_content(type_id(&graph, "Price")).unwrap();
        assert_eq!(price.text.as_ref().unwrap().primitive, Primitive::Decimal);
        assert_eq!(names(&price), vec!["Currency"]);

        let euro = resolver.complex_content(type_id(&graph, "Euro")).unwrap();
        let text = euro.text.as_ref().unwrap();
        assert_eq!(text.primitive, Primitive::Decimal);
        assert_eq!(text.facets.max_inclusive.as_deref(), Some("100"));
        assert_eq!(euro.base, None);
        assert_eq!(names(&euro), vec!["Currency"]);
    }

    #[test]
    fn test_groups_and_particle_context() {
        let (_dir, graph) = load(
            r#"<xs:attributeGroup name="common"><xs:attribute name="lang" type="xs:string"/></xs:attributeGroup>
               <xs:group name="lines"><xs:sequence><xs:element name="line" type="xs:string"/></xs:sequence></xs:group>
               <xs:complexType name="T">
                 <xs:sequence>
                   <xs:group ref="t:lines" maxOccurs="unbounded"/>
                   <xs:choice><xs:element name="a" type="xs:int"/><xs:element name="b" type="xs:int"/></xs:choice>
                 </xs:sequence>
                 <xs:attributeGroup ref="t:common"/>
               </xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let content = resolver.complex_content(type_id(&graph, "T")).unwrap();
        assert_eq!(names(&content), vec!["Lang", "Line", "A", "B"]);

        let context = |i: usize| match content.members[i].kind {
            MemberKind::Element { context, .. } => context,
            MemberKind::Attribute(_) => panic!("expected element"),
        };
        assert!(context(1).repeated);
        assert!(!context(1).optional);
        assert!(context(2).optional);
        assert!(!context(2).repeated);
    }

    #[test]
    fn test_element_ref_forwards_name_and_type() {
        let (_dir, graph) = load(
            r#"<xs:element name="Note" type="xs:string"/>
               <xs:complexType name="T"><xs:sequence>
                 <xs:element ref="t:Note" maxOccurs="3"/>
               </xs:sequence></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let content = resolver.complex_content(type_id(&graph, "T")).unwrap();
        assert_eq!(names(&content), vec!["Note"]);

        let MemberKind::Element { id, .. } = content.members[0].kind else {
            panic!("expected element member");
        };
        assert_eq!(resolver.element_target(id).unwrap(), element_id(&graph, "Note"));
        assert!(graph.model().element(id).occurs.is_repeated());
    }

    #[test]
    fn test_cyclic_extension() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="A"><xs:complexContent><xs:extension base="t:B"/></xs:complexContent></xs:complexType>
               <xs:complexType name="B"><xs:complexContent><xs:extension base="t:A"/></xs:complexContent></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let err = resolver.complex_content(type_id(&graph, "A")).unwrap_err();
        match err {
            Error::CyclicReference { kind, chain } => {
                assert_eq!(kind, SymbolKind::Type);
                assert_eq!(chain, "A -> B -> A");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_cyclic_group() {
        let (_dir, graph) = load(
            r#"<xs:group name="g"><xs:sequence><xs:group ref="t:h"/></xs:sequence></xs:group>
               <xs:group name="h"><xs:sequence><xs:group ref="t:g"/></xs:sequence></xs:group>
               <xs:complexType name="T"><xs:group ref="t:g"/></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let err = resolver.complex_content(type_id(&graph, "T")).unwrap_err();
        assert!(matches!(err, Error::CyclicReference { kind: SymbolKind::Group, .. }));
    }

    #[test]
    fn test_cyclic_element_ref() {
        let (_dir, graph) = load(
            r#"<xs:element name="a" ref="t:b"/>
               <xs:element name="b" ref="t:a"/>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let err = resolver.element_target(element_id(&graph, "a")).unwrap_err();
        match err {
            Error::CyclicReference { kind, chain } => {
                assert_eq!(kind, SymbolKind::Element);
                assert_eq!(chain, "ref {urn:t}b -> ref {urn:t}a -> ref {urn:t}b");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(resolver.element_type(element_id(&graph, "b")).is_err());
    }

    #[test]
    fn test_cyclic_attribute_ref() {
        let (_dir, graph) = load(
            r#"<xs:attribute name="x" ref="t:y"/>
               <xs:attribute name="y" ref="t:x"/>
               <xs:complexType name="T"><xs:attribute ref="t:x"/></xs:complexType>"#,
        );
        let from = graph.roots()[0];
        let Some(SymbolId::Attribute(x)) = graph.lookup(SymbolKind::Attribute, &QName::namespaced(NS, "x"), from) else {
            panic!("attribute x not found");
        };
        let mut resolver = Resolver::new(&graph);
        match resolver.attribute_target(x).unwrap_err() {
            Error::CyclicReference { kind, chain } => {
                assert_eq!(kind, SymbolKind::Attribute);
                assert_eq!(chain, "ref {urn:t}y -> ref {urn:t}x -> ref {urn:t}y");
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = resolver.complex_content(type_id(&graph, "T")).unwrap_err();
        assert!(matches!(err, Error::CyclicReference { kind: SymbolKind::Attribute, .. }));
    }

    #[test]
    fn test_cyclic_simple_type_restriction() {
        let (_dir, graph) = load(
            r#"<xs:simpleType name="S"><xs:restriction base="t:U"/></xs:simpleType>
               <xs:simpleType name="U"><xs:restriction base="t:S"/></xs:simpleType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let err = resolver
            .scalar_of(ResolvedType::Simple(type_id(&graph, "S")))
            .unwrap_err();
        match err {
            Error::CyclicReference { kind, chain } => {
                assert_eq!(kind, SymbolKind::Type);
                assert_eq!(chain, "S -> U -> S");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_attribute_group_self_reference() {
        let (_dir, graph) = load(
            r#"<xs:attributeGroup name="g">
                 <xs:attribute name="id" type="xs:string"/>
                 <xs:attributeGroup ref="t:g"/>
               </xs:attributeGroup>"#,
        );
        let from = graph.roots()[0];
        let Some(SymbolId::AttributeGroup(g)) =
            graph.lookup(SymbolKind::AttributeGroup, &QName::namespaced(NS, "g"), from)
        else {
            panic!("attribute group g not found");
        };
        let mut resolver = Resolver::new(&graph);
        match resolver.expand_attribute_group(g).unwrap_err() {
            Error::CyclicReference { kind, chain } => {
                assert_eq!(kind, SymbolKind::AttributeGroup);
                assert_eq!(chain, "g -> g");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_self_referential_type_is_not_a_cycle() {
        let (_dir, graph) = load(
            r#"<xs:complexType name="Node"><xs:sequence>
                 <xs:element name="child" type="t:Node" minOccurs="0" maxOccurs="unbounded"/>
               </xs:sequence></xs:complexType>"#,
        );
        let mut resolver = Resolver::new(&graph);
        let node = type_id(&graph, "Node");
        let content = resolver.complex_content(node).unwrap();
        let MemberKind::Element { id, .. } = content.members[0].kind else {
            panic!("expected element member");
        };
        assert_eq!(resolver.element_type(id).unwrap(), ResolvedType::Complex(node));
    }

    #[test]
    fn test_unresolved_attribute_group() {
        let (_dir, graph) = load(r#"<xs:complexType name="T"><xs:attributeGroup ref="t:missing"/></xs:complexType>"#);
        let mut resolver = Resolver::new(&graph);
        let err = resolver.complex_content(type_id(&graph, "T")).unwrap_err();
        assert!(matches!(
            err,
            Error::UnresolvedReference {
                kind: SymbolKind::AttributeGroup,
                ..
            }
        ));
    }
}
