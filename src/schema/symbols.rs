//! Per-document symbol tables
//!
//! Every schema document owns one [`SymbolTable`] holding the top-level
//! named declarations it defines directly, keyed by local name. The
//! document's target namespace applies to all of them, so the namespace is
//! checked by the graph lookup rather than stored in the keys.

use crate::error::{Error, Result, SymbolKind};
use indexmap::IndexMap;
use tracing::warn;

use super::model::{AttributeGroupId, AttributeId, ElementId, GroupId, TypeId};

/// Element map - local name to global element declaration
pub type ElementMap = IndexMap<String, ElementId>;
/// Attribute map - local name to global attribute declaration
pub type AttributeMap = IndexMap<String, AttributeId>;
/// Type map - local name to named simple or complex type
pub type TypeMap = IndexMap<String, TypeId>;
/// Attribute group map - local name to attribute group definition
pub type AttributeGroupMap = IndexMap<String, AttributeGroupId>;
/// Group map - local name to model group definition
pub type GroupMap = IndexMap<String, GroupId>;

/// Any registered symbol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SymbolId {
    /// Global element
    Element(ElementId),
    /// Global attribute
    Attribute(AttributeId),
    /// Named type
    Type(TypeId),
    /// Named attribute group
    AttributeGroup(AttributeGroupId),
    /// Named model group
    Group(GroupId),
}

impl SymbolId {
    /// Symbol space of this id
    pub fn kind(&self) -> SymbolKind {
        match self {
            Self::Element(_) => SymbolKind::Element,
            Self::Attribute(_) => SymbolKind::Attribute,
            Self::Type(_) => SymbolKind::Type,
            Self::AttributeGroup(_) => SymbolKind::AttributeGroup,
            Self::Group(_) => SymbolKind::Group,
        }
    }
}

/// Top-level declarations of one schema document
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    /// Path of the owning document, for diagnostics
    document: String,
    /// Keep the first definition instead of failing on duplicates
    permissive: bool,
    elements: ElementMap,
    attributes: AttributeMap,
    types: TypeMap,
    attribute_groups: AttributeGroupMap,
    groups: GroupMap,
}

impl SymbolTable {
    /// Create an empty table for the given document
    pub fn new(document: impl Into<String>, permissive: bool) -> Self {
        Self {
            document: document.into(),
            permissive,
            ..Self::default()
        }
    }

    /// Register a named definition
    ///
    /// A second definition of the same name in the same symbol space fails
    /// with [`Error::DuplicateDefinition`]; in permissive mode the first one
    /// is kept and the duplicate is logged.
    pub fn register(&mut self, name: &str, id: SymbolId) -> Result<()> {
        let inserted = match id {
            SymbolId::Element(id) => insert_new(&mut self.elements, name, id),
            SymbolId::Attribute(id) => insert_new(&mut self.attributes, name, id),
            SymbolId::Type(id) => insert_new(&mut self.types, name, id),
            SymbolId::AttributeGroup(id) => insert_new(&mut self.attribute_groups, name, id),
            SymbolId::Group(id) => insert_new(&mut self.groups, name, id),
        };
        if inserted {
            return Ok(());
        }

        if self.permissive {
            warn!(
                kind = %id.kind(),
                name,
                document = %self.document,
                "duplicate definition ignored"
            );
            Ok(())
        } else {
            Err(Error::DuplicateDefinition {
                kind: id.kind(),
                name: name.to_string(),
                document: self.document.clone(),
            })
        }
    }

    /// Look up a symbol by kind and local name
    pub fn get(&self, kind: SymbolKind, name: &str) -> Option<SymbolId> {
        match kind {
            SymbolKind::Element => self.elements.get(name).copied().map(SymbolId::Element),
            SymbolKind::Attribute => self.attributes.get(name).copied().map(SymbolId::Attribute),
            SymbolKind::Type => self.types.get(name).copied().map(SymbolId::Type),
            SymbolKind::AttributeGroup => self
                .attribute_groups
                .get(name)
                .copied()
                .map(SymbolId::AttributeGroup),
            SymbolKind::Group => self.groups.get(name).copied().map(SymbolId::Group),
        }
    }

    /// Global elements in declaration order
    pub fn elements(&self) -> impl Iterator<Item = (&String, &ElementId)> {
        self.elements.iter()
    }

    /// Named types in declaration order
    pub fn types(&self) -> impl Iterator<Item = (&String, &TypeId)> {
        self.types.iter()
    }

    /// Total number of registered symbols
    pub fn len(&self) -> usize {
        self.elements.len()
            + self.attributes.len()
            + self.types.len()
            + self.attribute_groups.len()
            + self.groups.len()
    }

    /// Check if the table is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn insert_new<V>(map: &mut IndexMap<String, V>, name: &str, value: V) -> bool {
    if map.contains_key(name) {
        return false;
    }
    map.insert(name.to_string(), value);
    true
}
