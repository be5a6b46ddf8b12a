//! Schema type model
//!
//! All schema components live in one arena ([`Model`]) and refer to each
//! other by index. Cross-references that have to be looked up in the
//! symbol tables (`type`, `ref`, `base`, `itemType`, ...) are stored as
//! already namespace-resolved [`QName`]s and only turned into ids by the
//! resolver, so a reference may point at a definition that appears later in
//! the file or in another document.
//!
//! Nodes are built once by the parser and never modified afterwards.

use crate::namespaces::QName;
use std::fmt;
use std::ops::Range;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position in the owning arena
            pub fn index(&self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Index of a schema document in the graph
    DocId
);
arena_id!(
    /// Index of a simple or complex type definition
    TypeId
);
arena_id!(
    /// Index of an element declaration (global or local)
    ElementId
);
arena_id!(
    /// Index of an attribute declaration (global or local)
    AttributeId
);
arena_id!(
    /// Index of a named attribute group
    AttributeGroupId
);
arena_id!(
    /// Index of a named model group
    GroupId
);

/// Where a component was declared
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    /// Declaring document
    pub doc: DocId,
    /// Byte range in that document's source
    pub range: Range<usize>,
}

/// Occurrence bounds for a particle (minOccurs, maxOccurs)
/// None for max means unbounded
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Occurs {
    /// Minimum number of occurrences (default 1)
    pub min: u64,
    /// Maximum number of occurrences (None = unbounded, default 1)
    pub max: Option<u64>,
}

impl Default for Occurs {
    fn default() -> Self {
        Self::once()
    }
}

impl Occurs {
    /// Default occurrence (1, 1)
    pub fn once() -> Self {
        Self { min: 1, max: Some(1) }
    }

    /// Parse `minOccurs`/`maxOccurs` attribute values
    ///
    /// Values are `xs:nonNegativeInteger`, so bounds beyond `u64` saturate.
    pub fn parse(min: Option<&str>, max: Option<&str>) -> std::result::Result<Self, String> {
        let min = match min.map(str::trim) {
            None => 1,
            Some(v) => non_negative(v).ok_or_else(|| format!("invalid minOccurs '{}'", v))?,
        };
        let max = match max.map(str::trim) {
            None => Some(1),
            Some("unbounded") => None,
            Some(v) => Some(non_negative(v).ok_or_else(|| format!("invalid maxOccurs '{}'", v))?),
        };
        Ok(Self { min, max })
    }

    /// Check if this particle can be absent (minOccurs == 0)
    pub fn is_emptiable(&self) -> bool {
        self.min == 0
    }

    /// Anything but `maxOccurs="1"` repeats
    pub fn is_repeated(&self) -> bool {
        self.max != Some(1)
    }
}

fn non_negative(value: &str) -> Option<u64> {
    let digits = value.strip_prefix('+').unwrap_or(value);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(digits.parse::<u64>().unwrap_or(u64::MAX))
}

/// A reference to a type, by name or to an anonymous nested definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeRef {
    /// `type="..."`, `base="..."`, `itemType="..."`
    Named(QName),
    /// Anonymous `simpleType`/`complexType` child
    Inline(TypeId),
}

/// Data shared by simple and complex type definitions
#[derive(Debug, Clone)]
pub struct TypeInfo {
    /// `name` attribute; None for anonymous types
    pub name: Option<String>,
    /// Target namespace of the declaring document
    pub namespace: Option<String>,
    /// Owner path of an anonymous type: the declaration it is nested in,
    /// prefixed with the enclosing scope for local declarations (`B_item`)
    pub owner: Option<String>,
    /// `annotation/documentation` text
    pub documentation: Vec<String>,
    /// Declaration site
    pub span: Span,
}

impl TypeInfo {
    /// Qualified name, for named types
    pub fn qname(&self) -> Option<QName> {
        self.name
            .as_ref()
            .map(|n| QName::new(self.namespace.clone(), n.clone()))
    }

    /// Name used in messages: the type name, or `<owner>` for anonymous types
    pub fn display_name(&self) -> String {
        match (&self.name, &self.owner) {
            (Some(name), _) => name.clone(),
            (None, Some(owner)) => format!("<anonymous type of '{}'>", owner),
            (None, None) => "<anonymous type>".to_string(),
        }
    }
}

/// A simple or complex type definition
#[derive(Debug, Clone)]
pub enum TypeDef {
    /// `xs:simpleType`
    Simple(SimpleType),
    /// `xs:complexType`
    Complex(ComplexType),
}

impl TypeDef {
    /// Shared type information
    pub fn info(&self) -> &TypeInfo {
        match self {
            Self::Simple(t) => &t.info,
            Self::Complex(t) => &t.info,
        }
    }

    /// Get as complex type if applicable
    pub fn as_complex(&self) -> Option<&ComplexType> {
        match self {
            Self::Complex(t) => Some(t),
            Self::Simple(_) => None,
        }
    }
}

/// Facets of a simple type restriction
///
/// Kept for documentation only; values are not enforced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    /// `enumeration` values in order
    pub enumeration: Vec<String>,
    /// `pattern` values
    pub patterns: Vec<String>,
    /// `length`
    pub length: Option<String>,
    /// `minLength`
    pub min_length: Option<String>,
    /// `maxLength`
    pub max_length: Option<String>,
    /// `minInclusive`
    pub min_inclusive: Option<String>,
    /// `maxInclusive`
    pub max_inclusive: Option<String>,
    /// `minExclusive`
    pub min_exclusive: Option<String>,
    /// `maxExclusive`
    pub max_exclusive: Option<String>,
    /// `totalDigits`
    pub total_digits: Option<String>,
    /// `fractionDigits`
    pub fraction_digits: Option<String>,
}

impl Facets {
    /// Record one facet element; returns false for unknown facet names
    pub fn set(&mut self, facet: &str, value: &str) -> bool {
        let value = value.to_string();
        match facet {
            "enumeration" => self.enumeration.push(value),
            "pattern" => self.patterns.push(value),
            "length" => self.length = Some(value),
            "minLength" => self.min_length = Some(value),
            "maxLength" => self.max_length = Some(value),
            "minInclusive" => self.min_inclusive = Some(value),
            "maxInclusive" => self.max_inclusive = Some(value),
            "minExclusive" => self.min_exclusive = Some(value),
            "maxExclusive" => self.max_exclusive = Some(value),
            "totalDigits" => self.total_digits = Some(value),
            "fractionDigits" => self.fraction_digits = Some(value),
            // accepted, nothing to document
            "whiteSpace" | "assertion" | "explicitTimezone" => {}
            _ => return false,
        }
        true
    }

    /// True when no documented facet is set
    pub fn is_empty(&self) -> bool {
        self.describe().is_empty()
    }

    /// One human-readable line per facet
    pub fn describe(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if !self.enumeration.is_empty() {
            lines.push(format!("Allowed values: {}", self.enumeration.join(", ")));
        }
        for pattern in &self.patterns {
            lines.push(format!("Pattern: {}", pattern));
        }
        let bounds = [
            ("Length", &self.length),
            ("Min length", &self.min_length),
            ("Max length", &self.max_length),
            ("Min inclusive", &self.min_inclusive),
            ("Max inclusive", &self.max_inclusive),
            ("Min exclusive", &self.min_exclusive),
            ("Max exclusive", &self.max_exclusive),
            ("Total digits", &self.total_digits),
            ("Fraction digits", &self.fraction_digits),
        ];
        for (label, value) in bounds {
            if let Some(v) = value {
                lines.push(format!("{}: {}", label, v));
            }
        }
        lines
    }
}

/// `xs:simpleType`
#[derive(Debug, Clone)]
pub struct SimpleType {
    /// Shared type information
    pub info: TypeInfo,
    /// Exactly one of restriction, list, union
    pub derivation: SimpleDerivation,
}

/// How a simple type is derived
#[derive(Debug, Clone)]
pub enum SimpleDerivation {
    /// `xs:restriction`
    Restriction {
        /// Base type (attribute or nested simple type)
        base: TypeRef,
        /// Restricting facets
        facets: Facets,
    },
    /// `xs:list`
    List {
        /// Item type
        item: TypeRef,
    },
    /// `xs:union`
    Union {
        /// `memberTypes` followed by nested member types
        members: Vec<TypeRef>,
    },
}

/// Derivation method for complex content
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DerivationMethod {
    /// Type derived by extension
    Extension,
    /// Type derived by restriction
    Restriction,
}

impl DerivationMethod {
    /// Parse from element tag
    pub fn from_tag(s: &str) -> Option<Self> {
        match s {
            "restriction" => Some(Self::Restriction),
            "extension" => Some(Self::Extension),
            _ => None,
        }
    }
}

impl fmt::Display for DerivationMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Restriction => write!(f, "restriction"),
            Self::Extension => write!(f, "extension"),
        }
    }
}

/// `xs:complexType`
#[derive(Debug, Clone)]
pub struct ComplexType {
    /// Shared type information
    pub info: TypeInfo,
    /// Direct container or content decorator
    pub content: ComplexContent,
    /// `mixed="true"`
    pub mixed: bool,
}

/// The body of a complex type: exactly one of a direct container or a
/// content decorator
#[derive(Debug, Clone)]
pub enum ComplexContent {
    /// Attributes and a model group declared directly
    Direct(Container),
    /// `xs:simpleContent`
    Simple(Derivation),
    /// `xs:complexContent`
    Complex(Derivation),
}

/// `xs:extension` or `xs:restriction` inside a content decorator
#[derive(Debug, Clone)]
pub struct Derivation {
    /// Extension or restriction
    pub method: DerivationMethod,
    /// `base` attribute
    pub base: QName,
    /// Attributes and elements declared at this level
    pub container: Container,
    /// Nested simple type of a simple-content restriction
    pub inline_simple: Option<TypeId>,
    /// Facets of a simple-content restriction
    pub facets: Facets,
    /// Declaration site of the extension/restriction element
    pub span: Span,
}

/// Attributes plus at most one model group
#[derive(Debug, Clone, Default)]
pub struct Container {
    /// Attributes and attribute group references, in order
    pub attributes: Vec<AttributeItem>,
    /// `sequence`/`choice`/`all`/`group`
    pub particle: Option<Particle>,
}

impl Container {
    /// True when nothing is declared
    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty() && self.particle.is_none()
    }
}

/// One entry of an attribute list
#[derive(Debug, Clone)]
pub enum AttributeItem {
    /// Local attribute declaration or attribute `ref`
    Attribute(AttributeId),
    /// `xs:attributeGroup ref="..."`
    GroupRef {
        /// Referenced group
        name: QName,
        /// Reference site
        span: Span,
    },
}

/// Model group compositor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelType {
    /// Ordered sequence of particles
    Sequence,
    /// One of multiple alternatives
    Choice,
    /// Unordered set of particles
    All,
}

impl ModelType {
    /// Parse from element tag name
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "sequence" => Some(Self::Sequence),
            "choice" => Some(Self::Choice),
            "all" => Some(Self::All),
            _ => None,
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sequence => write!(f, "sequence"),
            Self::Choice => write!(f, "choice"),
            Self::All => write!(f, "all"),
        }
    }
}

/// A particle of a content model
#[derive(Debug, Clone)]
pub enum Particle {
    /// Local element declaration or element `ref`
    Element(ElementId),
    /// `sequence`, `choice` or `all`
    Model(ModelGroup),
    /// `xs:group ref="..."`
    GroupRef {
        /// Referenced group
        name: QName,
        /// Occurrence of the reference
        occurs: Occurs,
        /// Reference site
        span: Span,
    },
}

/// `sequence`, `choice` or `all`
#[derive(Debug, Clone)]
pub struct ModelGroup {
    /// Compositor
    pub model: ModelType,
    /// Occurrence of the group itself
    pub occurs: Occurs,
    /// Children in order
    pub particles: Vec<Particle>,
}

/// Name and type, or a `ref` to a global declaration
#[derive(Debug, Clone)]
pub enum Declaration {
    /// Declaration with its own name
    Named {
        /// `name` attribute
        name: String,
        /// `type` attribute or nested type; None means `anyType`
        ty: Option<TypeRef>,
    },
    /// `ref="..."`, forwarding name, type and documentation
    Ref(QName),
}

/// `xs:element`
#[derive(Debug, Clone)]
pub struct ElementDecl {
    /// Named declaration or ref
    pub decl: Declaration,
    /// `minOccurs`/`maxOccurs`
    pub occurs: Occurs,
    /// Target namespace of the declaring document
    pub namespace: Option<String>,
    /// `annotation/documentation` text
    pub documentation: Vec<String>,
    /// Declaration site
    pub span: Span,
}

/// Attribute `use`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttributeUse {
    /// `use="optional"` (default)
    #[default]
    Optional,
    /// `use="required"`
    Required,
    /// `use="prohibited"`
    Prohibited,
}

impl AttributeUse {
    /// Parse from the `use` attribute value
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "optional" => Some(Self::Optional),
            "required" => Some(Self::Required),
            "prohibited" => Some(Self::Prohibited),
            _ => None,
        }
    }
}

/// `xs:attribute`
#[derive(Debug, Clone)]
pub struct AttributeDecl {
    /// Named declaration or ref
    pub decl: Declaration,
    /// `use` attribute
    pub usage: AttributeUse,
    /// Target namespace of the declaring document
    pub namespace: Option<String>,
    /// `annotation/documentation` text
    pub documentation: Vec<String>,
    /// Declaration site
    pub span: Span,
}

/// Named `xs:attributeGroup`
#[derive(Debug, Clone)]
pub struct AttributeGroupDef {
    /// `name` attribute
    pub name: String,
    /// Target namespace of the declaring document
    pub namespace: Option<String>,
    /// Members, possibly referencing further groups
    pub attributes: Vec<AttributeItem>,
    /// Declaration site
    pub span: Span,
}

/// Named `xs:group`
#[derive(Debug, Clone)]
pub struct GroupDef {
    /// `name` attribute
    pub name: String,
    /// Target namespace of the declaring document
    pub namespace: Option<String>,
    /// The group's sequence/choice/all
    pub particle: Option<Particle>,
    /// Declaration site
    pub span: Span,
}

/// Arena of every component of every loaded document
#[derive(Debug, Default)]
pub struct Model {
    types: Vec<TypeDef>,
    elements: Vec<ElementDecl>,
    attributes: Vec<AttributeDecl>,
    attribute_groups: Vec<AttributeGroupDef>,
    groups: Vec<GroupDef>,
}

impl Model {
    /// Create an empty model
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a type definition
    pub fn add_type(&mut self, def: TypeDef) -> TypeId {
        self.types.push(def);
        TypeId(self.types.len() - 1)
    }

    /// Add an element declaration
    pub fn add_element(&mut self, decl: ElementDecl) -> ElementId {
        self.elements.push(decl);
        ElementId(self.elements.len() - 1)
    }

    /// Add an attribute declaration
    pub fn add_attribute(&mut self, decl: AttributeDecl) -> AttributeId {
        self.attributes.push(decl);
        AttributeId(self.attributes.len() - 1)
    }

    /// Add a named attribute group
    pub fn add_attribute_group(&mut self, def: AttributeGroupDef) -> AttributeGroupId {
        self.attribute_groups.push(def);
        AttributeGroupId(self.attribute_groups.len() - 1)
    }

    /// Add a named model group
    pub fn add_group(&mut self, def: GroupDef) -> GroupId {
        self.groups.push(def);
        GroupId(self.groups.len() - 1)
    }

    /// Get a type definition
    pub fn type_def(&self, id: TypeId) -> &TypeDef {
        &self.types[id.0]
    }

    /// Get an element declaration
    pub fn element(&self, id: ElementId) -> &ElementDecl {
        &self.elements[id.0]
    }

    /// Get an attribute declaration
    pub fn attribute(&self, id: AttributeId) -> &AttributeDecl {
        &self.attributes[id.0]
    }

    /// Get a named attribute group
    pub fn attribute_group(&self, id: AttributeGroupId) -> &AttributeGroupDef {
        &self.attribute_groups[id.0]
    }

    /// Get a named model group
    pub fn group(&self, id: GroupId) -> &GroupDef {
        &self.groups[id.0]
    }

    /// All type ids in creation order
    pub fn type_ids(&self) -> impl Iterator<Item = TypeId> {
        (0..self.types.len()).map(TypeId)
    }

    /// Number of components of all kinds
    pub fn component_count(&self) -> usize {
        self.types.len()
            + self.elements.len()
            + self.attributes.len()
            + self.attribute_groups.len()
            + self.groups.len()
    }
}
