//! XSD document parsing
//!
//! One top-to-bottom pass over a schema document builds its model nodes and
//! fills its symbol table. Tag names are dispatched once here; everything
//! downstream works on the typed model. Only root-level named declarations
//! register themselves. References are resolved to [`QName`]s against the
//! namespace bindings in scope at the referencing element, but not looked
//! up: their targets may live later in the file or in documents not loaded
//! yet.

use tracing::{debug, warn};

use crate::documents::{Document, Element};
use crate::error::{Error, Result};
use crate::namespaces::QName;

use super::model::{
    AttributeDecl, AttributeGroupDef, AttributeId, AttributeItem, AttributeUse, ComplexContent, ComplexType,
    Container, Declaration, Derivation, DerivationMethod, DocId, ElementDecl, ElementId, Facets,
    GroupDef, Model, ModelGroup, ModelType, Occurs, Particle, SimpleDerivation, SimpleType, Span,
    TypeDef, TypeId, TypeInfo, TypeRef,
};
use super::symbols::{SymbolId, SymbolTable};

/// XSD element local names
mod xsd_elements {
    pub const SCHEMA: &str = "schema";
    pub const ELEMENT: &str = "element";
    pub const COMPLEX_TYPE: &str = "complexType";
    pub const SIMPLE_TYPE: &str = "simpleType";
    pub const ATTRIBUTE: &str = "attribute";
    pub const ATTRIBUTE_GROUP: &str = "attributeGroup";
    pub const GROUP: &str = "group";
    pub const SEQUENCE: &str = "sequence";
    pub const CHOICE: &str = "choice";
    pub const ALL: &str = "all";
    pub const ANNOTATION: &str = "annotation";
    pub const IMPORT: &str = "import";
    pub const INCLUDE: &str = "include";
    pub const REDEFINE: &str = "redefine";
    pub const OVERRIDE: &str = "override";
    pub const NOTATION: &str = "notation";
    pub const RESTRICTION: &str = "restriction";
    pub const LIST: &str = "list";
    pub const UNION: &str = "union";
    pub const COMPLEX_CONTENT: &str = "complexContent";
    pub const SIMPLE_CONTENT: &str = "simpleContent";
    pub const ANY: &str = "any";
    pub const ANY_ATTRIBUTE: &str = "anyAttribute";
}

/// XSD attribute names
mod xsd_attrs {
    pub const NAME: &str = "name";
    pub const TYPE: &str = "type";
    pub const REF: &str = "ref";
    pub const BASE: &str = "base";
    pub const USE: &str = "use";
    pub const VALUE: &str = "value";
    pub const ITEM_TYPE: &str = "itemType";
    pub const MEMBER_TYPES: &str = "memberTypes";
    pub const MIN_OCCURS: &str = "minOccurs";
    pub const MAX_OCCURS: &str = "maxOccurs";
    pub const MIXED: &str = "mixed";
    pub const TARGET_NAMESPACE: &str = "targetNamespace";
    pub const NAMESPACE: &str = "namespace";
    pub const SCHEMA_LOCATION: &str = "schemaLocation";
}

use xsd_attrs as attrs;
use xsd_elements as tags;

/// `xs:include` or `xs:import`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Same-namespace include
    Include {
        /// `schemaLocation`
        location: String,
    },
    /// Foreign-namespace import
    Import {
        /// `namespace`
        namespace: Option<String>,
        /// `schemaLocation`, absent for namespace-only imports
        location: Option<String>,
    },
}

/// Result of parsing one schema document
#[derive(Debug)]
pub struct ParsedSchema {
    /// `targetNamespace` of the document
    pub target_namespace: Option<String>,
    /// Top-level named declarations
    pub symbols: SymbolTable,
    /// Include/import directives in document order
    pub directives: Vec<Directive>,
}

/// Parse a schema document into `model`
///
/// `label` names the document in diagnostics.
pub fn parse_schema(
    model: &mut Model,
    doc: &Document,
    doc_id: DocId,
    label: &str,
    permissive: bool,
) -> Result<ParsedSchema> {
    let root = doc.root();
    if !root.is_xsd(tags::SCHEMA) {
        return Err(Error::malformed(
            format!("expected xs:schema root element, got '{}'", root.qname),
            doc.fragment(&root.range),
        ));
    }

    let target_namespace = root
        .get_attribute(attrs::TARGET_NAMESPACE)
        .filter(|ns| !ns.is_empty())
        .map(str::to_string);

    let mut parser = SchemaParser {
        model,
        doc,
        doc_id,
        target_namespace: target_namespace.clone(),
        permissive,
    };
    let mut symbols = SymbolTable::new(label, permissive);
    let mut directives = Vec::new();

    for child in root.xsd_children() {
        match child.local_name() {
            tags::INCLUDE => {
                let location = parser.required(child, attrs::SCHEMA_LOCATION)?;
                directives.push(Directive::Include {
                    location: location.to_string(),
                });
            }
            tags::IMPORT => directives.push(Directive::Import {
                namespace: child.get_attribute(attrs::NAMESPACE).map(str::to_string),
                location: child
                    .get_attribute(attrs::SCHEMA_LOCATION)
                    .map(str::to_string),
            }),
            tags::ELEMENT => {
                let name = parser.required(child, attrs::NAME)?;
                let id = parser.element(child, None)?;
                symbols.register(name, SymbolId::Element(id))?;
            }
            tags::ATTRIBUTE => {
                let name = parser.required(child, attrs::NAME)?;
                let id = parser.attribute(child, None)?;
                symbols.register(name, SymbolId::Attribute(id))?;
            }
            tags::SIMPLE_TYPE | tags::COMPLEX_TYPE => {
                let name = parser.required(child, attrs::NAME)?;
                let id = parser.type_def(child, None)?;
                symbols.register(name, SymbolId::Type(id))?;
            }
            tags::ATTRIBUTE_GROUP => {
                let name = parser.required(child, attrs::NAME)?;
                let def = AttributeGroupDef {
                    name: name.to_string(),
                    namespace: parser.target_namespace.clone(),
                    attributes: parser.attribute_items(child, Some(name))?,
                    span: parser.span(child),
                };
                let id = parser.model.add_attribute_group(def);
                symbols.register(name, SymbolId::AttributeGroup(id))?;
            }
            tags::GROUP => {
                let name = parser.required(child, attrs::NAME)?;
                let particle = match find_model_group(child) {
                    Some(group) => Some(Particle::Model(parser.model_group(group, Some(name))?)),
                    None => None,
                };
                let def = GroupDef {
                    name: name.to_string(),
                    namespace: parser.target_namespace.clone(),
                    particle,
                    span: parser.span(child),
                };
                let id = parser.model.add_group(def);
                symbols.register(name, SymbolId::Group(id))?;
            }
            tags::REDEFINE | tags::OVERRIDE => {
                warn!(document = label, "xs:{} is not supported, ignored", child.local_name());
            }
            tags::ANNOTATION | tags::NOTATION => {}
            other => debug!(document = label, "skipping top-level xs:{}", other),
        }
    }

    Ok(ParsedSchema {
        target_namespace,
        symbols,
        directives,
    })
}

/// Builds model nodes for one document
struct SchemaParser<'a> {
    model: &'a mut Model,
    doc: &'a Document,
    doc_id: DocId,
    target_namespace: Option<String>,
    permissive: bool,
}

impl<'a> SchemaParser<'a> {
    fn span(&self, elem: &Element) -> Span {
        Span {
            doc: self.doc_id,
            range: elem.range.clone(),
        }
    }

    fn malformed(&self, elem: &Element, message: impl Into<String>) -> Error {
        Error::malformed(message, self.doc.fragment(&elem.range))
    }

    fn required<'e>(&self, elem: &'e Element, name: &str) -> Result<&'e str> {
        elem.get_attribute(name).ok_or_else(|| {
            self.malformed(
                elem,
                format!("xs:{} requires a '{}' attribute", elem.local_name(), name),
            )
        })
    }

    fn qname_attr(&self, elem: &Element, name: &str) -> Result<Option<QName>> {
        elem.get_attribute(name)
            .map(|value| elem.namespaces.resolve(value))
            .transpose()
    }

    fn occurs(&self, elem: &Element) -> Result<Occurs> {
        Occurs::parse(
            elem.get_attribute(attrs::MIN_OCCURS),
            elem.get_attribute(attrs::MAX_OCCURS),
        )
        .map_err(|message| self.malformed(elem, message))
    }

    fn type_info(&self, elem: &Element, owner: Option<&str>) -> TypeInfo {
        TypeInfo {
            name: elem.get_attribute(attrs::NAME).map(str::to_string),
            namespace: self.target_namespace.clone(),
            owner: owner.map(str::to_string),
            documentation: elem.documentation(),
            span: self.span(elem),
        }
    }

    /// `xs:element`
    ///
    /// `scope` is the owner path of the enclosing definition, `None` at
    /// schema level where occurrence bounds do not apply.
    fn element(&mut self, elem: &Element, scope: Option<&str>) -> Result<ElementId> {
        let decl = self.declaration(elem, scope)?;
        let occurs = match scope {
            None => Occurs::once(),
            Some(_) => self.occurs(elem)?,
        };

        let element = ElementDecl {
            decl,
            occurs,
            namespace: self.target_namespace.clone(),
            documentation: elem.documentation(),
            span: self.span(elem),
        };
        Ok(self.model.add_element(element))
    }

    /// `xs:attribute`, scoped like [`Self::element`]
    fn attribute(&mut self, elem: &Element, scope: Option<&str>) -> Result<AttributeId> {
        let decl = self.declaration(elem, scope)?;
        let usage = match elem.get_attribute(attrs::USE) {
            None => AttributeUse::default(),
            Some(value) => AttributeUse::from_str(value)
                .ok_or_else(|| self.malformed(elem, format!("invalid use '{}'", value)))?,
        };

        let attribute = AttributeDecl {
            decl,
            usage,
            namespace: self.target_namespace.clone(),
            documentation: elem.documentation(),
            span: self.span(elem),
        };
        Ok(self.model.add_attribute(attribute))
    }

    /// Name plus type, or `ref`
    ///
    /// An inline type is owned by the declaration name, qualified with the
    /// enclosing scope for local declarations.
    fn declaration(&mut self, elem: &Element, scope: Option<&str>) -> Result<Declaration> {
        if let Some(target) = self.qname_attr(elem, attrs::REF)? {
            return Ok(Declaration::Ref(target));
        }

        let name = self
            .required(elem, attrs::NAME)
            .map_err(|_| {
                self.malformed(
                    elem,
                    format!("xs:{} has neither 'name' nor 'ref'", elem.local_name()),
                )
            })?
            .to_string();

        let ty = if let Some(named) = self.qname_attr(elem, attrs::TYPE)? {
            Some(TypeRef::Named(named))
        } else if let Some(nested) = elem
            .xsd_children()
            .find(|c| c.local_name() == tags::COMPLEX_TYPE || c.local_name() == tags::SIMPLE_TYPE)
        {
            let owner = match scope {
                Some(scope) => format!("{}_{}", scope, name),
                None => name.clone(),
            };
            Some(TypeRef::Inline(self.type_def(nested, Some(owner.as_str()))?))
        } else {
            None
        };

        Ok(Declaration::Named { name, ty })
    }

    /// `xs:simpleType` or `xs:complexType`
    fn type_def(&mut self, elem: &Element, owner: Option<&str>) -> Result<TypeId> {
        let def = if elem.local_name() == tags::SIMPLE_TYPE {
            TypeDef::Simple(self.simple_type(elem, owner)?)
        } else {
            TypeDef::Complex(self.complex_type(elem, owner)?)
        };
        Ok(self.model.add_type(def))
    }

    fn simple_type(&mut self, elem: &Element, owner: Option<&str>) -> Result<SimpleType> {
        let info = self.type_info(elem, owner);
        // nested anonymous types are named after the same owner
        let owner = owner.or(info.name.as_deref()).map(str::to_string);
        let owner = owner.as_deref();

        let body = elem
            .xsd_children()
            .find(|c| matches!(c.local_name(), tags::RESTRICTION | tags::LIST | tags::UNION))
            .ok_or_else(|| self.malformed(elem, "simpleType lacks restriction, list or union"))?;

        let derivation = match body.local_name() {
            tags::RESTRICTION => {
                let base = match self.qname_attr(body, attrs::BASE)? {
                    Some(base) => TypeRef::Named(base),
                    None => {
                        let nested = body.find_child(tags::SIMPLE_TYPE).ok_or_else(|| {
                            self.malformed(body, "restriction has neither 'base' nor a nested simpleType")
                        })?;
                        TypeRef::Inline(self.type_def(nested, owner)?)
                    }
                };
                SimpleDerivation::Restriction {
                    base,
                    facets: self.facets(body),
                }
            }
            tags::LIST => {
                let item = match self.qname_attr(body, attrs::ITEM_TYPE)? {
                    Some(item) => TypeRef::Named(item),
                    None => {
                        let nested = body.find_child(tags::SIMPLE_TYPE).ok_or_else(|| {
                            self.malformed(body, "list has neither 'itemType' nor a nested simpleType")
                        })?;
                        TypeRef::Inline(self.type_def(nested, owner)?)
                    }
                };
                SimpleDerivation::List { item }
            }
            _ => {
                let mut members = Vec::new();
                if let Some(names) = body.get_attribute(attrs::MEMBER_TYPES) {
                    for name in names.split_whitespace() {
                        members.push(TypeRef::Named(body.namespaces.resolve(name)?));
                    }
                }
                for nested in body.find_children(tags::SIMPLE_TYPE) {
                    members.push(TypeRef::Inline(self.type_def(nested, owner)?));
                }
                if members.is_empty() {
                    return Err(self.malformed(body, "union has no member types"));
                }
                SimpleDerivation::Union { members }
            }
        };

        Ok(SimpleType { info, derivation })
    }

    fn facets(&self, restriction: &Element) -> Facets {
        let mut facets = Facets::default();
        for child in restriction.xsd_children() {
            let local = child.local_name();
            if matches!(
                local,
                tags::ANNOTATION | tags::SIMPLE_TYPE | tags::ATTRIBUTE | tags::ATTRIBUTE_GROUP
                    | tags::ANY_ATTRIBUTE | tags::SEQUENCE | tags::CHOICE | tags::ALL | tags::GROUP
            ) {
                continue;
            }
            let value = child.get_attribute(attrs::VALUE).unwrap_or_default();
            if !facets.set(local, value) {
                debug!("ignoring unknown facet xs:{}", local);
            }
        }
        facets
    }

    fn complex_type(&mut self, elem: &Element, owner: Option<&str>) -> Result<ComplexType> {
        let info = self.type_info(elem, owner);
        let owner = owner.or(info.name.as_deref()).map(str::to_string);

        let content = if let Some(simple) = elem.find_child(tags::SIMPLE_CONTENT) {
            ComplexContent::Simple(self.derivation(simple, owner.as_deref())?)
        } else if let Some(complex) = elem.find_child(tags::COMPLEX_CONTENT) {
            ComplexContent::Complex(self.derivation(complex, owner.as_deref())?)
        } else {
            let declares_nothing = elem
                .xsd_children()
                .all(|c| c.local_name() == tags::ANNOTATION);
            if declares_nothing && !self.permissive {
                return Err(self.malformed(
                    elem,
                    "complexType has no simple/complex content and no attributes or elements",
                ));
            }
            ComplexContent::Direct(self.container(elem, owner.as_deref())?)
        };

        Ok(ComplexType {
            info,
            content,
            mixed: is_true(elem.get_attribute(attrs::MIXED)),
        })
    }

    /// `extension`/`restriction` inside `simpleContent`/`complexContent`
    fn derivation(&mut self, content: &Element, owner: Option<&str>) -> Result<Derivation> {
        let (body, method) = content
            .xsd_children()
            .find_map(|c| DerivationMethod::from_tag(c.local_name()).map(|m| (c, m)))
            .ok_or_else(|| {
                self.malformed(
                    content,
                    format!("xs:{} lacks extension or restriction", content.local_name()),
                )
            })?;

        let base = match self.qname_attr(body, attrs::BASE)? {
            Some(base) => base,
            None => return Err(self.malformed(body, format!("xs:{} requires a 'base' attribute", method))),
        };

        let is_simple_restriction =
            content.local_name() == tags::SIMPLE_CONTENT && method == DerivationMethod::Restriction;
        let (inline_simple, facets) = if is_simple_restriction {
            let inline = match body.find_child(tags::SIMPLE_TYPE) {
                Some(nested) => Some(self.type_def(nested, owner)?),
                None => None,
            };
            (inline, self.facets(body))
        } else {
            (None, Facets::default())
        };

        Ok(Derivation {
            method,
            base,
            container: self.container(body, owner)?,
            inline_simple,
            facets,
            span: self.span(body),
        })
    }

    /// Attributes and at most one model group of a type or derivation
    fn container(&mut self, elem: &Element, scope: Option<&str>) -> Result<Container> {
        let mut container = Container {
            attributes: self.attribute_items(elem, scope)?,
            particle: None,
        };

        for child in elem.xsd_children() {
            let particle = match child.local_name() {
                tags::SEQUENCE | tags::CHOICE | tags::ALL => {
                    Particle::Model(self.model_group(child, scope)?)
                }
                tags::GROUP => self.group_ref(child)?,
                _ => continue,
            };
            if container.particle.is_some() {
                return Err(self.malformed(elem, "more than one model group"));
            }
            container.particle = Some(particle);
        }

        Ok(container)
    }

    /// `attribute` and `attributeGroup ref` children, in order
    fn attribute_items(&mut self, elem: &Element, scope: Option<&str>) -> Result<Vec<AttributeItem>> {
        let mut items = Vec::new();
        for child in elem.xsd_children() {
            match child.local_name() {
                tags::ATTRIBUTE => items.push(AttributeItem::Attribute(self.attribute(child, scope)?)),
                tags::ATTRIBUTE_GROUP => {
                    let name = self
                        .qname_attr(child, attrs::REF)?
                        .ok_or_else(|| self.malformed(child, "attributeGroup reference requires 'ref'"))?;
                    items.push(AttributeItem::GroupRef {
                        name,
                        span: self.span(child),
                    });
                }
                _ => {}
            }
        }
        Ok(items)
    }

    fn model_group(&mut self, elem: &Element, scope: Option<&str>) -> Result<ModelGroup> {
        let model = ModelType::from_tag(elem.local_name())
            .ok_or_else(|| self.malformed(elem, "expected sequence, choice or all"))?;
        let occurs = self.occurs(elem)?;

        let mut particles = Vec::new();
        for child in elem.xsd_children() {
            match child.local_name() {
                tags::ELEMENT => particles.push(Particle::Element(self.element(child, scope)?)),
                tags::SEQUENCE | tags::CHOICE | tags::ALL => {
                    particles.push(Particle::Model(self.model_group(child, scope)?))
                }
                tags::GROUP => particles.push(self.group_ref(child)?),
                tags::ANY => debug!("wildcard xs:any ignored"),
                _ => {}
            }
        }

        Ok(ModelGroup {
            model,
            occurs,
            particles,
        })
    }

    fn group_ref(&mut self, elem: &Element) -> Result<Particle> {
        let name = self
            .qname_attr(elem, attrs::REF)?
            .ok_or_else(|| self.malformed(elem, "group reference requires 'ref'"))?;
        Ok(Particle::GroupRef {
            name,
            occurs: self.occurs(elem)?,
            span: self.span(elem),
        })
    }
}

fn find_model_group(elem: &Element) -> Option<&Element> {
    elem.xsd_children()
        .find(|c| matches!(c.local_name(), tags::SEQUENCE | tags::CHOICE | tags::ALL))
}

fn is_true(value: Option<&str>) -> bool {
    matches!(value.map(str::trim), Some("true") | Some("1"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SymbolKind;
    use crate::limits::Limits;

    fn parse(body: &str) -> Result<(Model, ParsedSchema)> {
        parse_with(body, false)
    }

    fn parse_with(body: &str, permissive: bool) -> Result<(Model, ParsedSchema)> {
        let xml = format!(
            r#"<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" xmlns:a="urn:a" targetNamespace="urn:a">{}</xs:schema>"#,
            body
        );
        let doc = Document::parse(xml, &Limits::default())?;
        let mut model = Model::new();
        let parsed = parse_schema(&mut model, &doc, DocId(0), "test.xsd", permissive)?;
        Ok((model, parsed))
    }

    #[test]
    fn test_registers_top_level_declarations() {
        let (_, parsed) = parse(
            r#"<xs:element name="Order" type="a:OrderType"/>
               <xs:complexType name="OrderType"><xs:sequence>
                 <xs:element name="line" type="xs:string"/>
               </xs:sequence></xs:complexType>
               <xs:simpleType name="Code"><xs:restriction base="xs:string"/></xs:simpleType>
               <xs:attribute name="lang" type="xs:string"/>
               <xs:attributeGroup name="common"><xs:attribute name="id"/></xs:attributeGroup>
               <xs:group name="lines"><xs:sequence/></xs:group>"#,
        )
        .unwrap();

        assert_eq!(parsed.target_namespace.as_deref(), Some("urn:a"));
        let symbols = &parsed.symbols;
        assert!(symbols.get(SymbolKind::Element, "Order").is_some());
        assert!(symbols.get(SymbolKind::Type, "OrderType").is_some());
        assert!(symbols.get(SymbolKind::Type, "Code").is_some());
        assert!(symbols.get(SymbolKind::Attribute, "lang").is_some());
        assert!(symbols.get(SymbolKind::AttributeGroup, "common").is_some());
        assert!(symbols.get(SymbolKind::Group, "lines").is_some());
        // the local element "line" is not registered
        assert!(symbols.get(SymbolKind::Element, "line").is_none());
        assert_eq!(symbols.len(), 6);
    }

    #[test]
    fn test_anonymous_type_owner() {
        let (model, parsed) = parse(
            r#"<xs:element name="Order"><xs:complexType>
                 <xs:attribute name="id" type="xs:string"/>
               </xs:complexType></xs:element>"#,
        )
        .unwrap();

        let Some(SymbolId::Element(id)) = parsed.symbols.get(SymbolKind::Element, "Order") else {
            panic!("Order not registered");
        };
        let Declaration::Named { ty: Some(TypeRef::Inline(ty)), .. } = &model.element(id).decl else {
            panic!("expected inline type");
        };
        let info = model.type_def(*ty).info();
        assert_eq!(info.name, None);
        assert_eq!(info.owner.as_deref(), Some("Order"));
        assert_eq!(info.namespace.as_deref(), Some("urn:a"));
    }

    #[test]
    fn test_local_anonymous_type_owner_is_qualified() {
        let (model, parsed) = parse(
            r#"<xs:complexType name="B"><xs:sequence>
                 <xs:element name="item"><xs:complexType>
                   <xs:sequence><xs:element name="part"><xs:complexType>
                     <xs:attribute name="n" type="xs:int"/>
                   </xs:complexType></xs:element></xs:sequence>
                 </xs:complexType></xs:element>
               </xs:sequence></xs:complexType>"#,
        )
        .unwrap();

        let Some(SymbolId::Type(b)) = parsed.symbols.get(SymbolKind::Type, "B") else {
            panic!("B not registered");
        };
        let inline_of = |container: &Container| {
            let Some(Particle::Model(group)) = &container.particle else {
                panic!("expected model group");
            };
            let Particle::Element(id) = &group.particles[0] else {
                panic!("expected element");
            };
            let Declaration::Named { ty: Some(TypeRef::Inline(ty)), .. } = &model.element(*id).decl else {
                panic!("expected inline type");
            };
            *ty
        };

        let ComplexContent::Direct(outer) = &model.type_def(b).as_complex().unwrap().content else {
            panic!("expected direct content");
        };
        let item = inline_of(outer);
        assert_eq!(model.type_def(item).info().owner.as_deref(), Some("B_item"));

        let ComplexContent::Direct(inner) = &model.type_def(item).as_complex().unwrap().content else {
            panic!("expected direct content");
        };
        let part = inline_of(inner);
        assert_eq!(model.type_def(part).info().owner.as_deref(), Some("B_item_part"));
    }

    #[test]
    fn test_references_resolve_prefixes() {
        let (model, parsed) = parse(r#"<xs:element name="Order" type="a:OrderType"/>"#).unwrap();
        let Some(SymbolId::Element(id)) = parsed.symbols.get(SymbolKind::Element, "Order") else {
            panic!("Order not registered");
        };
        match &model.element(id).decl {
            Declaration::Named { ty: Some(TypeRef::Named(q)), .. } => {
                assert_eq!(q, &QName::namespaced("urn:a", "OrderType"));
            }
            other => panic!("unexpected declaration {:?}", other),
        }
    }

    #[test]
    fn test_directives() {
        let (_, parsed) = parse(
            r#"<xs:include schemaLocation="common.xsd"/>
               <xs:import namespace="urn:b" schemaLocation="b.xsd"/>
               <xs:import namespace="urn:c"/>"#,
        )
        .unwrap();

        assert_eq!(
            parsed.directives,
            vec![
                Directive::Include { location: "common.xsd".into() },
                Directive::Import {
                    namespace: Some("urn:b".into()),
                    location: Some("b.xsd".into())
                },
                Directive::Import {
                    namespace: Some("urn:c".into()),
                    location: None
                },
            ]
        );
    }

    #[test]
    fn test_duplicate_type() {
        let err = parse(
            r#"<xs:simpleType name="A"><xs:restriction base="xs:string"/></xs:simpleType>
               <xs:simpleType name="A"><xs:restriction base="xs:int"/></xs:simpleType>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::DuplicateDefinition { .. }));
    }

    #[test]
    fn test_simple_type_without_body() {
        let err = parse(r#"<xs:simpleType name="A"><xs:annotation/></xs:simpleType>"#).unwrap_err();
        match err {
            Error::MalformedConstruct { fragment, .. } => {
                assert!(fragment.starts_with(r#"<xs:simpleType name="A">"#));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_complex_type() {
        let body = r#"<xs:complexType name="Empty"/>"#;
        assert!(matches!(parse(body), Err(Error::MalformedConstruct { .. })));
        assert!(parse_with(body, true).is_ok());
    }

    #[test]
    fn test_occurs_and_particles() {
        let (model, parsed) = parse(
            r#"<xs:complexType name="T"><xs:choice maxOccurs="unbounded">
                 <xs:element name="x" type="xs:int" minOccurs="0"/>
                 <xs:group ref="a:g"/>
               </xs:choice></xs:complexType>"#,
        )
        .unwrap();

        let Some(SymbolId::Type(id)) = parsed.symbols.get(SymbolKind::Type, "T") else {
            panic!("T not registered");
        };
        let complex = model.type_def(id).as_complex().unwrap();
        let ComplexContent::Direct(container) = &complex.content else {
            panic!("expected direct content");
        };
        let Some(Particle::Model(group)) = &container.particle else {
            panic!("expected model group");
        };
        assert_eq!(group.model, ModelType::Choice);
        assert!(group.occurs.is_repeated());
        assert_eq!(group.particles.len(), 2);
        let Particle::Element(x) = &group.particles[0] else {
            panic!("expected element");
        };
        assert!(model.element(*x).occurs.is_emptiable());
    }

    #[test]
    fn test_invalid_occurs() {
        let err = parse(
            r#"<xs:complexType name="T"><xs:sequence>
                 <xs:element name="x" maxOccurs="lots"/>
               </xs:sequence></xs:complexType>"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::MalformedConstruct { .. }));
    }

    #[test]
    fn test_max_occurs_beyond_u32() {
        let (model, parsed) = parse(
            r#"<xs:complexType name="T"><xs:sequence>
                 <xs:element name="x" type="xs:int" maxOccurs="5000000000"/>
               </xs:sequence></xs:complexType>"#,
        )
        .unwrap();

        let Some(SymbolId::Type(id)) = parsed.symbols.get(SymbolKind::Type, "T") else {
            panic!("T not registered");
        };
        let ComplexContent::Direct(container) = &model.type_def(id).as_complex().unwrap().content else {
            panic!("expected direct content");
        };
        let Some(Particle::Model(group)) = &container.particle else {
            panic!("expected model group");
        };
        let Particle::Element(x) = &group.particles[0] else {
            panic!("expected element");
        };
        assert_eq!(model.element(*x).occurs.max, Some(5_000_000_000));
        assert!(model.element(*x).occurs.is_repeated());
    }

    #[test]
    fn test_unknown_prefix() {
        let err = parse(r#"<xs:element name="x" type="zz:T"/>"#).unwrap_err();
        assert!(matches!(err, Error::Namespace(_)));
    }

    #[test]
    fn test_not_a_schema() {
        let doc = Document::parse("<root/>".to_string(), &Limits::default()).unwrap();
        let mut model = Model::new();
        let err = parse_schema(&mut model, &doc, DocId(0), "x.xsd", false).unwrap_err();
        assert!(matches!(err, Error::MalformedConstruct { .. }));
    }
}
