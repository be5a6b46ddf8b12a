//! Field projection
//!
//! Maps resolved element and attribute declarations to Go struct fields:
//! name, type, array/pointer shape, `encoding/xml` tag and doc comment.

use std::fmt;

use crate::config::GeneratorConfig;
use crate::error::{Error, Result};
use crate::names::export_name;
use crate::schema::model::{AttributeId, AttributeUse, ElementId, Model, TypeId};
use crate::schema::resolver::{ParticleContext, ResolvedType, Resolver, TextContent, TEXT_FIELD_NAME};

/// A Go type name, qualified when it lives in another package
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct GoType {
    /// Package of a generated struct; None for builtins and same-package types
    pub package: Option<String>,
    /// Unqualified name
    pub name: String,
}

impl GoType {
    /// A builtin Go type such as `string`
    pub fn builtin(name: &str) -> Self {
        Self {
            package: None,
            name: name.to_string(),
        }
    }
}

impl fmt::Display for GoType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.package {
            Some(package) => write!(f, "{}.{}", package, self.name),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Names and packages of generated structs
#[derive(Debug, Clone, Copy)]
pub struct TypeNaming<'a> {
    config: &'a GeneratorConfig,
    model: &'a Model,
}

impl<'a> TypeNaming<'a> {
    /// Create a naming scheme over `model`
    pub fn new(config: &'a GeneratorConfig, model: &'a Model) -> Self {
        Self { config, model }
    }

    /// Exported struct name; anonymous types are named after their owner
    pub fn struct_name(&self, id: TypeId) -> String {
        let info = self.model.type_def(id).info();
        match (&info.name, &info.owner) {
            (Some(name), _) => export_name(name),
            (None, Some(owner)) => format!("{}Type", export_name(owner)),
            (None, None) => "AnonymousType".to_string(),
        }
    }

    /// Package a type is generated into
    pub fn package(&self, id: TypeId) -> String {
        let info = self.model.type_def(id).info();
        self.config.package_for(info.namespace.as_deref())
    }

    /// Go type of a struct as seen from `current_package`
    pub fn go_type(&self, id: TypeId, current_package: &str) -> GoType {
        let package = self.package(id);
        GoType {
            package: (package != current_package).then_some(package),
            name: self.struct_name(id),
        }
    }
}

/// One field of a generated struct
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSpec {
    /// Exported field name
    pub name: String,
    /// Element type
    pub go_type: GoType,
    /// Slice field (`maxOccurs` other than 1)
    pub is_array: bool,
    /// Pointer field (optional, complex, not a slice)
    pub is_pointer: bool,
    /// Content of the `xml:"..."` tag
    pub tag: String,
    /// Comment lines
    pub documentation: Vec<String>,
    /// Complex type this field refers to
    pub referenced: Option<TypeId>,
}

impl FieldSpec {
    /// The field's full Go type: `[]`, `*` and the possibly qualified name
    pub fn type_expr(&self) -> String {
        let prefix = match (self.is_array, self.is_pointer) {
            (true, _) => "[]",
            (false, true) => "*",
            (false, false) => "",
        };
        format!("{}{}", prefix, self.go_type)
    }
}

/// Projects declarations of one struct into fields
pub struct FieldProjector<'r, 'g> {
    resolver: &'r mut Resolver<'g>,
    naming: TypeNaming<'r>,
    package: &'r str,
}

impl<'r, 'g> FieldProjector<'r, 'g> {
    /// Create a projector for a struct generated into `package`
    pub fn new(resolver: &'r mut Resolver<'g>, naming: TypeNaming<'r>, package: &'r str) -> Self {
        Self {
            resolver,
            naming,
            package,
        }
    }

    /// Field for an element of a content model
    ///
    /// Repeated elements (or elements in a repeated group) become slices,
    /// optional ones get `omitempty`, and optional complex ones become
    /// pointers.
    pub fn project_element(&mut self, id: ElementId, context: ParticleContext, name: &str) -> Result<FieldSpec> {
        let model = self.resolver.graph().model();
        let local = model.element(id);
        let xml_name = self.resolver.element_name(id)?;
        let target = model.element(self.resolver.element_target(id)?);
        let ty = self.resolver.element_type(id)?;

        let is_array = local.occurs.is_repeated() || context.repeated;
        let optional = local.occurs.is_emptiable() || context.optional;

        let mut documentation = if target.documentation.is_empty() {
            local.documentation.clone()
        } else {
            target.documentation.clone()
        };
        let (go_type, referenced) = self.value_type(ty, &mut documentation)?;

        Ok(FieldSpec {
            name: name.to_string(),
            go_type,
            is_array,
            is_pointer: referenced.is_some() && optional && !is_array,
            tag: tag(xml_name, false, optional),
            documentation,
            referenced,
        })
    }

    /// Field for an attribute; only `use="required"` attributes lack `omitempty`
    pub fn project_attribute(&mut self, id: AttributeId, name: &str) -> Result<FieldSpec> {
        let model = self.resolver.graph().model();
        let local = model.attribute(id);
        let xml_name = self.resolver.attribute_name(id)?;
        let target = model.attribute(self.resolver.attribute_target(id)?);
        let ty = self.resolver.attribute_type(id)?;

        if ty.as_complex().is_some() {
            return Err(Error::malformed(
                format!("attribute '{}' has a complex type", xml_name),
                self.resolver.graph().fragment(&local.span),
            ));
        }

        let mut documentation = if target.documentation.is_empty() {
            local.documentation.clone()
        } else {
            target.documentation.clone()
        };
        let (go_type, _) = self.value_type(ty, &mut documentation)?;

        Ok(FieldSpec {
            name: name.to_string(),
            go_type,
            is_array: false,
            is_pointer: false,
            tag: tag(xml_name, true, local.usage != AttributeUse::Required),
            documentation,
            referenced: None,
        })
    }

    /// Synthetic field holding the text content of a simple-content type
    pub fn chardata(&self, text: &TextContent) -> FieldSpec {
        FieldSpec {
            name: TEXT_FIELD_NAME.to_string(),
            go_type: GoType::builtin(text.primitive.go_type()),
            is_array: false,
            is_pointer: false,
            tag: ",chardata".to_string(),
            documentation: text.facets.describe(),
            referenced: None,
        }
    }

    fn value_type(&mut self, ty: ResolvedType, documentation: &mut Vec<String>) -> Result<(GoType, Option<TypeId>)> {
        if let ResolvedType::Complex(id) = ty {
            return Ok((self.naming.go_type(id, self.package), Some(id)));
        }
        if let Some(facets) = self.resolver.facets_of(ty) {
            documentation.extend(facets.describe());
        }
        let primitive = self.resolver.scalar_of(ty)?;
        Ok((GoType::builtin(primitive.go_type()), None))
    }
}

fn tag(xml_name: &str, attribute: bool, optional: bool) -> String {
    let mut tag = xml_name.to_string();
    if attribute {
        tag.push_str(",attr");
    }
    if optional {
        tag.push_str(",omitempty");
    }
    tag
}
