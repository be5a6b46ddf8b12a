//! XSD built-in types
//!
//! References into the XSD namespace never go through symbol lookup; they
//! map straight to one of a handful of primitive representations. All
//! integer subtypes collapse into [`Primitive::Integer`] and every date/time
//! type is carried as text.

use std::fmt;

/// Scalar representation of a built-in type in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    /// Textual values: strings, names, URIs, binary encodings, `anyType`
    String,
    /// `decimal`, `float`, `double`
    Decimal,
    /// The integer family, whatever its width or sign
    Integer,
    /// `boolean`
    Boolean,
    /// The date/time family, kept as text
    DateTime,
}

impl Primitive {
    /// Go type for this primitive
    pub fn go_type(&self) -> &'static str {
        match self {
            Self::String | Self::DateTime => "string",
            Self::Decimal => "float64",
            Self::Integer => "int",
            Self::Boolean => "bool",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.go_type())
    }
}

/// A built-in XSD type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BuiltinType {
    /// Local name in the XSD namespace
    pub name: &'static str,
    /// Primitive it maps to
    pub primitive: Primitive,
}

impl BuiltinType {
    /// Look up a built-in type by its local name
    pub fn lookup(local_name: &str) -> Option<Self> {
        BUILTINS
            .iter()
            .find(|(name, _)| *name == local_name)
            .map(|&(name, primitive)| Self { name, primitive })
    }

    /// `xs:anyType`, used for declarations without a type
    pub fn any_type() -> Self {
        Self {
            name: "anyType",
            primitive: Primitive::String,
        }
    }
}

const BUILTINS: &[(&str, Primitive)] = &[
    // String types
    ("string", Primitive::String),
    ("normalizedString", Primitive::String),
    ("token", Primitive::String),
    ("language", Primitive::String),
    ("Name", Primitive::String),
    ("NCName", Primitive::String),
    ("ID", Primitive::String),
    ("IDREF", Primitive::String),
    ("IDREFS", Primitive::String),
    ("ENTITY", Primitive::String),
    ("ENTITIES", Primitive::String),
    ("NMTOKEN", Primitive::String),
    ("NMTOKENS", Primitive::String),
    ("QName", Primitive::String),
    ("NOTATION", Primitive::String),
    ("anyURI", Primitive::String),
    ("hexBinary", Primitive::String),
    ("base64Binary", Primitive::String),
    ("anyType", Primitive::String),
    ("anySimpleType", Primitive::String),
    // Boolean
    ("boolean", Primitive::Boolean),
    // Numeric types
    ("decimal", Primitive::Decimal),
    ("float", Primitive::Decimal),
    ("double", Primitive::Decimal),
    ("integer", Primitive::Integer),
    ("long", Primitive::Integer),
    ("int", Primitive::Integer),
    ("short", Primitive::Integer),
    ("byte", Primitive::Integer),
    ("nonNegativeInteger", Primitive::Integer),
    ("positiveInteger", Primitive::Integer),
    ("nonPositiveInteger", Primitive::Integer),
    ("negativeInteger", Primitive::Integer),
    ("unsignedLong", Primitive::Integer),
    ("unsignedInt", Primitive::Integer),
    ("unsignedShort", Primitive::Integer),
    ("unsignedByte", Primitive::Integer),
    // Date/time types
    ("duration", Primitive::DateTime),
    ("dateTime", Primitive::DateTime),
    ("time", Primitive::DateTime),
    ("date", Primitive::DateTime),
    ("gYearMonth", Primitive::DateTime),
    ("gYear", Primitive::DateTime),
    ("gMonthDay", Primitive::DateTime),
    ("gDay", Primitive::DateTime),
    ("gMonth", Primitive::DateTime),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_family_collapses() {
        for name in ["int", "long", "short", "integer", "byte", "unsignedLong"] {
            let builtin = BuiltinType::lookup(name).unwrap();
            assert_eq!(builtin.primitive, Primitive::Integer, "{}", name);
            assert_eq!(builtin.primitive.go_type(), "int");
        }
    }

    #[test]
    fn test_date_time_is_text() {
        let builtin = BuiltinType::lookup("dateTime").unwrap();
        assert_eq!(builtin.primitive, Primitive::DateTime);
        assert_eq!(builtin.primitive.go_type(), "string");
    }

    #[test]
    fn test_numeric_and_boolean() {
        assert_eq!(BuiltinType::lookup("decimal").unwrap().primitive.go_type(), "float64");
        assert_eq!(BuiltinType::lookup("double").unwrap().primitive.go_type(), "float64");
        assert_eq!(BuiltinType::lookup("boolean").unwrap().primitive.go_type(), "bool");
    }

    #[test]
    fn test_unknown_builtin() {
        assert!(BuiltinType::lookup("notAType").is_none());
        assert!(BuiltinType::lookup("String").is_none());
    }
}
