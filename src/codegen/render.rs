//! Go source rendering
//!
//! Renders one struct definition per file, formatted the way `gofmt` would
//! leave it: tab indentation, sorted imports and column-aligned fields.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use super::fields::{FieldSpec, GoType};

/// First line of every generated file
pub const GENERATED_HEADER: &str = "// Code generated by xsdgo. DO NOT EDIT.";

/// Everything needed to render one generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StructFile {
    /// Package clause
    pub package: String,
    /// Imported packages: package name to import path
    pub imports: BTreeMap<String, String>,
    /// Struct name
    pub name: String,
    /// Doc comment lines of the struct
    pub documentation: Vec<String>,
    /// Embedded base struct
    pub base: Option<GoType>,
    /// Fields in declaration order
    pub fields: Vec<FieldSpec>,
}

impl StructFile {
    /// Render the file as Go source
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(GENERATED_HEADER);
        out.push_str("\n\n");
        let _ = writeln!(out, "package {}", self.package);

        if !self.imports.is_empty() {
            let mut imports: Vec<(&String, &String)> = self.imports.iter().collect();
            imports.sort_by(|a, b| a.1.cmp(b.1));

            out.push_str("\nimport (\n");
            for (package, path) in imports {
                if path.rsplit('/').next() == Some(package.as_str()) {
                    let _ = writeln!(out, "\t{:?}", path);
                } else {
                    let _ = writeln!(out, "\t{} {:?}", package, path);
                }
            }
            out.push_str(")\n");
        }

        out.push('\n');
        write_comment(&mut out, "", &self.documentation);

        if self.base.is_none() && self.fields.is_empty() {
            let _ = writeln!(out, "type {} struct{{}}", self.name);
            return out;
        }

        let _ = writeln!(out, "type {} struct {{", self.name);
        if let Some(base) = &self.base {
            let _ = writeln!(out, "\t{}", base);
        }

        let types: Vec<String> = self.fields.iter().map(FieldSpec::type_expr).collect();
        let name_width = self.fields.iter().map(|f| f.name.len()).max().unwrap_or(0);
        let type_width = types.iter().map(String::len).max().unwrap_or(0);

        for (field, ty) in self.fields.iter().zip(&types) {
            write_comment(&mut out, "\t", &field.documentation);
            let _ = writeln!(
                out,
                "\t{:name_width$} {:type_width$} `xml:\"{}\"`",
                field.name,
                ty,
                field.tag,
                name_width = name_width,
                type_width = type_width,
            );
        }
        out.push_str("}\n");
        out
    }
}

fn write_comment(out: &mut String, indent: &str, documentation: &[String]) {
    for line in documentation.iter().flat_map(|d| d.lines()) {
        let line = line.trim();
        if line.is_empty() {
            let _ = writeln!(out, "{}//", indent);
        } else {
            let _ = writeln!(out, "{}// {}", indent, line);
        }
    }
}
