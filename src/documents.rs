//! Schema document trees
//!
//! A parsed schema file is kept as an owned tree of [`Element`]s built from
//! a `roxmltree` parse. Every element remembers its in-scope namespace
//! bindings (needed to resolve `type="p:Name"` values) and its byte range in
//! the source, so errors can quote the offending XML verbatim.

use crate::error::Result;
use crate::limits::Limits;
use crate::namespaces::{NamespaceContext, QName};
use crate::XSD_NAMESPACE;
use indexmap::IndexMap;
use std::ops::Range;

/// XML Element in the document tree
#[derive(Debug, Clone)]
pub struct Element {
    /// Element qualified name
    pub qname: QName,
    /// Unqualified attributes by local name, in document order
    pub attributes: IndexMap<String, String>,
    /// Concatenated direct text content (if any)
    pub text: Option<String>,
    /// Child elements
    pub children: Vec<Element>,
    /// In-scope namespace bindings
    pub namespaces: NamespaceContext,
    /// Byte range of the element in the document source
    pub range: Range<usize>,
}

impl Element {
    /// Get the local name of the element
    pub fn local_name(&self) -> &str {
        &self.qname.local_name
    }

    /// Get the namespace of the element
    pub fn namespace(&self) -> Option<&str> {
        self.qname.namespace.as_deref()
    }

    /// Get an attribute value by local name
    pub fn get_attribute(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    /// Whether this is the XSD element with the given local name
    pub fn is_xsd(&self, local_name: &str) -> bool {
        self.namespace() == Some(XSD_NAMESPACE) && self.local_name() == local_name
    }

    /// Child elements in the XSD namespace
    pub fn xsd_children(&self) -> impl Iterator<Item = &Element> {
        self.children
            .iter()
            .filter(|e| e.namespace() == Some(XSD_NAMESPACE))
    }

    /// XSD child elements with the given local name
    pub fn find_children<'a>(&'a self, local_name: &'a str) -> impl Iterator<Item = &'a Element> + 'a {
        self.xsd_children().filter(move |e| e.local_name() == local_name)
    }

    /// First XSD child element with the given local name
    pub fn find_child(&self, local_name: &str) -> Option<&Element> {
        self.xsd_children().find(|e| e.local_name() == local_name)
    }

    /// Text of `annotation/documentation` children, trimmed, empty ones dropped
    pub fn documentation(&self) -> Vec<String> {
        self.find_children("annotation")
            .flat_map(|a| a.find_children("documentation"))
            .filter_map(|d| d.text.as_deref())
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// Parsed schema document
#[derive(Debug)]
pub struct Document {
    /// Original source text
    source: String,
    /// Root element of the document
    root: Element,
}

impl Document {
    /// Parse a document from source text
    pub fn parse(source: String, limits: &Limits) -> Result<Self> {
        let root = {
            let xml = roxmltree::Document::parse(&source)?;
            build_element(xml.root_element(), 0, limits)?
        };
        Ok(Self { source, root })
    }

    /// Get the root element
    pub fn root(&self) -> &Element {
        &self.root
    }

    /// Original source text
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Serialized XML of an element of this document
    pub fn fragment(&self, range: &Range<usize>) -> &str {
        self.source.get(range.clone()).unwrap_or("")
    }
}

fn build_element(node: roxmltree::Node<'_, '_>, depth: usize, limits: &Limits) -> Result<Element> {
    limits.check_xml_depth(depth)?;

    let tag = node.tag_name();
    let qname = QName::new(tag.namespace(), tag.name());

    let mut namespaces = NamespaceContext::new();
    for ns in node.namespaces() {
        match ns.name() {
            Some(prefix) => namespaces.add_prefix(prefix, ns.uri()),
            None => namespaces.set_default_namespace(ns.uri()),
        }
    }

    let attributes = node
        .attributes()
        .filter(|a| a.namespace().is_none())
        .map(|a| (a.name().to_string(), a.value().to_string()))
        .collect();

    let mut text: Option<String> = None;
    let mut children = Vec::new();
    for child in node.children() {
        if child.is_element() {
            children.push(build_element(child, depth + 1, limits)?);
        } else if child.is_text() {
            if let Some(t) = child.text() {
                text.get_or_insert_with(String::new).push_str(t);
            }
        }
    }

    Ok(Element {
        qname,
        attributes,
        text,
        children,
        namespaces,
        range: node.range(),
    })
}
