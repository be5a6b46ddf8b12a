//! XML and Go name utilities
//!
//! This module splits XML QNames and derives the Go identifiers used in
//! generated code: exported field and struct names, package names and file
//! names.

use once_cell::sync::Lazy;
use regex::Regex;

static GO_IDENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// Separators that end a word when building Go identifiers
const WORD_SEPARATORS: [char; 4] = ['-', '.', '_', ' '];

/// Go keywords, which can never be package names
const GO_KEYWORDS: [&str; 25] = [
    "break", "case", "chan", "const", "continue", "default", "defer", "else", "fallthrough",
    "for", "func", "go", "goto", "if", "import", "interface", "map", "package", "range",
    "return", "select", "struct", "switch", "type", "var",
];

/// Split a QName into prefix and local name
pub fn split_qname(qname: &str) -> (Option<&str>, &str) {
    if let Some((prefix, local)) = qname.split_once(':') {
        (Some(prefix), local)
    } else {
        (None, qname)
    }
}

/// Check if a string is a valid Go identifier (ASCII subset)
pub fn is_go_identifier(name: &str) -> bool {
    GO_IDENT.is_match(name)
}

/// Check if a string can be used as a Go package name
pub fn is_valid_package_name(name: &str) -> bool {
    is_go_identifier(name) && !GO_KEYWORDS.contains(&name)
}

/// Turn an XML local name into an exported Go identifier
///
/// The first letter of every word is upper-cased and separators are
/// dropped: `order-line.id` becomes `OrderLineId`. Characters that cannot
/// appear in a Go identifier are removed, and a leading digit gets an `X`
/// prefix.
pub fn export_name(xml_name: &str) -> String {
    let mut out = String::with_capacity(xml_name.len());
    let mut upper_next = true;

    for c in xml_name.chars() {
        if WORD_SEPARATORS.contains(&c) {
            upper_next = true;
        } else if c.is_ascii_alphanumeric() {
            if upper_next {
                out.push(c.to_ascii_uppercase());
                upper_next = false;
            } else {
                out.push(c);
            }
        }
    }

    match out.chars().next() {
        None => "X".to_string(),
        Some(first) if first.is_ascii_digit() => format!("X{}", out),
        Some(_) => out,
    }
}

/// Derive a Go package name from a namespace URI
///
/// The last non-empty segment of the URI (split on `/`, `:` and `#`) is
/// lower-cased and reduced to ASCII alphanumerics, with a trailing file
/// extension and version-only segments skipped: `urn:a` gives `a`,
/// `http://example.com/schemas/Order.xsd` gives `order`.
pub fn package_from_namespace(namespace: &str) -> String {
    let segments: Vec<&str> = namespace
        .split(['/', ':', '#'])
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut candidate = String::new();
    for segment in segments.iter().rev() {
        let stem = match segment.rsplit_once('.') {
            Some((stem, ext)) if !stem.is_empty() && ext.chars().all(|c| c.is_ascii_alphabetic()) => stem,
            _ => segment,
        };
        let cleaned: String = stem
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        if cleaned.chars().any(|c| c.is_ascii_alphabetic()) {
            candidate = cleaned;
            break;
        }
    }

    if candidate.is_empty() {
        return "ns".to_string();
    }
    if candidate.starts_with(|c: char| c.is_ascii_digit()) || GO_KEYWORDS.contains(&candidate.as_str()) {
        candidate.insert_str(0, "ns");
    }
    candidate
}

/// File name (without directory) for a generated struct
///
/// `PurchaseOrderType` becomes `purchase_order_type.go`.
pub fn file_name_for(struct_name: &str) -> String {
    let mut out = String::with_capacity(struct_name.len() + 4);
    let chars: Vec<char> = struct_name.chars().collect();

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() {
            let prev_lower = i > 0 && (chars[i - 1].is_ascii_lowercase() || chars[i - 1].is_ascii_digit());
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_ascii_lowercase());
            let prev_upper = i > 0 && chars[i - 1].is_ascii_uppercase();
            if i > 0 && (prev_lower || (prev_upper && next_lower)) {
                out.push('_');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }

    out.push_str(".go");
    out
}
