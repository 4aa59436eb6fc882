//! Text projections over the parsed tree.
//!
//! Two forms exist and they are deliberately different:
//!
//! * the *outer form* ([`outer_xml`]) is the tag-inclusive serialization
//!   used for round-trips. It reproduces the original parse byte for byte
//!   for documents that use only the escaping the serializer emits, and is
//!   always a fixed point of parse-then-serialize. A node's own tail is
//!   never part of its outer form.
//! * the *inner form* ([`inner_xml`], trimmed by [`value_xml`]) is the
//!   "value" a template sees: leading text plus each child's outer form and
//!   tail, with no wrapping tag.

use crate::dom::Node;
use quick_xml::escape::partial_escape;

/// Serializes the element, its attributes and its full content.
pub fn outer_xml(node: Node<'_>) -> String {
    let mut out = String::new();
    write_outer(node, &mut out);
    out
}

/// The element's content without the wrapping tag: leading text, then each
/// child's outer form followed by that child's tail.
pub fn inner_xml(node: Node<'_>) -> String {
    let mut out = String::new();
    write_inner(node, &mut out);
    out
}

/// Inner form trimmed of leading/trailing whitespace; the value semantics
/// used for string conversion, truthiness and unwrapping.
pub fn value_xml(node: Node<'_>) -> String {
    inner_xml(node).trim().to_string()
}

fn write_outer(node: Node<'_>, out: &mut String) {
    out.push('<');
    out.push_str(node.tag());
    for (name, value) in node.attributes() {
        out.push(' ');
        out.push_str(name);
        out.push_str("=\"");
        escape_attribute(value, out);
        out.push('"');
    }
    if node.text().is_none() && !node.has_children() {
        out.push_str("/>");
        return;
    }
    out.push('>');
    write_inner(node, out);
    out.push_str("</");
    out.push_str(node.tag());
    out.push('>');
}

fn write_inner(node: Node<'_>, out: &mut String) {
    if let Some(text) = node.text() {
        out.push_str(&partial_escape(text));
    }
    for child in node.children() {
        write_outer(child, out);
        if let Some(tail) = child.tail() {
            out.push_str(&partial_escape(tail));
        }
    }
}

/// Attribute-value escaping: `&`, `<` and the delimiting quote. Apostrophes
/// and `>` stay literal so that attribute values containing them round-trip
/// byte for byte.
fn escape_attribute(value: &str, out: &mut String) {
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            c => out.push(c),
        }
    }
}
