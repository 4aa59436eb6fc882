//! The parsed document tree.
//!
//! `Document` owns a flat arena of element records; [`Node`] is a cheap
//! `Copy` handle into it. The data model follows the ElementTree split for
//! character data: an element's `text` is the data before its first child,
//! and each child's `tail` is the data between that child's end tag and the
//! next sibling. Stored text is unescaped; serialization re-escapes it.
//!
//! Comments, processing instructions and the XML declaration are not part
//! of the tree. CDATA sections merge into plain text, so they round-trip as
//! escaped character data rather than as CDATA.

use crate::error::Error;
use crate::view::View;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event as XmlEvent};
use std::hash::{Hash, Hasher};

pub(crate) type NodeId = usize;

#[derive(Debug)]
struct ElementData {
    tag: String,
    /// Attribute pairs in document order. A `Vec` rather than a map: order
    /// is part of the round-trip contract.
    attributes: Vec<(String, String)>,
    text: Option<String>,
    tail: Option<String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// An immutable parsed XML document.
///
/// All navigation handles ([`Node`], [`View`]) borrow the document and stay
/// valid for as long as it lives. The tree is never mutated after parsing,
/// so sharing it across threads needs no locking.
#[derive(Debug)]
pub struct Document {
    elements: Vec<ElementData>,
    root: NodeId,
}

impl Document {
    /// Parses a complete XML document from a string.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut builder = TreeBuilder::default();
        let mut reader = Reader::from_str(text);
        reader.config_mut().trim_text(false);
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                XmlEvent::Start(e) => builder.open(&e, false)?,
                XmlEvent::Empty(e) => builder.open(&e, true)?,
                XmlEvent::End(_) => builder.close(),
                XmlEvent::Text(e) => {
                    let raw = std::str::from_utf8(e.as_ref())?;
                    let text = quick_xml::escape::unescape(raw)?;
                    builder.append_text(&text);
                }
                XmlEvent::CData(e) => {
                    builder.append_text(std::str::from_utf8(&e)?);
                }
                XmlEvent::GeneralRef(e) => {
                    let name = std::str::from_utf8(&e)?;
                    builder.append_entity(name)?;
                }
                XmlEvent::Eof => break,
                // Declaration, comments, PIs and doctype are dropped.
                _ => {}
            }
            buf.clear();
        }
        builder.finish()
    }

    /// The root element as a bare node handle.
    pub fn root_node(&self) -> Node<'_> {
        Node {
            doc: self,
            id: self.root,
        }
    }

    /// The root element wrapped in a scalar [`View`], the usual entry point
    /// for navigation.
    pub fn root(&self) -> View<'_> {
        View::Single(self.root_node())
    }
}

/// Incremental arena builder driven by the quick-xml event loop.
#[derive(Default)]
struct TreeBuilder {
    elements: Vec<ElementData>,
    stack: Vec<NodeId>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    fn open(&mut self, e: &BytesStart<'_>, self_closing: bool) -> Result<(), Error> {
        let tag = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut attributes = Vec::new();
        for attr in e.attributes() {
            let attr = attr?;
            let name = std::str::from_utf8(attr.key.as_ref())?.to_string();
            let raw = std::str::from_utf8(&attr.value)?;
            attributes.push((name, quick_xml::escape::unescape(raw)?.into_owned()));
        }

        let parent = self.stack.last().copied();
        if parent.is_none() && self.root.is_some() {
            return Err(Error::Malformed("junk after document element".into()));
        }

        let id = self.elements.len();
        self.elements.push(ElementData {
            tag,
            attributes,
            text: None,
            tail: None,
            parent,
            children: Vec::new(),
        });
        match parent {
            Some(p) => self.elements[p].children.push(id),
            None => self.root = Some(id),
        }
        if !self_closing {
            self.stack.push(id);
        }
        Ok(())
    }

    fn close(&mut self) {
        self.stack.pop();
    }

    /// Routes character data to the open element's `text` or, once that
    /// element has children, to the last child's `tail`.
    fn append_text(&mut self, chunk: &str) {
        let Some(&current) = self.stack.last() else {
            // Whitespace around the root element is not part of the tree.
            return;
        };
        let slot = match self.elements[current].children.last().copied() {
            Some(last_child) => &mut self.elements[last_child].tail,
            None => &mut self.elements[current].text,
        };
        match slot {
            Some(s) => s.push_str(chunk),
            None => *slot = Some(chunk.to_string()),
        }
    }

    fn append_entity(&mut self, name: &str) -> Result<(), Error> {
        let resolved = resolve_entity(name)?;
        let mut buf = [0u8; 4];
        self.append_text(resolved.encode_utf8(&mut buf));
        Ok(())
    }

    fn finish(self) -> Result<Document, Error> {
        if let Some(&open) = self.stack.last() {
            return Err(Error::Malformed(format!(
                "unclosed element <{}>",
                self.elements[open].tag
            )));
        }
        let root = self
            .root
            .ok_or_else(|| Error::Malformed("no root element".into()))?;
        log::debug!(
            "parsed document: {} elements, root <{}>",
            self.elements.len(),
            self.elements[root].tag
        );
        Ok(Document {
            elements: self.elements,
            root,
        })
    }
}

/// Resolves the predefined entities and numeric character references.
/// Anything else is an undefined entity and fails the parse.
fn resolve_entity(name: &str) -> Result<char, Error> {
    match name {
        "amp" => Ok('&'),
        "lt" => Ok('<'),
        "gt" => Ok('>'),
        "apos" => Ok('\''),
        "quot" => Ok('"'),
        _ => {
            let code = match name.strip_prefix("#x").or_else(|| name.strip_prefix("#X")) {
                Some(hex) => u32::from_str_radix(hex, 16).ok(),
                None => name.strip_prefix('#').and_then(|dec| dec.parse().ok()),
            };
            code.and_then(char::from_u32)
                .ok_or_else(|| Error::UnknownEntity(name.to_string()))
        }
    }
}

/// A read-only handle to one element of a [`Document`].
///
/// Equality, ordering and hashing are id-based, i.e. reference semantics on
/// the underlying tree position.
#[derive(Clone, Copy)]
pub struct Node<'a> {
    doc: &'a Document,
    id: NodeId,
}

impl<'a> Node<'a> {
    fn data(&self) -> &'a ElementData {
        &self.doc.elements[self.id]
    }

    pub fn tag(&self) -> &'a str {
        &self.data().tag
    }

    /// Character data before the first child, unescaped.
    pub fn text(&self) -> Option<&'a str> {
        self.data().text.as_deref()
    }

    /// Character data between this element's end tag and the next sibling.
    pub fn tail(&self) -> Option<&'a str> {
        self.data().tail.as_deref()
    }

    /// Attribute pairs in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&'a str, &'a str)> + use<'a> {
        self.data()
            .attributes
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn attribute(&self, name: &str) -> Option<&'a str> {
        self.data()
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn children(&self) -> impl Iterator<Item = Node<'a>> + use<'a> {
        let doc = self.doc;
        self.data().children.iter().map(move |&id| Node { doc, id })
    }

    pub fn has_children(&self) -> bool {
        !self.data().children.is_empty()
    }

    pub fn parent(&self) -> Option<Node<'a>> {
        let doc = self.doc;
        self.data().parent.map(|id| Node { doc, id })
    }
}

impl std::fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Node")
            .field("id", &self.id)
            .field("tag", &self.tag())
            .finish()
    }
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Node<'_> {}

impl PartialOrd for Node<'_> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Node<'_> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.id.cmp(&other.id)
    }
}

impl Hash for Node<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}
