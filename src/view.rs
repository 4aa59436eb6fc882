//! The polymorphic view layer.
//!
//! [`View`] is the navigation entity: a tagged variant over one node
//! (`Single`) or an ordered node sequence (`Many`), unified behind one
//! lookup and serialization contract so callers never need to know in
//! advance whether a tag occurs once, many times or not at all. Views are
//! built fresh on every lookup, never cached, and never mutated.
//!
//! Lookups that terminate in an attribute string are carried by [`Value`],
//! which keeps path lookups chainable while attribute lookups bypass view
//! construction entirely.
//!
//! Tag lookups go exclusively through [`View::get`]; the fixed method
//! vocabulary (`tag`, `keys`, `dumps`, `unpack`, `unwrap`, ...) is ordinary
//! methods and can therefore never be shadowed by a document that happens
//! to contain elements with those names.

use crate::dom::Node;
use crate::error::Error;
use crate::key::{Key, parse_key};
use crate::resolve::resolve;
use crate::serialize;
use itertools::Itertools;
use std::fmt;
use std::ops::{Bound, RangeBounds};

/// A read-only navigational projection over the parsed tree.
#[derive(Debug, Clone)]
pub enum View<'a> {
    /// Exactly one element.
    Single(Node<'a>),
    /// An ordered element sequence. Non-empty except as the designated
    /// result of a forced-list lookup with zero matches (or an empty
    /// slice), which is a valid value and not an error.
    Many(Vec<Node<'a>>),
}

/// The result of a lookup: element nodes for path keys, a plain string for
/// `@attribute` keys.
#[derive(Debug, Clone)]
pub enum Value<'a> {
    Text(String),
    Nodes(View<'a>),
}

impl<'a> View<'a> {
    /// Looks up `key` (attribute or path expression, see [`crate::key`])
    /// against this view.
    ///
    /// Path outcomes: zero matches fail with [`Error::NoSuchChild`] unless
    /// the key carries a trailing `[]`, which turns them into an empty
    /// list; one match yields a scalar view (or a one-element list under
    /// `[]`); several matches yield a list in document order.
    pub fn get(&self, key: &str) -> Result<Value<'a>, Error> {
        match parse_key(key)? {
            Key::Attribute(name) => self.attribute_value(key, &name),
            Key::Path(path) => {
                let context = self.context_nodes();
                let matches = resolve(&context, &path);
                log::trace!("key '{}' matched {} node(s)", key, matches.len());
                if matches.is_empty() {
                    if path.forced_list {
                        Ok(Value::Nodes(View::Many(Vec::new())))
                    } else {
                        Err(Error::NoSuchChild {
                            key: key.to_string(),
                        })
                    }
                } else if matches.len() == 1 && !path.forced_list {
                    Ok(Value::Nodes(View::Single(matches[0])))
                } else {
                    Ok(Value::Nodes(View::Many(matches)))
                }
            }
        }
    }

    /// The wrapped tag for a scalar view, `None` for a list.
    pub fn tag(&self) -> Option<&'a str> {
        match self {
            View::Single(node) => Some(node.tag()),
            View::Many(_) => None,
        }
    }

    /// Member tags in order; a scalar view is its own single member.
    pub fn tags(&self) -> Vec<&'a str> {
        match self {
            View::Single(node) => vec![node.tag()],
            View::Many(nodes) => nodes.iter().map(|n| n.tag()).collect(),
        }
    }

    /// The lookup-key set: attribute names prefixed with `@` (attribute
    /// order), then distinct child tags (document order). For a list view,
    /// the deduplicated concatenation of member key sets.
    pub fn keys(&self) -> Vec<String> {
        match self {
            View::Single(node) => node_keys(*node),
            View::Many(nodes) => nodes
                .iter()
                .flat_map(|n| node_keys(*n))
                .unique()
                .collect(),
        }
    }

    /// Member count: 1 for a scalar view.
    pub fn len(&self) -> usize {
        match self {
            View::Single(_) => 1,
            View::Many(nodes) => nodes.len(),
        }
    }

    /// The truthiness projection: true iff the trimmed value form is empty.
    /// Note that this is about content, not member count; a one-element
    /// list around an empty element is also empty.
    pub fn is_empty(&self) -> bool {
        match self {
            View::Single(node) => serialize::value_xml(*node).is_empty(),
            View::Many(nodes) => match nodes.len() {
                0 => true,
                1 => serialize::value_xml(nodes[0]).is_empty(),
                _ => false,
            },
        }
    }

    /// Canonical outer serialization: tag, attributes and full content,
    /// reproducing the original parse. For a list, the concatenation of
    /// member outer forms in document order with no separators.
    pub fn dumps(&self) -> String {
        match self {
            View::Single(node) => serialize::outer_xml(*node),
            View::Many(nodes) => nodes.iter().map(|n| serialize::outer_xml(*n)).collect(),
        }
    }

    /// List indexing with Python-style negative indices. Fails with
    /// [`Error::UnsupportedIndex`] on a scalar view and
    /// [`Error::IndexOutOfRange`] outside the list bounds.
    pub fn at(&self, index: isize) -> Result<View<'a>, Error> {
        let View::Many(nodes) = self else {
            return Err(Error::UnsupportedIndex {
                reason: "cannot index into a scalar view".to_string(),
            });
        };
        let len = nodes.len();
        let resolved = if index < 0 { index + len as isize } else { index };
        if resolved < 0 || resolved >= len as isize {
            return Err(Error::IndexOutOfRange { index, len });
        }
        Ok(View::Single(nodes[resolved as usize]))
    }

    /// List slicing with Python-style negative bounds and clamping. An
    /// empty result is the designated empty list, not an error.
    pub fn slice<R: RangeBounds<isize>>(&self, range: R) -> Result<View<'a>, Error> {
        let View::Many(nodes) = self else {
            return Err(Error::UnsupportedIndex {
                reason: "cannot slice a scalar view".to_string(),
            });
        };
        let len = nodes.len() as isize;
        let start = match range.start_bound() {
            Bound::Included(&s) => s,
            Bound::Excluded(&s) => s + 1,
            Bound::Unbounded => 0,
        };
        let end = match range.end_bound() {
            Bound::Included(&e) => e + 1,
            Bound::Excluded(&e) => e,
            Bound::Unbounded => len,
        };
        let clamp = |i: isize| {
            let i = if i < 0 { i + len } else { i };
            i.clamp(0, len) as usize
        };
        let (start, end) = (clamp(start), clamp(end));
        let members = if start < end {
            nodes[start..end].to_vec()
        } else {
            Vec::new()
        };
        Ok(View::Many(members))
    }

    /// Iterates members as scalar views; a scalar view yields itself once,
    /// so template loops behave identically for one match and for many.
    pub fn iter(&self) -> std::vec::IntoIter<View<'a>> {
        let members: Vec<View<'a>> = match self {
            View::Single(_) => vec![self.clone()],
            View::Many(nodes) => nodes.iter().map(|&n| View::Single(n)).collect(),
        };
        members.into_iter()
    }

    fn context_nodes(&self) -> Vec<Node<'a>> {
        match self {
            View::Single(node) => vec![*node],
            View::Many(nodes) => nodes.clone(),
        }
    }

    fn attribute_value(&self, key: &str, name: &str) -> Result<Value<'a>, Error> {
        let node = match self {
            View::Single(node) => *node,
            View::Many(nodes) if nodes.len() == 1 => nodes[0],
            View::Many(nodes) => {
                return Err(Error::InvalidKey {
                    key: key.to_string(),
                    reason: format!(
                        "attribute lookup needs exactly one element, list has {}",
                        nodes.len()
                    ),
                });
            }
        };
        match node.attribute(name) {
            Some(value) => Ok(Value::Text(value.to_string())),
            None => Err(Error::NoSuchAttribute {
                name: name.to_string(),
            }),
        }
    }
}

/// The lookup-key set of one element; see [`View::keys`].
pub(crate) fn node_keys(node: Node<'_>) -> Vec<String> {
    let attributes = node.attributes().map(|(name, _)| format!("@{}", name));
    let child_tags = node.children().map(|c| c.tag().to_string()).unique();
    attributes.chain(child_tags).collect()
}

impl fmt::Display for View<'_> {
    /// The value form: trimmed inner content for a scalar, the sole
    /// member's value for a one-element list, and a debug-style bracketed
    /// listing for longer lists (inspection output, not re-parseable).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Single(node) => f.write_str(&serialize::value_xml(*node)),
            View::Many(nodes) => match nodes.len() {
                0 => Ok(()),
                1 => f.write_str(&serialize::value_xml(nodes[0])),
                _ => {
                    let values: Vec<String> =
                        nodes.iter().map(|n| serialize::value_xml(*n)).collect();
                    write!(f, "{:?}", values)
                }
            },
        }
    }
}

impl<'a> IntoIterator for &View<'a> {
    type Item = View<'a>;
    type IntoIter = std::vec::IntoIter<View<'a>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a> Value<'a> {
    /// Chains a further lookup; fails on attribute strings, which have no
    /// interior structure.
    pub fn get(&self, key: &str) -> Result<Value<'a>, Error> {
        match self {
            Value::Nodes(view) => view.get(key),
            Value::Text(_) => Err(Error::InvalidKey {
                key: key.to_string(),
                reason: "cannot look up inside an attribute value".to_string(),
            }),
        }
    }

    pub fn as_view(&self) -> Option<&View<'a>> {
        match self {
            Value::Nodes(view) => Some(view),
            Value::Text(_) => None,
        }
    }

    pub fn into_view(self) -> Option<View<'a>> {
        match self {
            Value::Nodes(view) => Some(view),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            Value::Nodes(_) => None,
        }
    }

    /// Outer serialization; an attribute string serializes as itself.
    pub fn dumps(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Nodes(view) => view.dumps(),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Value::Text(s) => s.is_empty(),
            Value::Nodes(view) => view.is_empty(),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Nodes(view) => fmt::Display::fmt(view, f),
        }
    }
}
