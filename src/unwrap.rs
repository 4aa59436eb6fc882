//! The two derived algorithms: `unpack` (single-chain collapse down to the
//! first row-like level) and `unwrap` (full recursive conversion to plain
//! `serde_json::Value` data).

use crate::dom::Node;
use crate::serialize;
use crate::view::{View, node_keys};
use itertools::Itertools;
use serde_json::{Map, Value as JsonValue};

impl<'a> View<'a> {
    /// Collapses a chain of single-wrapping elements down to the first
    /// row-like level, returned as a list view.
    ///
    /// A level is row-like when its distinct child-tag count is 0 or >= 2
    /// (no children, or already heterogeneous content), or when its own tag
    /// equals `stop_tag`. A level with exactly one distinct child tag is a
    /// wrapper: descend into all direct children and continue. Lists are
    /// already the terminal row level, so `unpack` on a list view is the
    /// identity.
    pub fn unpack(&self, stop_tag: Option<&str>) -> View<'a> {
        match self {
            View::Many(nodes) => View::Many(nodes.clone()),
            View::Single(node) => {
                if stop_tag == Some(node.tag()) {
                    return View::Many(vec![*node]);
                }
                let distinct_tags = node.children().map(|c| c.tag()).unique().count();
                if distinct_tags != 1 {
                    return View::Many(vec![*node]);
                }
                let children: Vec<Node<'a>> = node.children().collect();
                if children.len() == 1 {
                    View::Single(children[0]).unpack(stop_tag)
                } else {
                    View::Many(children)
                }
            }
        }
    }

    /// Recursively converts the view into plain associative/sequence data,
    /// e.g. for feeding a JSON encoder or a template engine.
    ///
    /// An element with lookup keys becomes an object over those keys
    /// (`@name` attributes first, then distinct child tags; repeated tags
    /// become arrays); a keyless element becomes its trimmed value string;
    /// a list becomes an array. Loose text of an element that also has
    /// children is not represented.
    pub fn unwrap(&self) -> JsonValue {
        match self {
            View::Single(node) => unwrap_node(*node),
            View::Many(nodes) => {
                JsonValue::Array(nodes.iter().map(|&n| unwrap_node(n)).collect())
            }
        }
    }
}

/// The copy-out conversion: a view converts into plain JSON data.
impl From<&View<'_>> for JsonValue {
    fn from(view: &View<'_>) -> Self {
        view.unwrap()
    }
}

fn unwrap_node(node: Node<'_>) -> JsonValue {
    let keys = node_keys(node);
    if keys.is_empty() {
        return JsonValue::String(serialize::value_xml(node));
    }

    let mut map = Map::new();
    for (name, value) in node.attributes() {
        map.insert(format!("@{}", name), JsonValue::String(value.to_string()));
    }
    for tag in node.children().map(|c| c.tag()).unique() {
        let matches: Vec<Node<'_>> = node.children().filter(|c| c.tag() == tag).collect();
        let value = if matches.len() == 1 {
            unwrap_node(matches[0])
        } else {
            JsonValue::Array(matches.into_iter().map(unwrap_node).collect())
        };
        map.insert(tag.to_string(), value);
    }
    JsonValue::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use serde_json::json;

    fn doc(text: &str) -> Document {
        Document::parse(text).unwrap()
    }

    #[test]
    fn test_unpack_reaches_repeating_rows() {
        let d = doc("<r0><r1><r2><r3><d>1</d><d>2</d></r3></r2></r1></r0>");
        let rows = d.root().unpack(None);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows.dumps(), "<d>1</d><d>2</d>");
    }

    #[test]
    fn test_unpack_single_descendant_stops_at_row_level() {
        let d = doc("<r0><r1><r2><d>1</d></r2></r1></r0>");
        let rows = d.root().unpack(None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.dumps(), "<d>1</d>");
    }

    #[test]
    fn test_unpack_heterogeneous_level_is_terminal() {
        let d = doc("<r><w><a>1</a><b>2</b></w></r>");
        let rows = d.root().unpack(None);
        // <w> has two distinct child tags, so the chain stops there.
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.tags(), vec!["w"]);
    }

    #[test]
    fn test_unpack_respects_stop_tag() {
        let d = doc("<r0><r1><r2><d>1</d></r2></r1></r0>");
        let rows = d.root().unpack(Some("r2"));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.tags(), vec!["r2"]);
    }

    #[test]
    fn test_unpack_on_list_is_identity() {
        let d = doc("<r><a><k>1</k></a><a><k>2</k></a></r>");
        let list = d.root().get("a").unwrap().into_view().unwrap();
        let unpacked = list.unpack(None);
        assert_eq!(unpacked.dumps(), list.dumps());
    }

    #[test]
    fn test_unpack_leaf_wraps_itself() {
        let d = doc("<only>text</only>");
        let rows = d.root().unpack(None);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows.dumps(), "<only>text</only>");
    }

    #[test]
    fn test_unwrap_fidelity() {
        let d = doc(r#"<r p="@p"><a>a</a><a><aa>aa</aa><ab>ab</ab></a><b>b</b></r>"#);
        assert_eq!(
            d.root().unwrap(),
            json!({
                "@p": "@p",
                "a": ["a", {"aa": "aa", "ab": "ab"}],
                "b": "b"
            })
        );
    }

    #[test]
    fn test_unwrap_leaf_is_trimmed_string() {
        let d = doc("<x>\n  1\n</x>");
        assert_eq!(d.root().unwrap(), json!("1"));
    }

    #[test]
    fn test_unwrap_list_is_array() {
        let d = doc("<r><a>1</a><a>2</a></r>");
        let a = d.root().get("a").unwrap().into_view().unwrap();
        assert_eq!(a.unwrap(), json!(["1", "2"]));
    }

    #[test]
    fn test_unwrap_attribute_and_child_tag_namespaces_never_collide() {
        // The element has both an attribute `n` and children tagged `n`;
        // the `@` prefix keeps the two apart in the key set.
        let d = doc(r#"<r n="attr"><n>one</n><n>two</n></r>"#);
        assert_eq!(
            d.root().unwrap(),
            json!({"@n": "attr", "n": ["one", "two"]})
        );
    }

    #[test]
    fn test_unwrap_preserves_document_key_order() {
        let d = doc(r#"<r z="1" a="2"><beta/><alpha/></r>"#);
        let JsonValue::Object(map) = d.root().unwrap() else {
            panic!("expected an object");
        };
        let keys: Vec<&String> = map.keys().collect();
        assert_eq!(keys, vec!["@z", "@a", "beta", "alpha"]);
    }
}
