//! Evaluates parsed path expressions against the tree.
//!
//! Each step collects nodes along its axis from the whole context set, with
//! a seen-set so overlapping descendant expansions cannot yield duplicates,
//! then filters by the step's name test. Traversal is pre-order, so results
//! come out in document order without a sort.

use crate::dom::Node;
use crate::key::{Axis, NameTest, PathExpr, Step};
use std::collections::HashSet;

/// Resolves `path` against the ordered context set, producing the ordered
/// set of matching nodes. Re-walks the tree on every call; nothing is
/// cached, which is sound because the tree is immutable.
pub fn resolve<'a>(context: &[Node<'a>], path: &PathExpr) -> Vec<Node<'a>> {
    let mut current: Vec<Node<'a>> = context.to_vec();
    for step in &path.steps {
        current = evaluate_step(&current, step);
    }
    current
}

fn evaluate_step<'a>(context: &[Node<'a>], step: &Step) -> Vec<Node<'a>> {
    let mut seen = HashSet::new();
    let mut collected = Vec::new();
    for &node in context {
        match step.axis {
            Axis::Child => collect_child_nodes(node, &mut seen, &mut collected),
            Axis::Descendant => collect_descendant_nodes(node, &mut seen, &mut collected),
        }
    }
    filter_by_name_test(collected, &step.test)
}

fn add_node<'a>(node: Node<'a>, seen: &mut HashSet<Node<'a>>, results: &mut Vec<Node<'a>>) {
    if seen.insert(node) {
        results.push(node);
    }
}

fn collect_child_nodes<'a>(
    node: Node<'a>,
    seen: &mut HashSet<Node<'a>>,
    results: &mut Vec<Node<'a>>,
) {
    for child in node.children() {
        add_node(child, seen, results);
    }
}

fn collect_descendant_nodes<'a>(
    node: Node<'a>,
    seen: &mut HashSet<Node<'a>>,
    results: &mut Vec<Node<'a>>,
) {
    for child in node.children() {
        add_node(child, seen, results);
        collect_descendant_nodes(child, seen, results);
    }
}

fn filter_by_name_test<'a>(nodes: Vec<Node<'a>>, test: &NameTest) -> Vec<Node<'a>> {
    match test {
        NameTest::Wildcard => nodes,
        NameTest::Name(name) => nodes
            .into_iter()
            .filter(|node| node.tag() == name.as_str())
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::Document;
    use crate::key::{Key, parse_key};

    fn path_of(key: &str) -> PathExpr {
        match parse_key(key).unwrap() {
            Key::Path(p) => p,
            Key::Attribute(_) => panic!("expected a path key"),
        }
    }

    fn tags<'a>(nodes: &[Node<'a>]) -> Vec<&'a str> {
        nodes.iter().map(|n| n.tag()).collect()
    }

    #[test]
    fn test_child_step() {
        let doc = Document::parse("<r><a>1</a><b/><a>2</a></r>").unwrap();
        let root = doc.root_node();
        let matches = resolve(&[root], &path_of("a"));
        assert_eq!(tags(&matches), vec!["a", "a"]);
        assert_eq!(matches[0].text(), Some("1"));
        assert_eq!(matches[1].text(), Some("2"));
    }

    #[test]
    fn test_wildcard_matches_all_children() {
        let doc = Document::parse("<r><a/><b/><c/></r>").unwrap();
        let matches = resolve(&[doc.root_node()], &path_of("*"));
        assert_eq!(tags(&matches), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let doc =
            Document::parse("<r><x><k>1</k></x><k>2</k><y><z><k>3</k></z></y></r>").unwrap();
        let matches = resolve(&[doc.root_node()], &path_of(".//k"));
        let texts: Vec<_> = matches.iter().map(|n| n.text().unwrap()).collect();
        assert_eq!(texts, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_compound_path() {
        let doc = Document::parse("<r><a><b>hit</b></a><b>miss</b></r>").unwrap();
        let matches = resolve(&[doc.root_node()], &path_of("a/b"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].text(), Some("hit"));
    }

    #[test]
    fn test_descendant_then_child() {
        let doc = Document::parse("<r><w><a><b>1</b></a></w><a><b>2</b></a></r>").unwrap();
        let matches = resolve(&[doc.root_node()], &path_of(".//a/b"));
        let texts: Vec<_> = matches.iter().map(|n| n.text().unwrap()).collect();
        assert_eq!(texts, vec!["1", "2"]);
    }

    #[test]
    fn test_overlapping_contexts_deduplicate() {
        // Both <r> and <x> are context nodes; <x>'s subtree would otherwise
        // be collected twice by the descendant step.
        let doc = Document::parse("<r><x><k>1</k></x></r>").unwrap();
        let root = doc.root_node();
        let x = root.children().next().unwrap();
        let matches = resolve(&[root, x], &path_of(".//k"));
        assert_eq!(matches.len(), 1);
    }

    #[test]
    fn test_zero_matches_is_empty() {
        let doc = Document::parse("<r><a/></r>").unwrap();
        assert!(resolve(&[doc.root_node()], &path_of("missing")).is_empty());
    }
}
