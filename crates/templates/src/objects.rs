//! Canvas object-graph traversal.
//!
//! The editor's canvas serializes to a JSON tree where group nodes carry
//! an `objects` array. Leaves are addressed by the path of array indices
//! from the root, which is also how edits are applied in the page.

use serde_json::Value;

/// Flatten the object graph into (index path, leaf) pairs.
pub fn flatten(root: &Value) -> Vec<(Vec<usize>, Value)> {
    let mut out = Vec::new();
    walk(root, Vec::new(), &mut out);
    out
}

fn walk(node: &Value, path: Vec<usize>, out: &mut Vec<(Vec<usize>, Value)>) {
    match node.get("objects").and_then(Value::as_array) {
        None => out.push((path, node.clone())),
        Some(children) => {
            for (i, child) in children.iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(i);
                walk(child, child_path, out);
            }
        },
    }
}

/// Leaves carrying editable text, with newlines escaped for one-line
/// display.
pub fn text_nodes(root: &Value) -> Vec<(Vec<usize>, String)> {
    flatten(root)
        .into_iter()
        .filter_map(|(path, node)| {
            node.get("text")
                .and_then(Value::as_str)
                .map(|text| (path, text.replace('\n', "\\n")))
        })
        .collect()
}

/// One-line display form of a text node: `` `2.1`: text ``.
pub fn format_node(path: &[usize], text: &str) -> String {
    let joined = path
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(".");
    format!("`{joined}`: {text}")
}

#[allow(clippy::unwrap_used)]
#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!({
            "objects": [
                { "text": "Title\nLine", "fontSize": 40 },
                { "objects": [
                    { "text": "Nested" },
                    { "fill": "#fff" }
                ]},
            ]
        })
    }

    #[test]
    fn flatten_assigns_index_paths() {
        let leaves = flatten(&sample());
        let paths: Vec<_> = leaves.iter().map(|(p, _)| p.clone()).collect();
        assert_eq!(paths, vec![vec![0], vec![1, 0], vec![1, 1]]);
    }

    #[test]
    fn text_nodes_filter_and_escape() {
        let nodes = text_nodes(&sample());
        assert_eq!(nodes.len(), 2);
        assert_eq!(nodes[0], (vec![0], "Title\\nLine".to_string()));
        assert_eq!(nodes[1], (vec![1, 0], "Nested".to_string()));
    }

    #[test]
    fn node_formatting() {
        assert_eq!(format_node(&[2, 1], "Hi"), "`2.1`: Hi");
    }

    #[test]
    fn leaf_root_flattens_to_itself() {
        let root = json!({ "text": "alone" });
        let leaves = flatten(&root);
        assert_eq!(leaves.len(), 1);
        assert!(leaves[0].0.is_empty());
    }
}
