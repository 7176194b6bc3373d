//! Read-only document traversal and id audits.
//!
//! Depth-first, left-to-right: a node is visited before its slot children,
//! `content` before `zones`, zones in key order. The migrating traversal
//! lives in `migrate::engine`; this one never replaces anything, which is
//! why it can hand out plain `&Node`.

use std::collections::BTreeMap;

use crate::schema::{ComponentDef, PropClass, SchemaCatalog, classify_prop};

use super::document::Document;
use super::identity::NodeId;
use super::node::{Node, Props};

/// Visit every node in the document exactly once.
pub fn visit_nodes<F: FnMut(&Node)>(doc: &Document, schema: &SchemaCatalog, visitor: &mut F) {
    visit_slot_children(&doc.root.props, schema.root.as_ref(), schema, visitor);
    for node in &doc.content {
        visit_node(node, schema, visitor);
    }
    for nodes in doc.zones.values() {
        for node in nodes {
            visit_node(node, schema, visitor);
        }
    }
}

fn visit_node<F: FnMut(&Node)>(node: &Node, schema: &SchemaCatalog, visitor: &mut F) {
    visitor(node);
    let def = schema.component(&node.component);
    visit_slot_children(&node.props, def, schema, visitor);
}

fn visit_slot_children<F: FnMut(&Node)>(
    props: &Props,
    def: Option<&ComponentDef>,
    schema: &SchemaCatalog,
    visitor: &mut F,
) {
    for (name, value) in props {
        if let PropClass::Slot(items) = classify_prop(def, name, value) {
            for item in items {
                if let Ok(child) = Node::from_value(item.clone()) {
                    visit_node(&child, schema, visitor);
                }
            }
        }
    }
}

/// Every node id in traversal order, duplicates included.
pub fn collect_ids(doc: &Document, schema: &SchemaCatalog) -> Vec<NodeId> {
    let mut ids = Vec::new();
    visit_nodes(doc, schema, &mut |node| ids.push(node.id.clone()));
    ids
}

/// Node ids that occur more than once, sorted, one entry per id.
pub fn duplicate_ids(doc: &Document, schema: &SchemaCatalog) -> Vec<NodeId> {
    let mut counts: BTreeMap<NodeId, usize> = BTreeMap::new();
    visit_nodes(doc, schema, &mut |node| {
        *counts.entry(node.id.clone()).or_default() += 1;
    });
    counts
        .into_iter()
        .filter(|(_, count)| *count > 1)
        .map(|(id, _)| id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Document {
        Document::from_value(json!({
            "root": { "props": {
                "header": [
                    { "id": "h1", "type": "Logo", "props": {} }
                ]
            } },
            "content": [
                { "id": "a", "type": "Grid", "props": {
                    "items": [
                        { "id": "a-1", "type": "Card", "props": {} },
                        { "id": "a-2", "type": "Card", "props": {} }
                    ]
                } }
            ],
            "zones": {
                "a:footer": [
                    { "id": "f1", "type": "Text", "props": {} }
                ]
            }
        }))
        .unwrap()
    }

    #[test]
    fn visits_root_slots_content_then_zones_depth_first() {
        let ids: Vec<String> = collect_ids(&doc(), &SchemaCatalog::new())
            .into_iter()
            .map(|id| id.as_str().to_owned())
            .collect();
        assert_eq!(ids, vec!["h1", "a", "a-1", "a-2", "f1"]);
    }

    #[test]
    fn duplicate_ids_are_reported_once() {
        let doc = Document::from_value(json!({
            "root": { "props": {} },
            "content": [
                { "id": "a", "type": "Text", "props": {} },
                { "id": "a", "type": "Text", "props": {} },
                { "id": "b", "type": "Text", "props": {} }
            ]
        }))
        .unwrap();

        let dupes = duplicate_ids(&doc, &SchemaCatalog::new());
        assert_eq!(dupes.len(), 1);
        assert_eq!(dupes[0].as_str(), "a");
    }
}
