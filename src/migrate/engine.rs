//! The migration application loop.
//!
//! A node is migrated before its children: every registered step for its
//! current type runs in registration order, rename and split results are
//! fed back through step selection, and only the settled node's slots are
//! recursed into. The output tree is rebuilt array-by-array rather than
//! spliced in place.
//!
//! Nothing escapes `migrate_document`. Failing transforms, malformed
//! slots, malformed slot elements, and runaway rename chains are contained
//! at single-node granularity and surface as report diagnostics.

use tracing::{debug, debug_span, info};

use crate::core::{
    ComponentType, DocDigest, Document, Node, NodeId, Props, Root, digest_document,
};
use crate::schema::{ComponentDef, PropClass, SchemaCatalog, classify_prop};

use super::context::StreamDocument;
use super::registry::{MigrationAction, MigrationRegistry, MigrationStep, NodeSeed};
use super::report::{DiagnosticKind, MigrationReport};

/// Rename chains longer than this are treated as a registry cycle.
const MAX_TYPE_TRANSITIONS: usize = 32;

/// Combined slot nesting and split generations; deeper subtrees are left
/// unmigrated. Far above any real document; exists so a split step that
/// keeps emitting splittable seeds cannot recurse forever.
const MAX_SLOT_DEPTH: usize = 128;

/// Bring every node in `doc` to the current schema.
///
/// Pure and deterministic: the input is never mutated, and identical
/// inputs produce byte-identical canonical output. The same `stream`
/// reference is handed to every transform in the run.
pub fn migrate_document(
    doc: &Document,
    registry: &MigrationRegistry,
    schema: &SchemaCatalog,
    stream: &StreamDocument,
) -> (Document, MigrationReport) {
    let span = debug_span!("migrate_document");
    let _enter = span.enter();

    let mut run = Run {
        registry,
        schema,
        stream,
        report: MigrationReport::default(),
    };

    let root = Root::new(run.migrate_slot_props(None, schema.root.as_ref(), &doc.root.props, 0));
    let content = run.migrate_array(&doc.content, 0);
    let zones = doc
        .zones
        .iter()
        .map(|(zone, nodes)| (zone.clone(), run.migrate_array(nodes, 0)))
        .collect();

    info!(
        nodes = run.report.nodes_seen,
        steps = run.report.steps_applied,
        diagnostics = run.report.diagnostics.len(),
        "document migrated"
    );

    (
        Document {
            root,
            content,
            zones,
        },
        run.report,
    )
}

/// Has `doc` reached its fixed point under this registry?
///
/// Under unconditional step replay "no outstanding migrations" is
/// observable as digest stability: re-migrating a settled document changes
/// nothing.
pub fn is_settled(
    doc: &Document,
    registry: &MigrationRegistry,
    schema: &SchemaCatalog,
    stream: &StreamDocument,
) -> Result<bool, crate::core::CanonJsonError> {
    let before: DocDigest = digest_document(doc)?;
    let (next, _) = migrate_document(doc, registry, schema, stream);
    Ok(before == digest_document(&next)?)
}

struct Run<'a> {
    registry: &'a MigrationRegistry,
    schema: &'a SchemaCatalog,
    stream: &'a StreamDocument,
    report: MigrationReport,
}

impl<'a> Run<'a> {
    fn migrate_array(&mut self, nodes: &[Node], depth: usize) -> Vec<Node> {
        let mut out = Vec::with_capacity(nodes.len());
        for node in nodes {
            out.extend(self.migrate_node(node.clone(), depth));
        }
        out
    }

    /// Run the step chain for one node, then recurse into its slots.
    /// Returns zero, one, or many replacement nodes.
    fn migrate_node(&mut self, mut node: Node, depth: usize) -> Vec<Node> {
        self.report.nodes_seen += 1;

        if depth > MAX_SLOT_DEPTH {
            self.report.diagnose(
                Some(&node.id),
                Some(&node.component),
                DiagnosticKind::DepthExceeded,
                format!("slot nesting exceeds {MAX_SLOT_DEPTH}; subtree left unmigrated"),
            );
            return vec![node];
        }

        let registry = self.registry;
        let mut transitions = 0usize;

        'chain: loop {
            let Some(steps) = registry.steps_for(&node.component) else {
                // Unknown or already-current type: pass through.
                break;
            };

            for step in steps {
                match &step.action {
                    MigrationAction::Update(transform) => {
                        match transform(node.props.clone(), self.stream) {
                            Ok(props) => {
                                node.props = props;
                                self.report.steps_applied += 1;
                            }
                            Err(err) => {
                                self.transform_failed(&node, step, &err.to_string());
                                break 'chain;
                            }
                        }
                    }
                    MigrationAction::Rename { to, transform } => {
                        if let Some(transform) = transform {
                            match transform(node.props.clone(), self.stream) {
                                Ok(props) => node.props = props,
                                Err(err) => {
                                    self.transform_failed(&node, step, &err.to_string());
                                    break 'chain;
                                }
                            }
                        }
                        debug!(node = %node.id, from = %node.component, to = %to, "renamed");
                        node.component = to.clone();
                        self.report.steps_applied += 1;

                        transitions += 1;
                        if transitions >= MAX_TYPE_TRANSITIONS {
                            self.report.diagnose(
                                Some(&node.id),
                                Some(&node.component),
                                DiagnosticKind::RenameLoop,
                                format!(
                                    "rename chain exceeds {MAX_TYPE_TRANSITIONS} transitions \
                                     (step `{}`)",
                                    step.label
                                ),
                            );
                            break 'chain;
                        }
                        // Re-enter step selection under the new type.
                        continue 'chain;
                    }
                    MigrationAction::Remove => {
                        debug!(node = %node.id, component = %node.component, "removed");
                        self.report.steps_applied += 1;
                        self.report.nodes_removed += 1;
                        return Vec::new();
                    }
                    MigrationAction::Split(transform) => {
                        match transform(node.props.clone(), self.stream) {
                            Ok(seeds) => {
                                self.report.steps_applied += 1;
                                self.report.nodes_split += 1;
                                return self.emit_seeds(&node, seeds, depth);
                            }
                            Err(err) => {
                                self.transform_failed(&node, step, &err.to_string());
                                break 'chain;
                            }
                        }
                    }
                }
            }
            break;
        }

        node.props = self.migrate_slot_props(
            Some((&node.id, &node.component)),
            self.schema.component(&node.component),
            &node.props,
            depth,
        );
        vec![node]
    }

    /// Mint nodes for split seeds and feed each back through migration.
    fn emit_seeds(&mut self, original: &Node, seeds: Vec<NodeSeed>, depth: usize) -> Vec<Node> {
        if seeds.is_empty() {
            // Zero seeds is a remove.
            debug!(node = %original.id, component = %original.component, "split to nothing");
            self.report.nodes_removed += 1;
            return Vec::new();
        }

        let mut out = Vec::with_capacity(seeds.len());
        for (index, seed) in seeds.into_iter().enumerate() {
            let discriminator = seed
                .discriminator
                .unwrap_or_else(|| seed.component.as_str().to_owned());
            let id = NodeId::derived(&original.id, &discriminator, index);
            self.report.split_emitted += 1;
            out.extend(self.migrate_node(Node::new(id, seed.component, seed.props), depth + 1));
        }
        out
    }

    /// Rebuild a prop bag, recursing into every slot prop in prop order.
    fn migrate_slot_props(
        &mut self,
        owner: Option<(&NodeId, &ComponentType)>,
        def: Option<&ComponentDef>,
        props: &Props,
        depth: usize,
    ) -> Props {
        let mut out = Props::new();
        for (name, value) in props {
            match classify_prop(def, name, value) {
                PropClass::Data => {
                    out.insert(name.clone(), value.clone());
                }
                PropClass::MalformedSlot => {
                    self.report.diagnose(
                        owner.map(|(id, _)| id),
                        owner.map(|(_, component)| component),
                        DiagnosticKind::MalformedSlot,
                        format!("slot prop `{name}` is not an array; substituted empty slot"),
                    );
                    out.insert(name.clone(), serde_json::Value::Array(Vec::new()));
                }
                PropClass::Slot(items) => {
                    let mut children = Vec::with_capacity(items.len());
                    for item in items {
                        match Node::from_value(item.clone()) {
                            Ok(child) => {
                                for migrated in self.migrate_node(child, depth + 1) {
                                    children.push(migrated.to_value());
                                }
                            }
                            Err(err) => {
                                self.report.diagnose(
                                    owner.map(|(id, _)| id),
                                    owner.map(|(_, component)| component),
                                    DiagnosticKind::MalformedNode,
                                    format!("dropped malformed element in slot `{name}`: {err}"),
                                );
                            }
                        }
                    }
                    out.insert(name.clone(), serde_json::Value::Array(children));
                }
            }
        }
        out
    }

    fn transform_failed(&mut self, node: &Node, step: &MigrationStep, reason: &str) {
        self.report.diagnose(
            Some(&node.id),
            Some(&node.component),
            DiagnosticKind::TransformFailed,
            format!("step `{}` failed: {reason}; node kept pre-step shape", step.label),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migrate::registry::TransformError;
    use serde_json::json;

    fn ct(s: &str) -> ComponentType {
        ComponentType::parse(s).unwrap()
    }

    fn one_node_doc(value: serde_json::Value) -> Document {
        Document::from_value(json!({ "root": { "props": {} }, "content": [value] })).unwrap()
    }

    #[test]
    fn remove_step_deletes_the_node() {
        let registry = MigrationRegistry::builder()
            .remove(ct("Spacer"), "spacers folded into layout gaps")
            .build();
        let doc = one_node_doc(json!({ "id": "s1", "type": "Spacer", "props": {} }));

        let (migrated, report) = migrate_document(
            &doc,
            &registry,
            &SchemaCatalog::new(),
            &StreamDocument::empty(),
        );

        assert!(migrated.content.is_empty());
        assert_eq!(report.nodes_removed, 1);
        assert!(report.is_clean());
    }

    #[test]
    fn rename_cycle_is_contained() {
        let registry = MigrationRegistry::builder()
            .rename(ct("A"), "a to b", ct("B"))
            .rename(ct("B"), "b to a", ct("A"))
            .build();
        let doc = one_node_doc(json!({ "id": "n", "type": "A", "props": {} }));

        let (migrated, report) = migrate_document(
            &doc,
            &registry,
            &SchemaCatalog::new(),
            &StreamDocument::empty(),
        );

        assert_eq!(migrated.content.len(), 1);
        assert!(
            report
                .diagnostics
                .iter()
                .any(|diag| diag.kind == DiagnosticKind::RenameLoop)
        );
    }

    #[test]
    fn split_to_zero_seeds_removes_the_node() {
        let registry = MigrationRegistry::builder()
            .split(ct("Gallery"), "one tile per image", |_, _| Ok(Vec::new()))
            .build();
        let doc = one_node_doc(json!({ "id": "g", "type": "Gallery", "props": {} }));

        let (migrated, report) = migrate_document(
            &doc,
            &registry,
            &SchemaCatalog::new(),
            &StreamDocument::empty(),
        );

        assert!(migrated.content.is_empty());
        assert_eq!(report.nodes_removed, 1);
        assert_eq!(report.split_emitted, 0);
    }

    #[test]
    fn failing_split_keeps_the_node() {
        let registry = MigrationRegistry::builder()
            .split(ct("Gallery"), "one tile per image", |_, _| {
                Err(TransformError::new("stream missing images"))
            })
            .build();
        let doc = one_node_doc(json!({ "id": "g", "type": "Gallery", "props": { "x": 1 } }));

        let (migrated, report) = migrate_document(
            &doc,
            &registry,
            &SchemaCatalog::new(),
            &StreamDocument::empty(),
        );

        assert_eq!(migrated.content.len(), 1);
        assert_eq!(migrated.content[0].props, doc.content[0].props);
        assert!(
            report
                .diagnostics
                .iter()
                .any(|diag| diag.kind == DiagnosticKind::TransformFailed)
        );
    }

    #[test]
    fn malformed_slot_element_is_dropped() {
        let schema = SchemaCatalog::new().with_component(
            ct("Grid"),
            crate::schema::ComponentDef::new().with_slot("items"),
        );
        let doc = one_node_doc(json!({
            "id": "g", "type": "Grid", "props": {
                "items": [
                    { "id": "ok", "type": "Card", "props": {} },
                    { "type": "Card" }
                ]
            }
        }));

        let (migrated, report) = migrate_document(
            &doc,
            &MigrationRegistry::default(),
            &schema,
            &StreamDocument::empty(),
        );

        let items = migrated.content[0].prop("items").unwrap().as_array().unwrap();
        assert_eq!(items.len(), 1);
        assert!(
            report
                .diagnostics
                .iter()
                .any(|diag| diag.kind == DiagnosticKind::MalformedNode)
        );
    }
}
