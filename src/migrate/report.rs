//! Summary of a migration run.
//!
//! Containment events land here as structured diagnostics and are also
//! emitted through `tracing`; callers that gate editor boot on a clean
//! run inspect the report, everyone else can ignore it.

use serde::Serialize;

use crate::core::{ComponentType, NodeId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// A transform returned an error; the node kept its pre-step shape.
    TransformFailed,
    /// A declared slot held a non-array value; substituted an empty slot.
    MalformedSlot,
    /// A slot element did not decode as a node; dropped.
    MalformedNode,
    /// Rename chain exceeded the transition cap; node left as-is.
    RenameLoop,
    /// Slot nesting exceeded the depth cap; subtree left as-is.
    DepthExceeded,
}

impl DiagnosticKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DiagnosticKind::TransformFailed => "transform_failed",
            DiagnosticKind::MalformedSlot => "malformed_slot",
            DiagnosticKind::MalformedNode => "malformed_node",
            DiagnosticKind::RenameLoop => "rename_loop",
            DiagnosticKind::DepthExceeded => "depth_exceeded",
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct Diagnostic {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<NodeId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component: Option<ComponentType>,
    pub kind: DiagnosticKind,
    pub detail: String,
}

#[derive(Clone, Debug, Default, Serialize)]
pub struct MigrationReport {
    /// Node visits, including nodes emitted by splits.
    pub nodes_seen: usize,
    /// Steps that ran to completion (update, rename, remove, split).
    pub steps_applied: usize,
    /// Nodes deleted by remove steps or empty splits.
    pub nodes_removed: usize,
    /// Nodes replaced by a split.
    pub nodes_split: usize,
    /// Replacement nodes emitted by splits.
    pub split_emitted: usize,
    pub diagnostics: Vec<Diagnostic>,
}

impl MigrationReport {
    /// No containment event fired during the run.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub(crate) fn diagnose(
        &mut self,
        node: Option<&NodeId>,
        component: Option<&ComponentType>,
        kind: DiagnosticKind,
        detail: String,
    ) {
        tracing::warn!(
            node = node.map(NodeId::as_str),
            component = component.map(ComponentType::as_str),
            kind = kind.as_str(),
            detail = %detail,
            "migration diagnostic"
        );
        self.diagnostics.push(Diagnostic {
            node: node.cloned(),
            component: component.cloned(),
            kind,
            detail,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_report_has_no_diagnostics() {
        let mut report = MigrationReport::default();
        assert!(report.is_clean());

        report.diagnose(
            None,
            None,
            DiagnosticKind::MalformedSlot,
            "prop `items` is not an array".into(),
        );
        assert!(!report.is_clean());
        assert_eq!(report.diagnostics[0].kind, DiagnosticKind::MalformedSlot);
    }

    #[test]
    fn diagnostics_serialize_without_empty_fields() {
        let diag = Diagnostic {
            node: None,
            component: None,
            kind: DiagnosticKind::RenameLoop,
            detail: "chain exceeded cap".into(),
        };
        let json = serde_json::to_string(&diag).unwrap();
        assert!(!json.contains("node"));
        assert!(json.contains("rename_loop"));
    }
}
