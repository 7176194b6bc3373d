//! The migration registry: ordered per-type step catalogue.
//!
//! Pure data from the engine's point of view. Steps for one type run in
//! registration order, oldest schema change first; each step must be
//! idempotent on its own output because the engine replays the full chain
//! on every run. The engine hardcodes no type name - all per-type
//! knowledge lives here.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

use crate::core::{ComponentType, Props};

use super::context::StreamDocument;

/// Failure returned by a transformation function.
///
/// Contained at single-node granularity: the node keeps its pre-step
/// shape and the run continues.
#[derive(Debug, Error, Clone)]
#[error("transform failed: {reason}")]
pub struct TransformError {
    pub reason: String,
    pub detail: Option<Value>,
}

impl TransformError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: Value) -> Self {
        self.detail = Some(detail);
        self
    }
}

/// Transform for update and rename steps: old props in, new props out.
pub type UpdateFn =
    dyn Fn(Props, &StreamDocument) -> Result<Props, TransformError> + Send + Sync;

/// Transform for split steps: old props in, replacement seeds out.
/// Zero seeds is equivalent to removing the node.
pub type SplitFn =
    dyn Fn(Props, &StreamDocument) -> Result<Vec<NodeSeed>, TransformError> + Send + Sync;

/// Descriptor for one replacement node produced by a split.
///
/// The engine mints the id: `{parent}-{discriminator}-{index}`, where the
/// discriminator defaults to the seed's component type.
#[derive(Clone, Debug)]
pub struct NodeSeed {
    pub component: ComponentType,
    pub props: Props,
    pub discriminator: Option<String>,
}

impl NodeSeed {
    pub fn new(component: ComponentType, props: Props) -> Self {
        Self {
            component,
            props,
            discriminator: None,
        }
    }

    pub fn with_discriminator(mut self, discriminator: impl Into<String>) -> Self {
        self.discriminator = Some(discriminator.into());
        self
    }
}

/// What one step does to a node.
pub enum MigrationAction {
    /// Rewrite props in place; id, type, and position unchanged.
    Update(Box<UpdateFn>),
    /// Optionally rewrite props, then change the component type. The node
    /// re-enters step selection under the new type.
    Rename {
        to: ComponentType,
        transform: Option<Box<UpdateFn>>,
    },
    /// Delete the node from its containing array.
    Remove,
    /// Replace the node with an ordered list of freshly-minted nodes, each
    /// re-entering step selection.
    Split(Box<SplitFn>),
}

impl fmt::Debug for MigrationAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MigrationAction::Update(_) => f.write_str("Update(..)"),
            MigrationAction::Rename { to, .. } => write!(f, "Rename {{ to: {to} }}"),
            MigrationAction::Remove => f.write_str("Remove"),
            MigrationAction::Split(_) => f.write_str("Split(..)"),
        }
    }
}

/// One versioned transformation rule for one component type.
#[derive(Debug)]
pub struct MigrationStep {
    /// Short human label, used only in diagnostics.
    pub label: String,
    pub action: MigrationAction,
}

/// Ordered catalogue of migration steps keyed by component type.
#[derive(Debug, Default)]
pub struct MigrationRegistry {
    steps: BTreeMap<ComponentType, Vec<MigrationStep>>,
}

impl MigrationRegistry {
    pub fn builder() -> MigrationRegistryBuilder {
        MigrationRegistryBuilder::default()
    }

    pub fn steps_for(&self, component: &ComponentType) -> Option<&[MigrationStep]> {
        self.steps.get(component).map(Vec::as_slice)
    }

    pub fn has_steps_for(&self, component: &ComponentType) -> bool {
        self.steps.contains_key(component)
    }

    pub fn component_types(&self) -> impl Iterator<Item = &ComponentType> {
        self.steps.keys()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

#[derive(Default)]
pub struct MigrationRegistryBuilder {
    steps: BTreeMap<ComponentType, Vec<MigrationStep>>,
}

impl MigrationRegistryBuilder {
    fn push(mut self, component: ComponentType, label: impl Into<String>, action: MigrationAction) -> Self {
        self.steps.entry(component).or_default().push(MigrationStep {
            label: label.into(),
            action,
        });
        self
    }

    pub fn update<F>(self, component: ComponentType, label: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Props, &StreamDocument) -> Result<Props, TransformError> + Send + Sync + 'static,
    {
        self.push(component, label, MigrationAction::Update(Box::new(transform)))
    }

    pub fn rename(
        self,
        component: ComponentType,
        label: impl Into<String>,
        to: ComponentType,
    ) -> Self {
        self.push(
            component,
            label,
            MigrationAction::Rename {
                to,
                transform: None,
            },
        )
    }

    pub fn rename_with<F>(
        self,
        component: ComponentType,
        label: impl Into<String>,
        to: ComponentType,
        transform: F,
    ) -> Self
    where
        F: Fn(Props, &StreamDocument) -> Result<Props, TransformError> + Send + Sync + 'static,
    {
        self.push(
            component,
            label,
            MigrationAction::Rename {
                to,
                transform: Some(Box::new(transform)),
            },
        )
    }

    pub fn remove(self, component: ComponentType, label: impl Into<String>) -> Self {
        self.push(component, label, MigrationAction::Remove)
    }

    pub fn split<F>(self, component: ComponentType, label: impl Into<String>, transform: F) -> Self
    where
        F: Fn(Props, &StreamDocument) -> Result<Vec<NodeSeed>, TransformError>
            + Send
            + Sync
            + 'static,
    {
        self.push(component, label, MigrationAction::Split(Box::new(transform)))
    }

    pub fn build(self) -> MigrationRegistry {
        MigrationRegistry { steps: self.steps }
    }
}
