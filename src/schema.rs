//! The schema catalog: per-type field declarations.
//!
//! The catalog answers one structural question for the engine - which
//! props are slots - and nothing more. It never validates value types;
//! that is the rendering layer's problem.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::{ComponentType, looks_like_slot};

/// Declared kind of one field.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Scalars, objects, arrays, entity-field references.
    Data,
    /// An ordered array of child nodes.
    Slot,
}

/// Field declarations for one component type.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ComponentDef {
    #[serde(default)]
    pub fields: BTreeMap<String, FieldKind>,
}

impl ComponentDef {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: impl Into<String>, kind: FieldKind) -> Self {
        self.fields.insert(name.into(), kind);
        self
    }

    pub fn with_slot(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldKind::Slot)
    }

    pub fn with_data(self, name: impl Into<String>) -> Self {
        self.with_field(name, FieldKind::Data)
    }

    pub fn field(&self, name: &str) -> Option<FieldKind> {
        self.fields.get(name).copied()
    }

    pub fn slot_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, kind)| **kind == FieldKind::Slot)
            .map(|(name, _)| name.as_str())
    }
}

/// Field declarations for every known component type, plus the root.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaCatalog {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<ComponentDef>,

    #[serde(default)]
    pub components: BTreeMap<ComponentType, ComponentDef>,
}

impl SchemaCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, def: ComponentDef) -> Self {
        self.root = Some(def);
        self
    }

    pub fn with_component(mut self, component: ComponentType, def: ComponentDef) -> Self {
        self.components.insert(component, def);
        self
    }

    pub fn component(&self, component: &ComponentType) -> Option<&ComponentDef> {
        self.components.get(component)
    }

    pub fn knows(&self, component: &ComponentType) -> bool {
        self.components.contains_key(component)
    }
}

/// How the engine should treat one prop value.
#[derive(Debug, PartialEq)]
pub enum PropClass<'a> {
    /// Opaque data; carried through unchanged.
    Data,
    /// A slot; recurse into each element.
    Slot(&'a [Value]),
    /// Declared a slot but the value is not an array; substitute empty.
    MalformedSlot,
}

/// Classify one prop against a component's declarations.
///
/// Declared fields are authoritative. Props absent from the declarations
/// (old shapes mid-migration, unknown types with `def == None`) fall back
/// to structural inference so their children still get visited.
pub fn classify_prop<'a>(
    def: Option<&ComponentDef>,
    name: &str,
    value: &'a Value,
) -> PropClass<'a> {
    match def.and_then(|def| def.field(name)) {
        Some(FieldKind::Slot) => match value.as_array() {
            Some(items) => PropClass::Slot(items),
            None => PropClass::MalformedSlot,
        },
        Some(FieldKind::Data) => PropClass::Data,
        None => {
            if looks_like_slot(value) {
                match value.as_array() {
                    Some(items) => PropClass::Slot(items),
                    None => PropClass::Data,
                }
            } else {
                PropClass::Data
            }
        }
    }
}
