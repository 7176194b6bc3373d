//! The node record.
//!
//! Every component instance has the same shape: a stable id, a component
//! type name, and an ordered prop bag. Props stay raw `serde_json` values;
//! slot props hold arrays of further node objects. Keeping the bag raw is
//! what lets unknown component types ride through migration untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::identity::{ComponentType, NodeId};

/// Ordered property bag. Insertion order is preserved.
pub type Props = Map<String, Value>;

/// One component instance in the page tree.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(rename = "type")]
    pub component: ComponentType,
    #[serde(default)]
    pub props: Props,
}

impl Node {
    pub fn new(id: NodeId, component: ComponentType, props: Props) -> Self {
        Self {
            id,
            component,
            props,
        }
    }

    pub fn prop(&self, name: &str) -> Option<&Value> {
        self.props.get(name)
    }

    /// Decode a slot-array element. Unknown extra keys are ignored.
    pub fn from_value(value: Value) -> Result<Self, serde_json::Error> {
        serde_json::from_value(value)
    }

    /// Encode back into a slot-array element. Key order is fixed
    /// (`id`, `type`, `props`) so output bytes are stable across runs.
    pub fn to_value(&self) -> Value {
        let mut obj = Map::new();
        obj.insert("id".into(), Value::String(self.id.as_str().to_owned()));
        obj.insert(
            "type".into(),
            Value::String(self.component.as_str().to_owned()),
        );
        obj.insert("props".into(), Value::Object(self.props.clone()));
        Value::Object(obj)
    }
}

/// Does this value have the shape of a persisted node?
///
/// Requires string `id` and `type`; `props`, when present, must be an
/// object.
pub fn is_node_shaped(value: &Value) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("id").is_some_and(Value::is_string)
        && obj.get("type").is_some_and(Value::is_string)
        && obj.get("props").is_none_or(Value::is_object)
}

/// Structural slot inference for component types the schema catalog does
/// not know: an array whose every element is node-shaped. An empty array
/// qualifies (recursing into it is a no-op either way).
pub fn looks_like_slot(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(is_node_shaped))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn node_round_trips_through_value() {
        let node = Node::new(
            NodeId::parse("a").unwrap(),
            ComponentType::parse("Heading").unwrap(),
            json!({ "text": "hi", "level": 2 })
                .as_object()
                .unwrap()
                .clone(),
        );

        let value = node.to_value();
        let back = Node::from_value(value).unwrap();
        assert_eq!(back, node);
    }

    #[test]
    fn from_value_requires_id_and_type() {
        assert!(Node::from_value(json!({ "type": "Heading" })).is_err());
        assert!(Node::from_value(json!({ "id": "a" })).is_err());
        assert!(Node::from_value(json!({ "id": "a", "type": "Heading" })).is_ok());
    }

    #[test]
    fn node_shape_predicate() {
        assert!(is_node_shaped(
            &json!({ "id": "a", "type": "Heading", "props": {} })
        ));
        assert!(is_node_shaped(&json!({ "id": "a", "type": "Heading" })));
        assert!(!is_node_shaped(
            &json!({ "id": "a", "type": "Heading", "props": [] })
        ));
        assert!(!is_node_shaped(&json!({ "id": 1, "type": "Heading" })));
        assert!(!is_node_shaped(&json!("oops")));
    }

    #[test]
    fn slot_inference() {
        assert!(looks_like_slot(&json!([
            { "id": "a", "type": "Heading", "props": {} },
            { "id": "b", "type": "Text", "props": {} }
        ])));
        assert!(looks_like_slot(&json!([])));
        assert!(!looks_like_slot(&json!([1, 2, 3])));
        assert!(!looks_like_slot(&json!({ "id": "a", "type": "Heading" })));
        assert!(!looks_like_slot(&json!([
            { "id": "a", "type": "Heading" },
            "stray"
        ])));
    }
}
