use serde::{Deserialize, Serialize};

use todoapi_core::{Entity, EntityId};

/// A single todo item.
///
/// JSON shape is `{ "id": integer, "name": string, "isComplete": boolean }`.
/// Every field may be omitted on input: `id` falls back to unassigned, `name`
/// to the empty string, `isComplete` to `false`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(default)]
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl TodoItem {
    /// A not-yet-stored, incomplete item.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::UNASSIGNED,
            name: name.into(),
            is_complete: false,
        }
    }

    pub fn completed(mut self, is_complete: bool) -> Self {
        self.is_complete = is_complete;
        self
    }
}

impl Entity for TodoItem {
    fn id(&self) -> EntityId {
        self.id
    }

    fn with_id(self, id: EntityId) -> Self {
        Self { id, ..self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn serializes_with_camel_case_fields() {
        let item = TodoItem {
            id: EntityId::new(1),
            name: "Buy milk".to_string(),
            is_complete: false,
        };

        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value, json!({"id": 1, "name": "Buy milk", "isComplete": false}));
    }

    #[test]
    fn missing_fields_take_defaults() {
        let item: TodoItem = serde_json::from_value(json!({"name": "Walk dog"})).unwrap();

        assert_eq!(item.id, EntityId::UNASSIGNED);
        assert_eq!(item.name, "Walk dog");
        assert!(!item.is_complete);

        let empty: TodoItem = serde_json::from_value(json!({})).unwrap();
        assert_eq!(empty, TodoItem::default());
    }

    #[test]
    fn explicit_completion_flag_is_kept() {
        let item: TodoItem =
            serde_json::from_value(json!({"id": 5, "name": "x", "isComplete": true})).unwrap();
        assert_eq!(item.id, EntityId::new(5));
        assert!(item.is_complete);
    }

    #[test]
    fn wrong_field_types_are_rejected() {
        let res = serde_json::from_value::<TodoItem>(json!({"name": 3}));
        assert!(res.is_err());

        let res = serde_json::from_value::<TodoItem>(json!({"isComplete": "yes"}));
        assert!(res.is_err());
    }

    #[test]
    fn with_id_keeps_payload_fields() {
        let item = TodoItem::new("Buy milk").completed(true);
        let stored = item.clone().with_id(EntityId::new(12));

        assert_eq!(stored.id(), EntityId::new(12));
        assert_eq!(stored.name, item.name);
        assert_eq!(stored.is_complete, item.is_complete);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig {
                cases: 256,
                ..ProptestConfig::default()
            })]

            /// Property: path/body identity check accepts exactly the equal pair.
            #[test]
            fn ensure_identity_accepts_only_equal_ids(path in any::<i64>(), body in any::<i64>()) {
                let item = TodoItem::new("x").with_id(EntityId::new(body));
                let res = item.ensure_identity(EntityId::new(path));
                prop_assert_eq!(res.is_ok(), path == body);
            }
        }
    }
}
