//! Projection of specification entities into JSON-Schema-like objects.
//!
//! The type mapping is deliberately lossy: only `number` and `boolean`
//! survive, everything else is represented as `string`.

use indexmap::IndexMap;
use serde::Serialize;

use crate::spec::{Entity, FieldType, Specification};

/// One property entry: `{ "type": <json type> }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub json_type: &'static str,
}

/// An object schema for a single entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub schema_type: &'static str,
    /// Properties in field declaration order.
    pub properties: IndexMap<String, PropertySchema>,
    /// Required field names in declaration order.
    pub required: Vec<String>,
}

/// A named entity schema, as written to `backend/data-schema.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntitySchema {
    pub name: String,
    pub schema: ObjectSchema,
}

/// Map a specification field type to its JSON representation.
pub fn json_type(field_type: &FieldType) -> &'static str {
    match field_type {
        FieldType::Number => "number",
        FieldType::Boolean => "boolean",
        _ => "string",
    }
}

pub fn entity_schema(entity: &Entity) -> EntitySchema {
    let properties = entity
        .fields
        .iter()
        .map(|f| {
            (
                f.name.clone(),
                PropertySchema {
                    json_type: json_type(&f.field_type),
                },
            )
        })
        .collect();
    let required = entity
        .fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.clone())
        .collect();

    EntitySchema {
        name: entity.name.clone(),
        schema: ObjectSchema {
            schema_type: "object",
            properties,
            required,
        },
    }
}

/// Build schemas for every entity, in specification order.
pub fn build_schemas(spec: &Specification) -> Vec<EntitySchema> {
    spec.entities.iter().map(entity_schema).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Field;

    fn field(name: &str, t: FieldType, required: bool) -> Field {
        Field {
            name: name.to_string(),
            field_type: t,
            required,
        }
    }

    #[test]
    fn maps_types_lossily() {
        assert_eq!(json_type(&FieldType::Number), "number");
        assert_eq!(json_type(&FieldType::Boolean), "boolean");
        assert_eq!(json_type(&FieldType::Date), "string");
        assert_eq!(json_type(&FieldType::Enum), "string");
        assert_eq!(json_type(&FieldType::Text), "string");
        assert_eq!(json_type(&FieldType::Other("money".into())), "string");
    }

    #[test]
    fn required_list_keeps_field_order() {
        let entity = Entity {
            name: "Invoice".to_string(),
            fields: vec![
                field("number", FieldType::String, true),
                field("paid", FieldType::Boolean, false),
                field("amount", FieldType::Number, true),
            ],
        };
        let schema = entity_schema(&entity);
        assert_eq!(schema.schema.required, vec!["number", "amount"]);
        assert_eq!(schema.schema.properties["paid"].json_type, "boolean");

        let json = serde_json::to_value(&schema).unwrap();
        assert_eq!(json["schema"]["type"], "object");
        assert_eq!(json["schema"]["properties"]["amount"]["type"], "number");
    }

    #[test]
    fn properties_keep_declaration_order() {
        let entity = Entity {
            name: "Ledger".to_string(),
            fields: vec![
                field("zeta", FieldType::String, true),
                field("amount", FieldType::Number, true),
                field("memo", FieldType::Text, false),
            ],
        };
        let schema = entity_schema(&entity);
        let keys: Vec<&str> = schema.schema.properties.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "amount", "memo"]);

        let text = serde_json::to_string(&schema).unwrap();
        let zeta = text.find("\"zeta\":{").unwrap();
        let amount = text.find("\"amount\":{").unwrap();
        let memo = text.find("\"memo\":{").unwrap();
        assert!(zeta < amount && amount < memo, "{text}");
    }

    #[test]
    fn entity_without_fields_has_empty_schema() {
        let entity = Entity {
            name: "Tag".to_string(),
            fields: vec![],
        };
        let schema = entity_schema(&entity);
        assert!(schema.schema.properties.is_empty());
        assert!(schema.schema.required.is_empty());
    }
}
