//! The specification model: the structured description that drives every
//! generator in the workspace.
//!
//! A [`Specification`] is immutable input. Ordering of entities, fields,
//! workflows, integrations and pages is significant and preserved into all
//! generated output.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::SpecError;

/// The declared type of an entity field.
///
/// Unknown type names are kept verbatim in [`FieldType::Other`] so they can
/// be echoed back in human-readable output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FieldType {
    String,
    Number,
    Boolean,
    Date,
    Text,
    Enum,
    Other(String),
}

impl FieldType {
    pub fn as_str(&self) -> &str {
        match self {
            FieldType::String => "string",
            FieldType::Number => "number",
            FieldType::Boolean => "boolean",
            FieldType::Date => "date",
            FieldType::Text => "text",
            FieldType::Enum => "enum",
            FieldType::Other(name) => name,
        }
    }
}

impl From<String> for FieldType {
    fn from(s: String) -> Self {
        match s.as_str() {
            "string" => FieldType::String,
            "number" => FieldType::Number,
            "boolean" => FieldType::Boolean,
            "date" => FieldType::Date,
            "text" => FieldType::Text,
            "enum" => FieldType::Enum,
            _ => FieldType::Other(s),
        }
    }
}

impl From<FieldType> for String {
    fn from(t: FieldType) -> Self {
        match t {
            FieldType::Other(name) => name,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A typed field on an entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default)]
    pub required: bool,
}

/// A business entity and its ordered fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    pub name: String,
    pub fields: Vec<Field>,
}

/// A named sequence of workflow steps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workflow {
    pub name: String,
    #[serde(default)]
    pub steps: Vec<String>,
}

/// An external system the generated application talks to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
}

/// A user-facing page of the generated application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page {
    pub name: String,
    #[serde(default)]
    pub purpose: String,
}

impl Page {
    pub fn new(name: &str, purpose: &str) -> Self {
        Self {
            name: name.to_string(),
            purpose: purpose.to_string(),
        }
    }
}

/// The full generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specification {
    pub name: String,
    pub domain: String,
    #[serde(default)]
    pub entities: Vec<Entity>,
    #[serde(default)]
    pub workflows: Vec<Workflow>,
    #[serde(default)]
    pub integrations: Vec<Integration>,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Specification {
    /// Parse a specification from its JSON form.
    pub fn from_json(text: &str) -> Result<Self, SpecError> {
        serde_json::from_str(text).map_err(|e| SpecError::Parse(e.to_string()))
    }

    /// The declared pages, or the default `Dashboard` / `Items` pair when
    /// none are declared.
    pub fn effective_pages(&self) -> Vec<Page> {
        if self.pages.is_empty() {
            default_pages()
        } else {
            self.pages.clone()
        }
    }

    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.iter().map(|e| e.name.as_str()).collect()
    }

    pub fn workflow_names(&self) -> Vec<&str> {
        self.workflows.iter().map(|w| w.name.as_str()).collect()
    }

    pub fn integration_names(&self) -> Vec<&str> {
        self.integrations.iter().map(|i| i.name.as_str()).collect()
    }
}

/// Pages substituted when a specification declares none.
pub fn default_pages() -> Vec<Page> {
    vec![
        Page::new("Dashboard", "Overview of key metrics and recent activity"),
        Page::new("Items", "Browse, create and update records"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    const VENDOR_SPEC: &str = r#"{
        "name": "Vendor Audit",
        "domain": "procurement",
        "entities": [
            {"name": "Vendor", "fields": [
                {"name": "name", "type": "string", "required": true},
                {"name": "score", "type": "number"},
                {"name": "tier", "type": "currency"}
            ]}
        ],
        "workflows": [{"name": "Onboard", "steps": ["collect", "review"]}]
    }"#;

    #[test]
    fn parses_with_defaults() {
        let spec = Specification::from_json(VENDOR_SPEC).unwrap();
        assert_eq!(spec.name, "Vendor Audit");
        assert_eq!(spec.entities[0].fields[0].field_type, FieldType::String);
        assert!(spec.entities[0].fields[0].required);
        assert!(!spec.entities[0].fields[1].required);
        assert!(spec.integrations.is_empty());
        assert!(spec.pages.is_empty());
    }

    #[test]
    fn unknown_field_type_is_preserved() {
        let spec = Specification::from_json(VENDOR_SPEC).unwrap();
        let tier = &spec.entities[0].fields[2];
        assert_eq!(tier.field_type, FieldType::Other("currency".to_string()));
        let json = serde_json::to_value(tier).unwrap();
        assert_eq!(json["type"], "currency");
    }

    #[test]
    fn missing_fields_array_is_an_input_error() {
        let err = Specification::from_json(
            r#"{"name": "x", "domain": "y", "entities": [{"name": "Vendor"}]}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("fields"), "{}", err);
    }

    #[test]
    fn effective_pages_falls_back_to_defaults() {
        let spec = Specification::from_json(VENDOR_SPEC).unwrap();
        let pages = spec.effective_pages();
        let names: Vec<&str> = pages.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Dashboard", "Items"]);
    }

    #[test]
    fn effective_pages_keeps_declared_order() {
        let mut spec = Specification::from_json(VENDOR_SPEC).unwrap();
        spec.pages = vec![Page::new("Queue", "q"), Page::new("Board", "b")];
        let names: Vec<String> = spec.effective_pages().into_iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Queue", "Board"]);
    }
}
