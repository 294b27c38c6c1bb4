//! Extracted item - the unit moving from extraction through review to persistence

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::value_objects::{Confidence, ItemType};

/// One structured record produced by the extraction step
///
/// `data` is an open field map whose expected keys depend on `item_type`
/// (see the template catalog); any key set is accepted and rendered
/// generically. Key order is preserved for display and export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedItem {
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub confidence: Confidence,
    pub data: Map<String, Value>,
    /// Fields whose values were fabricated or defaulted
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inferred_fields: Vec<String>,
    /// Fields explicitly absent or unknown in the source
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub missing_fields: Vec<String>,
    /// Quotation of the passage that justified this item
    pub source: String,
}

/// How a single field should be presented to the reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldState {
    Extracted,
    Inferred,
    Missing,
}

/// Structural kind of a field value, used to keep edits type-aware
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    Null,
    Scalar,
    List,
    Object,
}

impl ValueKind {
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => ValueKind::Null,
            Value::Array(_) => ValueKind::List,
            Value::Object(_) => ValueKind::Object,
            Value::Bool(_) | Value::Number(_) | Value::String(_) => ValueKind::Scalar,
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            ValueKind::Null => "null",
            ValueKind::Scalar => "scalar",
            ValueKind::List => "list",
            ValueKind::Object => "object",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FieldEditError {
    #[error("Field not found: {0}")]
    UnknownField(String),

    #[error("Field {field} expects a {expected} value, got {found}")]
    KindMismatch {
        field: String,
        expected: ValueKind,
        found: ValueKind,
    },
}

impl ExtractedItem {
    pub fn new(
        item_type: ItemType,
        confidence: Confidence,
        data: Map<String, Value>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            item_type,
            confidence,
            data,
            inferred_fields: Vec::new(),
            missing_fields: Vec::new(),
            source: source.into(),
        }
    }

    pub fn with_inferred(mut self, fields: &[&str]) -> Self {
        self.inferred_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn with_missing(mut self, fields: &[&str]) -> Self {
        self.missing_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    /// Short label used in approval summaries: the item's name, else its title
    pub fn label(&self) -> String {
        ["name", "title"]
            .iter()
            .filter_map(|key| self.data.get(*key))
            .find_map(|value| match value {
                Value::String(s) if !s.is_empty() => Some(s.clone()),
                _ => None,
            })
            .unwrap_or_default()
    }

    /// Presentation state of a field; inferred wins over missing
    pub fn field_state(&self, field: &str) -> FieldState {
        if self.inferred_fields.iter().any(|f| f == field) {
            FieldState::Inferred
        } else if self.missing_fields.iter().any(|f| f == field) {
            FieldState::Missing
        } else {
            FieldState::Extracted
        }
    }

    /// Warning banner text, present whenever any field was inferred
    pub fn inferred_warning(&self) -> Option<String> {
        if self.inferred_fields.is_empty() {
            return None;
        }
        // Drifted flags are hidden unless nothing else is left to show
        let flagged: Vec<&str> = self
            .inferred_fields
            .iter()
            .filter(|f| self.data.contains_key(f.as_str()))
            .map(String::as_str)
            .collect();
        let listed = if flagged.is_empty() {
            self.inferred_fields.join(", ")
        } else {
            flagged.join(", ")
        };
        Some(format!("Inferred fields: {}", listed))
    }

    /// Flags naming keys that do not exist in `data`
    pub fn flag_drift(&self) -> Vec<String> {
        self.inferred_fields
            .iter()
            .chain(self.missing_fields.iter())
            .filter(|f| !self.data.contains_key(f.as_str()))
            .cloned()
            .collect()
    }

    /// Replace a field's value and clear its inferred/missing flags
    ///
    /// The new value must have the same structural kind as the current one,
    /// unless either side is `null`.
    pub fn edit_field(&mut self, field: &str, value: Value) -> Result<(), FieldEditError> {
        let current = self
            .data
            .get(field)
            .ok_or_else(|| FieldEditError::UnknownField(field.to_string()))?;

        let expected = ValueKind::of(current);
        let found = ValueKind::of(&value);
        if expected != ValueKind::Null && found != ValueKind::Null && expected != found {
            return Err(FieldEditError::KindMismatch {
                field: field.to_string(),
                expected,
                found,
            });
        }

        self.data.insert(field.to_string(), value);
        self.inferred_fields.retain(|f| f != field);
        self.missing_fields.retain(|f| f != field);
        Ok(())
    }
}

/// Render a field value as review text
///
/// `null` renders as "Not found" and lists join with ", ".
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => "Not found".to_string(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(values) => values
            .iter()
            .map(|v| match v {
                Value::Null => String::new(),
                other => display_value(other),
            })
            .collect::<Vec<_>>()
            .join(", "),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_item() -> ExtractedItem {
        let data = json!({
            "name": "Luna Blackwood",
            "age": "",
            "traits": ["wise", "nurturing"],
            "personality": { "emotional_tone": "calm" },
            "mentor": null
        });
        ExtractedItem::new(
            ItemType::Character,
            Confidence::Extracted,
            data.as_object().cloned().unwrap(),
            "Luna Blackwood lived deep in the Whispering Woods...",
        )
        .with_inferred(&["traits", "personality"])
        .with_missing(&["age", "traits"])
    }

    #[test]
    fn test_display_value_rules() {
        assert_eq!(display_value(&Value::Null), "Not found");
        assert_eq!(display_value(&json!(["a", "b", "c"])), "a, b, c");
        assert_eq!(display_value(&json!([1, 2, 3])), "1, 2, 3");
        assert_eq!(display_value(&json!("text")), "text");
        assert_eq!(display_value(&json!(3)), "3");
    }

    #[test]
    fn test_field_state_prefers_inferred() {
        let item = sample_item();
        assert_eq!(item.field_state("traits"), FieldState::Inferred);
        assert_eq!(item.field_state("age"), FieldState::Missing);
        assert_eq!(item.field_state("name"), FieldState::Extracted);
    }

    #[test]
    fn test_inferred_warning_present_only_when_flagged() {
        let item = sample_item();
        assert_eq!(
            item.inferred_warning().as_deref(),
            Some("Inferred fields: traits, personality")
        );

        let mut clean = sample_item();
        clean.inferred_fields.clear();
        assert!(clean.inferred_warning().is_none());
    }

    #[test]
    fn test_flag_drift_reports_unknown_keys() {
        let mut item = sample_item();
        item.inferred_fields.push("quote".to_string());
        assert_eq!(item.flag_drift(), vec!["quote".to_string()]);
    }

    #[test]
    fn test_edit_field_clears_flags() {
        let mut item = sample_item();
        item.edit_field("traits", json!(["wise"])).unwrap();
        assert_eq!(item.data["traits"], json!(["wise"]));
        assert!(!item.inferred_fields.contains(&"traits".to_string()));
        assert!(!item.missing_fields.contains(&"traits".to_string()));
        assert_eq!(item.field_state("traits"), FieldState::Extracted);
    }

    #[test]
    fn test_edit_field_rejects_kind_mismatch() {
        let mut item = sample_item();
        let err = item.edit_field("traits", json!("wise")).unwrap_err();
        assert!(matches!(err, FieldEditError::KindMismatch { .. }));
        // Null on either side is always accepted
        item.edit_field("mentor", json!("Elias Hart")).unwrap();
        item.edit_field("personality", Value::Null).unwrap();
    }

    #[test]
    fn test_edit_unknown_field_fails() {
        let mut item = sample_item();
        assert_eq!(
            item.edit_field("height", json!("tall")),
            Err(FieldEditError::UnknownField("height".to_string()))
        );
    }

    #[test]
    fn test_label_prefers_name_then_title() {
        let item = sample_item();
        assert_eq!(item.label(), "Luna Blackwood");

        let story = ExtractedItem::new(
            ItemType::Story,
            Confidence::Extracted,
            json!({ "title": "The Awakening Chronicle" }).as_object().cloned().unwrap(),
            "",
        );
        assert_eq!(story.label(), "The Awakening Chronicle");
    }

    #[test]
    fn test_serialization_uses_type_key_and_keeps_field_order() {
        let item = sample_item();
        let json = serde_json::to_string(&item).unwrap();
        assert!(json.starts_with("{\"type\":\"character\""));
        let name_pos = json.find("\"name\"").unwrap();
        let mentor_pos = json.find("\"mentor\"").unwrap();
        assert!(name_pos < mentor_pos);

        let parsed: ExtractedItem = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, item);
    }

    #[test]
    fn test_absent_flag_lists_deserialize_empty() {
        let parsed: ExtractedItem = serde_json::from_str(
            r#"{"type":"story","confidence":"inferred","data":{"title":"x"},"source":"s"}"#,
        )
        .unwrap();
        assert!(parsed.inferred_fields.is_empty());
        assert!(parsed.missing_fields.is_empty());
    }
}
