use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::application::services::{ReviewItem, ReviewSession, WizardStep};
use crate::domain::entities::{display_value, FieldState};
use crate::domain::value_objects::{Confidence, ItemType};

#[derive(Debug, Deserialize)]
pub struct UpdateInputRequestDto {
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub templates: Option<Vec<ItemType>>,
}

#[derive(Debug, Deserialize)]
pub struct EditFieldRequestDto {
    pub value: Value,
}

#[derive(Debug, Default, Deserialize)]
pub struct ApproveQueryDto {
    #[serde(default)]
    pub story_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldViewDto {
    pub name: String,
    pub value: Value,
    pub display: String,
    pub state: FieldState,
}

#[derive(Debug, Serialize)]
pub struct ReviewItemDto {
    pub index: usize,
    #[serde(rename = "type")]
    pub item_type: ItemType,
    pub confidence: Confidence,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    /// Flags that name fields missing from the item's data
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub flag_drift: Vec<String>,
    pub saved_id: Option<String>,
    pub fields: Vec<FieldViewDto>,
}

impl ReviewItemDto {
    fn from_entry(index: usize, entry: &ReviewItem) -> Self {
        let item = &entry.item;
        let fields = item
            .data
            .iter()
            .map(|(name, value)| FieldViewDto {
                name: name.clone(),
                value: value.clone(),
                display: display_value(value),
                state: item.field_state(name),
            })
            .collect();

        Self {
            index,
            item_type: item.item_type,
            confidence: item.confidence,
            source: item.source.clone(),
            warning: item.inferred_warning(),
            flag_drift: item.flag_drift(),
            saved_id: entry.saved_id.clone(),
            fields,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReviewSessionDto {
    pub id: String,
    pub step: u8,
    pub step_name: String,
    pub is_extracting: bool,
    pub content: String,
    pub templates: Vec<ItemType>,
    pub items: Vec<ReviewItemDto>,
    pub created_at: String,
}

impl From<ReviewSession> for ReviewSessionDto {
    fn from(session: ReviewSession) -> Self {
        Self {
            id: session.id.to_string(),
            step: session.step.number(),
            step_name: session.step.as_str().to_string(),
            is_extracting: session.step == WizardStep::Extracting,
            items: session
                .items
                .iter()
                .enumerate()
                .map(|(index, entry)| ReviewItemDto::from_entry(index, entry))
                .collect(),
            content: session.content,
            templates: session.templates,
            created_at: session.created_at.to_rfc3339(),
        }
    }
}
