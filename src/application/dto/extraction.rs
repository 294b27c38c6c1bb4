use serde::{Deserialize, Serialize};

use crate::domain::entities::ExtractedItem;
use crate::domain::value_objects::ItemType;

#[derive(Debug, Deserialize)]
pub struct ExtractRequestDto {
    pub content: String,
    #[serde(default)]
    pub templates: Vec<ItemType>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponseDto {
    pub count: usize,
    pub items: Vec<ExtractedItem>,
}

impl From<Vec<ExtractedItem>> for ExtractResponseDto {
    fn from(items: Vec<ExtractedItem>) -> Self {
        Self {
            count: items.len(),
            items,
        }
    }
}

/// Body of `POST /api/save`
#[derive(Debug, Deserialize)]
pub struct SaveRequestDto {
    pub items: Vec<ExtractedItem>,
    #[serde(default)]
    pub story_id: Option<String>,
}
