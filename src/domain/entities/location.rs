//! Location entity - a saved place

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::value_objects::{LocationId, UserId};

/// A row of `locations`
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub id: LocationId,
    pub user_id: UserId,
    pub name: String,
    pub location_type: Option<String>,
    pub primary_function: Option<String>,
    pub summary: Option<String>,
    pub key_scenes: Option<Vec<String>>,
    /// Comma-joined visual features
    pub visual_mood: Option<String>,
    /// Comma-joined themes
    pub core_symbolism: Option<String>,
    pub recurring_motifs: Option<Vec<String>>,
    pub notes: Option<String>,
    pub connected_characters: Option<Vec<String>>,
    /// `{ "features": [...] }`
    pub visual_references: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Location {
    pub fn new(user_id: UserId, name: impl Into<String>) -> Self {
        Self {
            id: LocationId::new(),
            user_id,
            name: name.into(),
            location_type: None,
            primary_function: None,
            summary: None,
            key_scenes: None,
            visual_mood: None,
            core_symbolism: None,
            recurring_motifs: None,
            notes: None,
            connected_characters: None,
            visual_references: None,
            created_at: Utc::now(),
        }
    }
}
