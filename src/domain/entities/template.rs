//! Template catalog - the four fixed extraction schemas

use serde_json::{json, Value};

use crate::domain::value_objects::ItemType;

/// A fixed, named field schema an extracted record should follow
#[derive(Debug, Clone)]
pub struct Template {
    pub kind: ItemType,
    pub title: &'static str,
}

impl Template {
    pub fn for_kind(kind: ItemType) -> Self {
        let title = match kind {
            ItemType::Character => "Character Template",
            ItemType::Location => "Location Template",
            ItemType::Story => "Overall Story Template",
            ItemType::Chapter => "Chapter Template",
        };
        Self { kind, title }
    }

    /// The empty JSON document describing this template's fields
    pub fn skeleton(&self) -> Value {
        match self.kind {
            ItemType::Character => json!({
                "id": "",
                "name": "",
                "title": "",
                "age": "",
                "species": "",
                "role": "",
                "background": "",
                "personality": {
                    "core_traits": [],
                    "flaws": [],
                    "emotional_tone": ""
                },
                "visual_design": {
                    "silhouette": "",
                    "style_notes": "",
                    "accessories": []
                },
                "abilities": {
                    "core_skills": [],
                    "powers": []
                },
                "relationships": {
                    "allies": [],
                    "rivals": [],
                    "mentor": "",
                    "affiliations": []
                },
                "appearance_in_chapters": [],
                "tags": [],
                "quote": ""
            }),
            ItemType::Location => json!({
                "id": "",
                "name": "",
                "type": "",
                "region": "",
                "description": "",
                "history": "",
                "important_events": [],
                "notable_residents": [],
                "themes": [],
                "visual_features": [],
                "chapter_appearances": [],
                "connected_locations": []
            }),
            ItemType::Story => json!({
                "title": "",
                "summary": "",
                "themes": [],
                "genre": "",
                "world_rules": {
                    "magic_system": "",
                    "technology_level": "",
                    "governing_bodies": [],
                    "factions": []
                },
                "core_conflict": "",
                "main_characters": [],
                "timeline": [],
                "chapter_order": [],
                "author_notes": ""
            }),
            ItemType::Chapter => json!({
                "id": "",
                "title": "",
                "chapter_number": 0,
                "summary": "",
                "events": [],
                "POV_character": "",
                "locations": [],
                "characters_present": [],
                "themes": [],
                "narrative_function": "",
                "conflict": "",
                "tone": "",
                "word_count": 0
            }),
        }
    }

    /// Top-level field names in authored order
    pub fn fields(&self) -> Vec<String> {
        match self.skeleton() {
            Value::Object(map) => map.keys().cloned().collect(),
            _ => Vec::new(),
        }
    }
}

/// All templates in catalog order
pub fn catalog() -> Vec<Template> {
    ItemType::ALL.iter().map(|kind| Template::for_kind(*kind)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_has_four_templates_in_order() {
        let kinds: Vec<ItemType> = catalog().iter().map(|t| t.kind).collect();
        assert_eq!(kinds, ItemType::ALL.to_vec());
    }

    #[test]
    fn test_fields_keep_authored_order() {
        let fields = Template::for_kind(ItemType::Location).fields();
        assert_eq!(fields.first().map(String::as_str), Some("id"));
        assert_eq!(fields.last().map(String::as_str), Some("connected_locations"));
        assert_eq!(fields.len(), 12);
    }

    #[test]
    fn test_chapter_skeleton_uses_numeric_defaults() {
        let skeleton = Template::for_kind(ItemType::Chapter).skeleton();
        assert_eq!(skeleton["chapter_number"], json!(0));
        assert_eq!(skeleton["word_count"], json!(0));
        assert!(skeleton.get("POV_character").is_some());
    }
}
