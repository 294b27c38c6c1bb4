//! Record mapper - Flattens extracted items into table rows
//!
//! Extracted data is loosely shaped, so every lookup is forgiving: a value
//! that is absent, `null`, empty text, `0` or `false` counts as unset and
//! the column falls back to its default. Lists that must land in a legacy
//! text column are joined with ", "; an empty list joins to nothing.

use serde_json::{json, Map, Value};

use crate::domain::entities::{
    AbilityType, Chapter, CharacterAbility, CharacterProfile, CharacterRecord,
    CharacterRelationship, ExtractedItem, Location, RelationshipKind, Story,
};
use crate::domain::value_objects::{Confidence, StoryId, UserId};

/// Whether a value counts as set
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn element_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn get<'a>(data: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|v| truthy(v))
}

fn nested<'a>(data: &'a Map<String, Value>, parent: &str, key: &str) -> Option<&'a Value> {
    data.get(parent)
        .and_then(Value::as_object)
        .and_then(|obj| get(obj, key))
}

fn text(value: Option<&Value>) -> Option<String> {
    value.map(element_text).filter(|s| !s.is_empty())
}

/// List as array column; a lone scalar becomes a one-element list
fn list(value: Option<&Value>) -> Option<Vec<String>> {
    match value? {
        Value::Array(values) => Some(values.iter().map(element_text).collect()),
        other => Some(vec![element_text(other)]),
    }
}

/// List as legacy comma-joined text column
fn joined(value: Option<&Value>) -> Option<String> {
    list(value)
        .map(|values| values.join(", "))
        .filter(|s| !s.is_empty())
}

fn integer(value: Option<&Value>) -> Option<i64> {
    match value? {
        // Whole floats such as 3.0 are accepted; fractional ones are not
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| *n != 0)
}

/// Parent profile plus one ability row per skill and power and one
/// relationship row per ally
pub fn character_record(item: &ExtractedItem, user_id: UserId) -> CharacterRecord {
    let data = &item.data;
    let mut profile = CharacterProfile::new(user_id, text(get(data, "name")).unwrap_or_default());

    profile.title = text(get(data, "title"));
    profile.age = text(get(data, "age"));
    profile.species_race = text(get(data, "species"));
    profile.role_in_story = text(get(data, "role"));
    profile.backstory = text(get(data, "background"));
    profile.core_motivation = joined(nested(data, "personality", "core_traits"));
    profile.tragic_flaw = joined(nested(data, "personality", "flaws"));
    profile.emotional_tone = text(nested(data, "personality", "emotional_tone"));
    profile.voice_tone = text(get(data, "quote"));
    profile.affiliations = joined(nested(data, "relationships", "affiliations"));
    profile.summary_tagline = text(get(data, "background"));
    profile.notable_traits = joined(nested(data, "personality", "core_traits"));

    profile.affiliations_array = list(nested(data, "relationships", "affiliations"));
    profile.notable_traits_array = list(nested(data, "personality", "core_traits"));
    profile.catchphrases_array = text(get(data, "quote")).map(|quote| vec![quote]);
    profile.notable_features_array = list(nested(data, "visual_design", "accessories"));
    profile.confidence_score = item.confidence.score();
    profile.inferred = item.confidence == Confidence::Inferred;

    profile.outfit_breakdown = text(nested(data, "visual_design", "style_notes"));
    profile.pose_description = text(nested(data, "visual_design", "silhouette"));
    profile.silhouette_notes = text(nested(data, "visual_design", "silhouette"));
    profile.signature_weapon_tools = joined(nested(data, "visual_design", "accessories"));

    let character_id = profile.id;
    let skills = list(nested(data, "abilities", "core_skills")).unwrap_or_default();
    let powers = list(nested(data, "abilities", "powers")).unwrap_or_default();
    let abilities = skills
        .into_iter()
        .map(|name| CharacterAbility::new(character_id, AbilityType::Skill, name))
        .chain(
            powers
                .into_iter()
                .map(|name| CharacterAbility::new(character_id, AbilityType::Power, name)),
        )
        .collect();

    let relationships = list(nested(data, "relationships", "allies"))
        .unwrap_or_default()
        .into_iter()
        .map(|name| CharacterRelationship::new(character_id, RelationshipKind::Ally, name))
        .collect();

    CharacterRecord {
        profile,
        abilities,
        relationships,
    }
}

pub fn location_row(item: &ExtractedItem, user_id: UserId) -> Location {
    let data = &item.data;
    let mut location = Location::new(user_id, text(get(data, "name")).unwrap_or_default());

    location.location_type = text(get(data, "type"));
    location.primary_function = text(get(data, "description"));
    location.summary = text(get(data, "description"));
    location.key_scenes = list(get(data, "important_events"));
    location.visual_mood = joined(get(data, "visual_features"));
    location.core_symbolism = joined(get(data, "themes"));
    location.recurring_motifs = list(get(data, "themes"));
    location.notes = text(get(data, "history"));
    location.connected_characters = list(get(data, "notable_residents"));
    location.visual_references = get(data, "visual_features")
        .map(|features| json!({ "features": features }));
    location
}

pub fn story_row(item: &ExtractedItem, user_id: UserId) -> Story {
    let data = &item.data;
    let mut story = Story::new(user_id, text(get(data, "title")).unwrap_or_default());

    story.summary = text(get(data, "summary"));
    story.genre = text(get(data, "genre"));
    story.word_count = Some(0);
    story.themes = list(get(data, "themes"));
    // Main characters land in `tags`; the table has no better column
    story.tags = list(get(data, "main_characters"));
    story.notes = text(get(data, "author_notes"));
    story.structure = get(data, "world_rules").map(|rules| json!({ "world_rules": rules }));
    story
}

/// Chapter row attached to an already resolved story
pub fn chapter_row(item: &ExtractedItem, user_id: UserId, story_id: StoryId) -> Chapter {
    let data = &item.data;
    let number = integer(data.get("chapter_number")).unwrap_or(1);
    let mut chapter = Chapter::new(
        story_id,
        user_id,
        text(get(data, "title")).unwrap_or_default(),
        number,
    );

    chapter.summary = text(get(data, "summary"));
    chapter.word_count = integer(data.get("word_count")).unwrap_or(0);
    chapter.pov_character = text(get(data, "POV_character"));
    chapter.location = joined(get(data, "locations"));
    chapter.tone = text(get(data, "tone"));
    chapter.narrative_purpose = text(get(data, "narrative_function"));
    chapter.plot_triggers = list(get(data, "events"));
    chapter.linked_characters = list(get(data, "characters_present"));
    chapter.linked_locations = list(get(data, "locations"));
    chapter.themes = list(get(data, "themes"));
    chapter
}
