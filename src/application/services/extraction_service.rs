//! Extraction Service - Mock keyword extraction over narrative text
//!
//! Each requested template runs a fixed battery of case-sensitive substring
//! checks; every hit yields one pre-authored item. Nothing beyond the
//! presence check is read from the input.

use std::time::Duration;

use serde_json::{json, Map, Value};
use tracing::{debug, info, instrument};

use crate::domain::entities::ExtractedItem;
use crate::domain::value_objects::{Confidence, ItemType};

/// Default input text offered to a new review session
pub const SAMPLE_CONTENT: &str = "Elias Hart, a 34-year-old scholar, worked late nights in the dusty archives of Ashmoor University. Known for his meticulous research and guarded demeanor, he specialized in ancient texts and forgotten languages. The university itself was a sprawling Gothic campus built in 1847, infamous for supernatural occurrences.

Luna Blackwood lived deep in the Whispering Woods, a dense forest that bordered the university grounds. As the village's herbalist, she possessed knowledge of medicinal plants and old remedies passed down through generations.

The Awakening Ceremony took place on the autumn equinox, when the barrier between worlds grew thin. During this ritual, Elias discovered his latent abilities while Luna guided him through the transformation.";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractionError {
    #[error("Please enter some content to extract")]
    EmptyContent,
    #[error("Please select at least one template")]
    NoTemplatesSelected,
    #[error("Extraction is already in progress")]
    ExtractionInProgress,
}

/// Reject input before any extraction work starts
pub fn validate_request(content: &str, templates: &[ItemType]) -> Result<(), ExtractionError> {
    if content.trim().is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    if templates.is_empty() {
        return Err(ExtractionError::NoTemplatesSelected);
    }
    Ok(())
}

/// Run the keyword battery for every requested template
///
/// Output order is fixed regardless of the order `templates` is given in:
/// characters, locations, the story summary, then the chapter.
pub fn extract_items(content: &str, templates: &[ItemType]) -> Vec<ExtractedItem> {
    let wants = |kind: ItemType| templates.contains(&kind);
    let mut items = Vec::new();

    if wants(ItemType::Character) {
        if content.contains("Elias Hart") {
            items.push(elias_hart());
        }
        if content.contains("Luna Blackwood") {
            items.push(luna_blackwood());
        }
    }

    if wants(ItemType::Location) {
        if content.contains("Ashmoor University") {
            items.push(ashmoor_university());
        }
        if content.contains("Whispering Woods") {
            items.push(whispering_woods());
        }
    }

    // Unconditional once requested
    if wants(ItemType::Story) {
        items.push(awakening_chronicle());
    }

    if wants(ItemType::Chapter) {
        items.push(awakening_ceremony());
    }

    items
}

fn fields(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

fn elias_hart() -> ExtractedItem {
    let data = json!({
        "id": "char_elias_hart",
        "name": "Elias Hart",
        "title": "Scholar",
        "age": "34",
        "species": "Human",
        "role": "Protagonist",
        "background": "Works in university archives, specializes in ancient texts",
        "personality": {
            "core_traits": ["meticulous", "scholarly", "guarded"],
            "flaws": ["overly cautious", "socially distant"],
            "emotional_tone": "reserved but passionate about knowledge"
        },
        "visual_design": {
            "silhouette": "tall, lean academic figure",
            "style_notes": "worn scholarly robes, glasses",
            "accessories": ["ancient tome", "research notes"]
        },
        "abilities": {
            "core_skills": ["research", "ancient languages", "pattern recognition"],
            "powers": ["latent magical abilities (discovered later)"]
        },
        "relationships": {
            "allies": ["Luna Blackwood"],
            "rivals": [],
            "mentor": "",
            "affiliations": ["Ashmoor University"]
        },
        "appearance_in_chapters": [1, 2, 3],
        "tags": ["scholar", "protagonist", "magic-user"],
        "quote": "Knowledge is the key that unlocks all mysteries."
    });
    ExtractedItem::new(
        ItemType::Character,
        Confidence::Extracted,
        fields(data),
        "Elias Hart, a 34-year-old scholar, worked late nights in the dusty archives...",
    )
    .with_inferred(&["personality", "visual_design", "abilities", "quote"])
}

fn luna_blackwood() -> ExtractedItem {
    let data = json!({
        "id": "char_luna_blackwood",
        "name": "Luna Blackwood",
        "title": "Village Herbalist",
        "age": "",
        "species": "Human",
        "role": "Mentor/Guide",
        "background": "Lives in Whispering Woods, keeper of ancient remedies",
        "personality": {
            "core_traits": ["wise", "nurturing", "mysterious"],
            "flaws": ["secretive", "overly protective"],
            "emotional_tone": "calm and knowing"
        },
        "visual_design": {
            "silhouette": "graceful forest dweller",
            "style_notes": "earth-toned robes, nature accessories",
            "accessories": ["herb pouch", "carved staff"]
        },
        "abilities": {
            "core_skills": ["herbalism", "healing", "nature lore"],
            "powers": ["plant magic", "ritual guidance"]
        },
        "relationships": {
            "allies": ["Elias Hart"],
            "rivals": [],
            "mentor": "",
            "affiliations": ["Whispering Woods", "Village Healers"]
        },
        "appearance_in_chapters": [2, 3],
        "tags": ["herbalist", "mentor", "nature-magic"],
        "quote": "The forest speaks to those who know how to listen."
    });
    ExtractedItem::new(
        ItemType::Character,
        Confidence::Extracted,
        fields(data),
        "Luna Blackwood lived deep in the Whispering Woods...",
    )
    .with_inferred(&["personality", "visual_design", "abilities", "quote"])
    .with_missing(&["age"])
}

fn ashmoor_university() -> ExtractedItem {
    let data = json!({
        "id": "loc_ashmoor_university",
        "name": "Ashmoor University",
        "type": "Educational Institution",
        "region": "Academic District",
        "description": "Sprawling Gothic campus with dusty archives and ancient knowledge",
        "history": "Built in 1847, long history of supernatural occurrences",
        "important_events": ["The Awakening Ceremony"],
        "notable_residents": ["Elias Hart", "Various scholars"],
        "themes": ["knowledge", "mystery", "tradition"],
        "visual_features": ["Gothic architecture", "dusty archives", "stone corridors"],
        "chapter_appearances": [1, 2, 3],
        "connected_locations": ["Whispering Woods"]
    });
    ExtractedItem::new(
        ItemType::Location,
        Confidence::Extracted,
        fields(data),
        "The university itself was a sprawling Gothic campus built in 1847...",
    )
    .with_inferred(&["themes", "visual_features"])
}

fn whispering_woods() -> ExtractedItem {
    let data = json!({
        "id": "loc_whispering_woods",
        "name": "Whispering Woods",
        "type": "Ancient Forest",
        "region": "Wilderness",
        "description": "Dense forest that borders the university grounds, home to herbalist",
        "history": "Ancient forest with mystical properties",
        "important_events": ["Luna's guidance rituals"],
        "notable_residents": ["Luna Blackwood"],
        "themes": ["nature", "wisdom", "magic"],
        "visual_features": ["dense canopy", "hidden paths", "mystical atmosphere"],
        "chapter_appearances": [2, 3],
        "connected_locations": ["Ashmoor University"]
    });
    ExtractedItem::new(
        ItemType::Location,
        Confidence::Extracted,
        fields(data),
        "Luna Blackwood lived deep in the Whispering Woods, a dense forest...",
    )
    .with_inferred(&["history", "themes", "visual_features"])
}

fn awakening_chronicle() -> ExtractedItem {
    let data = json!({
        "title": "The Awakening Chronicle",
        "summary": "A scholar discovers his magical abilities with the help of a forest herbalist",
        "themes": ["discovery", "transformation", "ancient knowledge", "mentorship"],
        "genre": "Fantasy",
        "world_rules": {
            "magic_system": "Latent abilities awakened through ritual and guidance",
            "technology_level": "Victorian-era with magical elements",
            "governing_bodies": ["University Council"],
            "factions": ["Scholars", "Forest Dwellers"]
        },
        "core_conflict": "Elias must accept and master his newfound magical abilities",
        "main_characters": ["Elias Hart", "Luna Blackwood"],
        "timeline": ["Discovery in archives", "Meeting Luna", "Awakening ceremony"],
        "chapter_order": [1, 2, 3],
        "author_notes": "Focus on character growth and magical discovery"
    });
    ExtractedItem::new(
        ItemType::Story,
        Confidence::Extracted,
        fields(data),
        "Overall narrative extracted from the provided content...",
    )
    .with_inferred(&["title", "summary", "themes", "world_rules", "author_notes"])
}

fn awakening_ceremony() -> ExtractedItem {
    let data = json!({
        "id": "ch_awakening_ceremony",
        "title": "The Awakening Ceremony",
        "chapter_number": 3,
        "summary": "Elias undergoes the awakening ritual guided by Luna",
        "events": ["Ritual preparation", "Barrier thinning", "Ability manifestation", "Transformation"],
        "POV_character": "Elias Hart",
        "locations": ["Whispering Woods"],
        "characters_present": ["Elias Hart", "Luna Blackwood"],
        "themes": ["transformation", "guidance", "supernatural"],
        "narrative_function": "Climactic awakening of protagonist powers",
        "conflict": "Elias must overcome fear and accept his magical nature",
        "tone": "mystical and transformative",
        "word_count": 0
    });
    ExtractedItem::new(
        ItemType::Chapter,
        Confidence::Extracted,
        fields(data),
        "The Awakening Ceremony took place on the autumn equinox...",
    )
    .with_inferred(&["title", "chapter_number", "summary", "events", "narrative_function"])
    .with_missing(&["word_count"])
}

/// Stateless extraction with the simulated processing latency
pub struct ExtractionService {
    delay: Duration,
}

impl ExtractionService {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Validate, wait out the processing delay, then extract
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn extract(
        &self,
        content: &str,
        templates: &[ItemType],
    ) -> Result<Vec<ExtractedItem>, ExtractionError> {
        validate_request(content, templates)?;

        if !self.delay.is_zero() {
            debug!(delay_ms = self.delay.as_millis() as u64, "Simulating extraction latency");
            tokio::time::sleep(self.delay).await;
        }

        let items = extract_items(content, templates);
        info!(count = items.len(), "Extracted items");
        Ok(items)
    }
}
