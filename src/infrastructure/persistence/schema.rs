//! Table definitions for the story database
//!
//! List columns hold JSON arrays and JSON columns hold JSON documents, both
//! stored as TEXT. Timestamps are RFC 3339 strings.

use sqlx::SqlitePool;

const STATEMENTS: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS character_profiles (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        full_name TEXT NOT NULL,
        title TEXT,
        age TEXT,
        species_race TEXT,
        role_in_story TEXT,
        backstory TEXT,
        core_motivation TEXT,
        tragic_flaw TEXT,
        emotional_tone TEXT,
        voice_tone TEXT,
        alignment TEXT,
        affiliations TEXT,
        birthplace TEXT,
        summary_tagline TEXT,
        notable_traits TEXT,
        affiliations_array TEXT,
        notable_traits_array TEXT,
        catchphrases_array TEXT,
        notable_features_array TEXT,
        confidence_score REAL,
        inferred INTEGER,
        outfit_breakdown TEXT,
        pose_description TEXT,
        silhouette_notes TEXT,
        signature_weapon_tools TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_abilities (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES character_profiles(id) ON DELETE CASCADE,
        ability_type TEXT NOT NULL,
        name TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_relationships (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES character_profiles(id) ON DELETE CASCADE,
        character_name TEXT NOT NULL,
        relationship_type TEXT NOT NULL,
        related_character_id TEXT,
        is_bidirectional INTEGER,
        description TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_inspirations (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES character_profiles(id) ON DELETE CASCADE,
        influence_name TEXT NOT NULL,
        influence_type TEXT,
        why_they_matter TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_weaknesses (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES character_profiles(id) ON DELETE CASCADE,
        weakness_name TEXT NOT NULL,
        description TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS character_visual_references (
        id TEXT PRIMARY KEY,
        character_id TEXT NOT NULL REFERENCES character_profiles(id) ON DELETE CASCADE,
        image_url TEXT,
        image_type TEXT,
        alt_text TEXT,
        caption TEXT,
        notes TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS locations (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        name TEXT NOT NULL,
        location_type TEXT,
        status TEXT,
        primary_function TEXT,
        access TEXT,
        summary TEXT,
        key_scenes TEXT,
        story_importance TEXT,
        visual_mood TEXT,
        sensory_details TEXT,
        weather_effects TEXT,
        cultural_feel TEXT,
        core_symbolism TEXT,
        recurring_motifs TEXT,
        emotional_weight TEXT,
        timeline_anchor TEXT,
        notes TEXT,
        connected_characters TEXT,
        related_artifacts TEXT,
        visual_references TEXT,
        atmosphere_rating TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS stories (
        id TEXT PRIMARY KEY,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        summary TEXT,
        genre TEXT,
        status TEXT,
        target_audience TEXT,
        word_count INTEGER,
        target_word_count INTEGER,
        themes TEXT,
        tags TEXT,
        notes TEXT,
        structure TEXT,
        narrative_devices TEXT,
        estimated_read_time_minutes INTEGER,
        series_id TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chapters (
        id TEXT PRIMARY KEY,
        story_id TEXT NOT NULL REFERENCES stories(id) ON DELETE CASCADE,
        user_id TEXT NOT NULL,
        title TEXT NOT NULL,
        chapter_number INTEGER NOT NULL,
        content_plain TEXT,
        content_xml TEXT,
        summary TEXT,
        word_count INTEGER,
        status TEXT,
        pov_character TEXT,
        location TEXT,
        timeline_notes TEXT,
        notes TEXT,
        tone TEXT,
        narrative_purpose TEXT,
        plot_triggers TEXT,
        linked_characters TEXT,
        linked_locations TEXT,
        themes TEXT,
        motifs TEXT,
        emotional_impact TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chapter_visual_references (
        id TEXT PRIMARY KEY,
        chapter_id TEXT NOT NULL REFERENCES chapters(id) ON DELETE CASCADE,
        image_url TEXT,
        image_type TEXT,
        alt_text TEXT,
        caption TEXT,
        created_at TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS chapter_tags (
        id TEXT PRIMARY KEY,
        chapter_id TEXT NOT NULL REFERENCES chapters(id) ON DELETE CASCADE,
        tag TEXT NOT NULL,
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS idx_character_profiles_user ON character_profiles(user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_locations_user ON locations(user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_stories_user ON stories(user_id, created_at)",
    "CREATE INDEX IF NOT EXISTS idx_chapters_user ON chapters(user_id, created_at)",
];

/// Create every table and index that does not exist yet
pub async fn initialize(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    for statement in STATEMENTS {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
