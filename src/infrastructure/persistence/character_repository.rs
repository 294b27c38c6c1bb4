//! Character repository: `character_profiles` plus its ability and
//! relationship child tables

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqlitePool};

use super::{decode_json, decode_timestamp, decode_uuid, encode_json, encode_timestamp};
use crate::application::ports::outbound::{CharacterRepositoryPort, RepositoryError};
use crate::domain::entities::{CharacterProfile, CharacterRecord};
use crate::domain::value_objects::{CharacterProfileId, UserId};

pub struct SqliteCharacterRepository {
    pool: SqlitePool,
}

impl SqliteCharacterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CharacterRepositoryPort for SqliteCharacterRepository {
    async fn create(&self, record: &CharacterRecord) -> Result<CharacterProfileId, RepositoryError> {
        let profile = &record.profile;
        let created_at = encode_timestamp(&profile.created_at);
        let updated_at = encode_timestamp(&Utc::now());

        // Profile and child rows land together or not at all
        let mut tx = self.pool.begin().await?;

        sqlx::query(
            r#"
            INSERT INTO character_profiles (
                id, user_id, full_name, title, age, species_race, role_in_story,
                backstory, core_motivation, tragic_flaw, emotional_tone, voice_tone,
                affiliations, summary_tagline, notable_traits, affiliations_array,
                notable_traits_array, catchphrases_array, notable_features_array,
                confidence_score, inferred, outfit_breakdown, pose_description,
                silhouette_notes, signature_weapon_tools, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(profile.id.to_string())
        .bind(profile.user_id.to_string())
        .bind(&profile.full_name)
        .bind(&profile.title)
        .bind(&profile.age)
        .bind(&profile.species_race)
        .bind(&profile.role_in_story)
        .bind(&profile.backstory)
        .bind(&profile.core_motivation)
        .bind(&profile.tragic_flaw)
        .bind(&profile.emotional_tone)
        .bind(&profile.voice_tone)
        .bind(&profile.affiliations)
        .bind(&profile.summary_tagline)
        .bind(&profile.notable_traits)
        .bind(encode_json(&profile.affiliations_array)?)
        .bind(encode_json(&profile.notable_traits_array)?)
        .bind(encode_json(&profile.catchphrases_array)?)
        .bind(encode_json(&profile.notable_features_array)?)
        .bind(profile.confidence_score)
        .bind(profile.inferred)
        .bind(&profile.outfit_breakdown)
        .bind(&profile.pose_description)
        .bind(&profile.silhouette_notes)
        .bind(&profile.signature_weapon_tools)
        .bind(&created_at)
        .bind(&updated_at)
        .execute(&mut *tx)
        .await?;

        if !record.abilities.is_empty() {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO character_abilities (id, character_id, ability_type, name, description, created_at) ",
            );
            builder.push_values(&record.abilities, |mut row, ability| {
                row.push_bind(ability.id.to_string())
                    .push_bind(ability.character_id.to_string())
                    .push_bind(ability.ability_type.as_str())
                    .push_bind(ability.name.clone())
                    .push_bind(ability.description.clone())
                    .push_bind(created_at.clone());
            });
            builder.build().execute(&mut *tx).await?;
        }

        if !record.relationships.is_empty() {
            let mut builder: QueryBuilder<Sqlite> = QueryBuilder::new(
                "INSERT INTO character_relationships (id, character_id, character_name, relationship_type, description, created_at) ",
            );
            builder.push_values(&record.relationships, |mut row, relationship| {
                row.push_bind(relationship.id.to_string())
                    .push_bind(relationship.character_id.to_string())
                    .push_bind(relationship.character_name.clone())
                    .push_bind(relationship.relationship_type.as_str())
                    .push_bind(relationship.description.clone())
                    .push_bind(created_at.clone());
            });
            builder.build().execute(&mut *tx).await?;
        }

        tx.commit().await?;
        Ok(profile.id)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<CharacterProfile>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM character_profiles WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_profile).collect()
    }
}

fn row_to_profile(row: &SqliteRow) -> Result<CharacterProfile, RepositoryError> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(CharacterProfile {
        id: decode_uuid(&id)?.into(),
        user_id: decode_uuid(&user_id)?.into(),
        full_name: row.try_get("full_name")?,
        title: row.try_get("title")?,
        age: row.try_get("age")?,
        species_race: row.try_get("species_race")?,
        role_in_story: row.try_get("role_in_story")?,
        backstory: row.try_get("backstory")?,
        core_motivation: row.try_get("core_motivation")?,
        tragic_flaw: row.try_get("tragic_flaw")?,
        emotional_tone: row.try_get("emotional_tone")?,
        voice_tone: row.try_get("voice_tone")?,
        affiliations: row.try_get("affiliations")?,
        summary_tagline: row.try_get("summary_tagline")?,
        notable_traits: row.try_get("notable_traits")?,
        affiliations_array: decode_json(row.try_get("affiliations_array")?)?,
        notable_traits_array: decode_json(row.try_get("notable_traits_array")?)?,
        catchphrases_array: decode_json(row.try_get("catchphrases_array")?)?,
        notable_features_array: decode_json(row.try_get("notable_features_array")?)?,
        confidence_score: row.try_get::<Option<f64>, _>("confidence_score")?.unwrap_or_default(),
        inferred: row.try_get::<Option<bool>, _>("inferred")?.unwrap_or_default(),
        outfit_breakdown: row.try_get("outfit_breakdown")?,
        pose_description: row.try_get("pose_description")?,
        silhouette_notes: row.try_get("silhouette_notes")?,
        signature_weapon_tools: row.try_get("signature_weapon_tools")?,
        created_at: decode_timestamp(&created_at)?,
    })
}
