//! Location repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{decode_json, decode_timestamp, decode_uuid, encode_json, encode_timestamp};
use crate::application::ports::outbound::{LocationRepositoryPort, RepositoryError};
use crate::domain::entities::Location;
use crate::domain::value_objects::{LocationId, UserId};

pub struct SqliteLocationRepository {
    pool: SqlitePool,
}

impl SqliteLocationRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LocationRepositoryPort for SqliteLocationRepository {
    async fn create(&self, location: &Location) -> Result<LocationId, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO locations (
                id, user_id, name, location_type, primary_function, summary,
                key_scenes, visual_mood, core_symbolism, recurring_motifs, notes,
                connected_characters, visual_references, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(location.id.to_string())
        .bind(location.user_id.to_string())
        .bind(&location.name)
        .bind(&location.location_type)
        .bind(&location.primary_function)
        .bind(&location.summary)
        .bind(encode_json(&location.key_scenes)?)
        .bind(&location.visual_mood)
        .bind(&location.core_symbolism)
        .bind(encode_json(&location.recurring_motifs)?)
        .bind(&location.notes)
        .bind(encode_json(&location.connected_characters)?)
        .bind(encode_json(&location.visual_references)?)
        .bind(encode_timestamp(&location.created_at))
        .bind(encode_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(location.id)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Location>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM locations WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_location).collect()
    }
}

fn row_to_location(row: &SqliteRow) -> Result<Location, RepositoryError> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Location {
        id: decode_uuid(&id)?.into(),
        user_id: decode_uuid(&user_id)?.into(),
        name: row.try_get("name")?,
        location_type: row.try_get("location_type")?,
        primary_function: row.try_get("primary_function")?,
        summary: row.try_get("summary")?,
        key_scenes: decode_json(row.try_get("key_scenes")?)?,
        visual_mood: row.try_get("visual_mood")?,
        core_symbolism: row.try_get("core_symbolism")?,
        recurring_motifs: decode_json(row.try_get("recurring_motifs")?)?,
        notes: row.try_get("notes")?,
        connected_characters: decode_json(row.try_get("connected_characters")?)?,
        visual_references: decode_json(row.try_get("visual_references")?)?,
        created_at: decode_timestamp(&created_at)?,
    })
}
