//! Chapter repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{decode_json, decode_timestamp, decode_uuid, encode_json, encode_timestamp};
use crate::application::ports::outbound::{ChapterRepositoryPort, RepositoryError};
use crate::domain::entities::{Chapter, DRAFT_STATUS};
use crate::domain::value_objects::{ChapterId, UserId};

pub struct SqliteChapterRepository {
    pool: SqlitePool,
}

impl SqliteChapterRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ChapterRepositoryPort for SqliteChapterRepository {
    async fn create(&self, chapter: &Chapter) -> Result<ChapterId, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO chapters (
                id, story_id, user_id, title, chapter_number, content_plain,
                content_xml, summary, word_count, status, pov_character, location,
                tone, narrative_purpose, plot_triggers, linked_characters,
                linked_locations, themes, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(chapter.id.to_string())
        .bind(chapter.story_id.to_string())
        .bind(chapter.user_id.to_string())
        .bind(&chapter.title)
        .bind(chapter.chapter_number)
        .bind(&chapter.content_plain)
        .bind(&chapter.content_xml)
        .bind(&chapter.summary)
        .bind(chapter.word_count)
        .bind(&chapter.status)
        .bind(&chapter.pov_character)
        .bind(&chapter.location)
        .bind(&chapter.tone)
        .bind(&chapter.narrative_purpose)
        .bind(encode_json(&chapter.plot_triggers)?)
        .bind(encode_json(&chapter.linked_characters)?)
        .bind(encode_json(&chapter.linked_locations)?)
        .bind(encode_json(&chapter.themes)?)
        .bind(encode_timestamp(&chapter.created_at))
        .bind(encode_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(chapter.id)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<Chapter>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM chapters WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_chapter).collect()
    }
}

fn row_to_chapter(row: &SqliteRow) -> Result<Chapter, RepositoryError> {
    let id: String = row.try_get("id")?;
    let story_id: String = row.try_get("story_id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Chapter {
        id: decode_uuid(&id)?.into(),
        story_id: decode_uuid(&story_id)?.into(),
        user_id: decode_uuid(&user_id)?.into(),
        title: row.try_get("title")?,
        chapter_number: row.try_get("chapter_number")?,
        content_plain: row.try_get("content_plain")?,
        content_xml: row.try_get("content_xml")?,
        summary: row.try_get("summary")?,
        word_count: row.try_get::<Option<i64>, _>("word_count")?.unwrap_or_default(),
        status: row
            .try_get::<Option<String>, _>("status")?
            .unwrap_or_else(|| DRAFT_STATUS.to_string()),
        pov_character: row.try_get("pov_character")?,
        location: row.try_get("location")?,
        tone: row.try_get("tone")?,
        narrative_purpose: row.try_get("narrative_purpose")?,
        plot_triggers: decode_json(row.try_get("plot_triggers")?)?,
        linked_characters: decode_json(row.try_get("linked_characters")?)?,
        linked_locations: decode_json(row.try_get("linked_locations")?)?,
        themes: decode_json(row.try_get("themes")?)?,
        created_at: decode_timestamp(&created_at)?,
    })
}
