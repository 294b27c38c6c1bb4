//! Story repository

use async_trait::async_trait;
use chrono::Utc;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqlitePool};

use super::{decode_json, decode_timestamp, decode_uuid, encode_json, encode_timestamp};
use crate::application::ports::outbound::{RepositoryError, StoryRepositoryPort};
use crate::domain::entities::{Story, DRAFT_STATUS};
use crate::domain::value_objects::{StoryId, UserId, PLACEHOLDER_STORY_TITLE};

pub struct SqliteStoryRepository {
    pool: SqlitePool,
}

impl SqliteStoryRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StoryRepositoryPort for SqliteStoryRepository {
    async fn create(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO stories (
                id, user_id, title, summary, genre, status, word_count,
                themes, tags, notes, structure, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(story.id.to_string())
        .bind(story.user_id.to_string())
        .bind(&story.title)
        .bind(&story.summary)
        .bind(&story.genre)
        .bind(&story.status)
        .bind(story.word_count)
        .bind(encode_json(&story.themes)?)
        .bind(encode_json(&story.tags)?)
        .bind(&story.notes)
        .bind(encode_json(&story.structure)?)
        .bind(encode_timestamp(&story.created_at))
        .bind(encode_timestamp(&Utc::now()))
        .execute(&self.pool)
        .await?;

        Ok(story.id)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        story_id: StoryId,
    ) -> Result<Option<Story>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM stories WHERE id = ? AND user_id = ?")
            .bind(story_id.to_string())
            .bind(user_id.to_string())
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_story).transpose()
    }

    async fn find_placeholder(&self, user_id: UserId) -> Result<Option<Story>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT * FROM stories
            WHERE user_id = ? AND title = ? AND status = ?
            ORDER BY created_at ASC
            LIMIT 1
            "#,
        )
        .bind(user_id.to_string())
        .bind(PLACEHOLDER_STORY_TITLE)
        .bind(DRAFT_STATUS)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(row_to_story).transpose()
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Story>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM stories WHERE user_id = ? ORDER BY created_at DESC LIMIT ?",
        )
        .bind(user_id.to_string())
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_story).collect()
    }
}

fn row_to_story(row: &SqliteRow) -> Result<Story, RepositoryError> {
    let id: String = row.try_get("id")?;
    let user_id: String = row.try_get("user_id")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Story {
        id: decode_uuid(&id)?.into(),
        user_id: decode_uuid(&user_id)?.into(),
        title: row.try_get("title")?,
        summary: row.try_get("summary")?,
        genre: row.try_get("genre")?,
        status: row
            .try_get::<Option<String>, _>("status")?
            .unwrap_or_else(|| DRAFT_STATUS.to_string()),
        word_count: row.try_get("word_count")?,
        themes: decode_json(row.try_get("themes")?)?,
        tags: decode_json(row.try_get("tags")?)?,
        notes: row.try_get("notes")?,
        structure: decode_json(row.try_get("structure")?)?,
        created_at: decode_timestamp(&created_at)?,
    })
}
