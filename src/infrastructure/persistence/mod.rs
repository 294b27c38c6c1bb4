//! SQLite persistence adapters
//!
//! This module implements the repository ports on top of a single SQLite
//! pool, one repository per destination table family.

mod chapter_repository;
mod character_repository;
mod location_repository;
mod schema;
mod story_repository;

pub use chapter_repository::SqliteChapterRepository;
pub use character_repository::SqliteCharacterRepository;
pub use location_repository::SqliteLocationRepository;
pub use story_repository::SqliteStoryRepository;

use std::str::FromStr;
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::application::ports::outbound::{Repositories, RepositoryError};

impl From<sqlx::Error> for RepositoryError {
    fn from(err: sqlx::Error) -> Self {
        RepositoryError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::Serialization(err.to_string())
    }
}

/// Combined repository providing access to all table repositories
#[derive(Clone)]
pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    pub async fn connect(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database URL: {}", database_url))?
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .connect_with(options)
            .await
            .context("Failed to connect to SQLite database")?;
        Self::with_pool(pool).await
    }

    /// Single-connection in-memory database
    #[cfg(test)]
    pub async fn in_memory() -> Result<Self> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Self::with_pool(pool).await
    }

    async fn with_pool(pool: SqlitePool) -> Result<Self> {
        schema::initialize(&pool)
            .await
            .context("Failed to initialize database schema")?;
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn characters(&self) -> SqliteCharacterRepository {
        SqliteCharacterRepository::new(self.pool.clone())
    }

    pub fn locations(&self) -> SqliteLocationRepository {
        SqliteLocationRepository::new(self.pool.clone())
    }

    pub fn stories(&self) -> SqliteStoryRepository {
        SqliteStoryRepository::new(self.pool.clone())
    }

    pub fn chapters(&self) -> SqliteChapterRepository {
        SqliteChapterRepository::new(self.pool.clone())
    }

    /// Port handles for the application services
    pub fn repositories(&self) -> Repositories {
        Repositories {
            characters: Arc::new(self.characters()),
            locations: Arc::new(self.locations()),
            stories: Arc::new(self.stories()),
            chapters: Arc::new(self.chapters()),
        }
    }
}

// Column codecs shared by the table repositories

fn encode_json<T: Serialize>(value: &Option<T>) -> Result<Option<String>, RepositoryError> {
    value
        .as_ref()
        .map(serde_json::to_string)
        .transpose()
        .map_err(Into::into)
}

fn decode_json<T: DeserializeOwned>(value: Option<String>) -> Result<Option<T>, RepositoryError> {
    value
        .map(|raw| serde_json::from_str(&raw))
        .transpose()
        .map_err(Into::into)
}

fn decode_uuid(value: &str) -> Result<Uuid, RepositoryError> {
    Uuid::parse_str(value).map_err(|e| RepositoryError::Serialization(e.to_string()))
}

/// Fixed-width form so that text ordering matches time ordering
fn encode_timestamp(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn decode_timestamp(value: &str) -> Result<DateTime<Utc>, RepositoryError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| RepositoryError::Serialization(e.to_string()))
}
