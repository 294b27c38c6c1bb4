//! Application configuration

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use config::{Config, Environment};

use crate::domain::value_objects::ChapterStoryPolicy;

/// Object storage bucket holding uploaded documents
pub const DOCUMENTS_BUCKET: &str = "documents";

/// Application configuration loaded from `STORYEX_*` environment variables
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// SQLite connection URL
    pub database_url: String,
    /// Directory holding the object storage buckets
    pub storage_root: PathBuf,
    /// HTTP server port
    pub server_port: u16,
    /// Simulated processing time of an extraction
    pub extraction_delay: Duration,
    /// Rows per category shown by the saved data viewer
    pub saved_data_limit: i64,
    pub max_upload_bytes: usize,
    /// Decompressed size cap for the body of an uploaded `.docx`
    pub max_document_bytes: u64,
    /// Idle time after which a review session is dropped
    pub review_session_ttl: Duration,
    /// Story used for chapters saved without an explicit story
    pub chapter_story_policy: ChapterStoryPolicy,
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::load(Environment::with_prefix("STORYEX"))
    }

    fn load(environment: Environment) -> Result<Self> {
        let settings = Config::builder()
            .set_default("database_url", "sqlite://storyex.db?mode=rwc")?
            .set_default("storage_root", "./storage")?
            .set_default("server_port", 3000_i64)?
            .set_default("extraction_delay_ms", 2000_i64)?
            .set_default("saved_data_limit", 10_i64)?
            .set_default("max_upload_bytes", 20_i64 * 1024 * 1024)?
            .set_default("max_document_bytes", 50_i64 * 1024 * 1024)?
            .set_default("review_session_ttl_secs", 3600_i64)?
            .set_default("chapter_story_policy", "always_create")?
            .add_source(environment)
            .build()
            .context("Failed to read configuration")?;

        let server_port = settings
            .get_int("server_port")
            .context("STORYEX_SERVER_PORT must be a number")?;
        let extraction_delay_ms = settings
            .get_int("extraction_delay_ms")
            .context("STORYEX_EXTRACTION_DELAY_MS must be a number")?;
        let max_upload_bytes = settings
            .get_int("max_upload_bytes")
            .context("STORYEX_MAX_UPLOAD_BYTES must be a number")?;
        let max_document_bytes = settings
            .get_int("max_document_bytes")
            .context("STORYEX_MAX_DOCUMENT_BYTES must be a number")?;
        let review_session_ttl_secs = settings
            .get_int("review_session_ttl_secs")
            .context("STORYEX_REVIEW_SESSION_TTL_SECS must be a number")?;

        Ok(Self {
            database_url: settings.get_string("database_url")?,
            storage_root: PathBuf::from(settings.get_string("storage_root")?),
            server_port: u16::try_from(server_port)
                .context("STORYEX_SERVER_PORT must be a valid port number")?,
            extraction_delay: Duration::from_millis(
                u64::try_from(extraction_delay_ms)
                    .context("STORYEX_EXTRACTION_DELAY_MS must not be negative")?,
            ),
            saved_data_limit: settings
                .get_int("saved_data_limit")
                .context("STORYEX_SAVED_DATA_LIMIT must be a number")?,
            max_upload_bytes: usize::try_from(max_upload_bytes)
                .context("STORYEX_MAX_UPLOAD_BYTES must not be negative")?,
            max_document_bytes: u64::try_from(max_document_bytes)
                .context("STORYEX_MAX_DOCUMENT_BYTES must not be negative")?,
            review_session_ttl: Duration::from_secs(
                u64::try_from(review_session_ttl_secs)
                    .context("STORYEX_REVIEW_SESSION_TTL_SECS must not be negative")?,
            ),
            chapter_story_policy: settings
                .get_string("chapter_story_policy")?
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid STORYEX_CHAPTER_STORY_POLICY")?,
        })
    }
}
