//! Chapter entity - belongs to exactly one story

use chrono::{DateTime, Utc};

use crate::domain::entities::story::DRAFT_STATUS;
use crate::domain::value_objects::{ChapterId, StoryId, UserId};

/// A row of `chapters`
///
/// `content_plain` and `content_xml` carry the same text in parallel forms.
#[derive(Debug, Clone, PartialEq)]
pub struct Chapter {
    pub id: ChapterId,
    pub story_id: StoryId,
    pub user_id: UserId,
    pub title: String,
    pub chapter_number: i64,
    pub content_plain: Option<String>,
    pub content_xml: Option<String>,
    pub summary: Option<String>,
    pub word_count: i64,
    pub status: String,
    pub pov_character: Option<String>,
    /// Comma-joined location names
    pub location: Option<String>,
    pub tone: Option<String>,
    pub narrative_purpose: Option<String>,
    pub plot_triggers: Option<Vec<String>>,
    pub linked_characters: Option<Vec<String>>,
    pub linked_locations: Option<Vec<String>>,
    pub themes: Option<Vec<String>>,
    pub created_at: DateTime<Utc>,
}

impl Chapter {
    pub fn new(story_id: StoryId, user_id: UserId, title: impl Into<String>, chapter_number: i64) -> Self {
        Self {
            id: ChapterId::new(),
            story_id,
            user_id,
            title: title.into(),
            chapter_number,
            content_plain: None,
            content_xml: None,
            summary: None,
            word_count: 0,
            status: DRAFT_STATUS.to_string(),
            pov_character: None,
            location: None,
            tone: None,
            narrative_purpose: None,
            plot_triggers: None,
            linked_characters: None,
            linked_locations: None,
            themes: None,
            created_at: Utc::now(),
        }
    }
}
