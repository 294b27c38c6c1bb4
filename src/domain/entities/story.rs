//! Story entity - the parent record chapters belong to

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::domain::value_objects::{StoryId, UserId, PLACEHOLDER_STORY_TITLE};

pub const DRAFT_STATUS: &str = "draft";

/// A row of `stories`
#[derive(Debug, Clone, PartialEq)]
pub struct Story {
    pub id: StoryId,
    pub user_id: UserId,
    pub title: String,
    pub summary: Option<String>,
    pub genre: Option<String>,
    pub status: String,
    pub word_count: Option<i64>,
    pub themes: Option<Vec<String>>,
    /// Holds the extracted main characters
    pub tags: Option<Vec<String>>,
    pub notes: Option<String>,
    /// `{ "world_rules": {...} }`
    pub structure: Option<Value>,
    pub created_at: DateTime<Utc>,
}

impl Story {
    pub fn new(user_id: UserId, title: impl Into<String>) -> Self {
        Self {
            id: StoryId::new(),
            user_id,
            title: title.into(),
            summary: None,
            genre: None,
            status: DRAFT_STATUS.to_string(),
            word_count: None,
            themes: None,
            tags: None,
            notes: None,
            structure: None,
            created_at: Utc::now(),
        }
    }

    /// An auto-created parent satisfying a chapter's required story reference
    pub fn placeholder(user_id: UserId, summary: impl Into<String>) -> Self {
        let mut story = Self::new(user_id, PLACEHOLDER_STORY_TITLE);
        story.summary = Some(summary.into());
        story
    }

    pub fn is_placeholder(&self) -> bool {
        self.title == PLACEHOLDER_STORY_TITLE && self.status == DRAFT_STATUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_placeholder_story_defaults() {
        let story = Story::placeholder(UserId::new(), "Story extracted from content");
        assert_eq!(story.title, "Untitled Story");
        assert_eq!(story.status, "draft");
        assert_eq!(story.summary.as_deref(), Some("Story extracted from content"));
        assert!(story.word_count.is_none());
        assert!(story.is_placeholder());
    }
}
