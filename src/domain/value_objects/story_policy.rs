//! How a chapter without an explicit story reference gets its parent story

use serde::{Deserialize, Serialize};

/// Title given to auto-created parent stories
pub const PLACEHOLDER_STORY_TITLE: &str = "Untitled Story";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStoryPolicy {
    /// Every chapter saved without a story id gets a brand-new placeholder story
    #[default]
    AlwaysCreate,
    /// Reuse the caller's existing placeholder story, creating it only once
    FindOrCreate,
}

impl std::str::FromStr for ChapterStoryPolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_lowercase().as_str() {
            "always_create" => Ok(ChapterStoryPolicy::AlwaysCreate),
            "find_or_create" => Ok(ChapterStoryPolicy::FindOrCreate),
            other => Err(format!("Unknown chapter story policy: {}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_policy_parsing() {
        assert_eq!("always_create".parse::<ChapterStoryPolicy>(), Ok(ChapterStoryPolicy::AlwaysCreate));
        assert_eq!(" FIND_OR_CREATE ".parse::<ChapterStoryPolicy>(), Ok(ChapterStoryPolicy::FindOrCreate));
        assert!("sometimes".parse::<ChapterStoryPolicy>().is_err());
    }
}
