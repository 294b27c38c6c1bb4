use serde::Serialize;

use crate::application::services::SavedData;
use crate::domain::entities::{Chapter, CharacterProfile, Location, Story};

#[derive(Debug, Serialize)]
pub struct CharacterSummaryDto {
    pub id: String,
    pub full_name: String,
    pub title: Option<String>,
    pub summary_tagline: Option<String>,
}

impl From<CharacterProfile> for CharacterSummaryDto {
    fn from(profile: CharacterProfile) -> Self {
        Self {
            id: profile.id.to_string(),
            full_name: profile.full_name,
            title: profile.title,
            summary_tagline: profile.summary_tagline,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LocationSummaryDto {
    pub id: String,
    pub name: String,
    pub location_type: Option<String>,
    pub summary: Option<String>,
}

impl From<Location> for LocationSummaryDto {
    fn from(location: Location) -> Self {
        Self {
            id: location.id.to_string(),
            name: location.name,
            location_type: location.location_type,
            summary: location.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct StorySummaryDto {
    pub id: String,
    pub title: String,
    pub genre: Option<String>,
    pub summary: Option<String>,
}

impl From<Story> for StorySummaryDto {
    fn from(story: Story) -> Self {
        Self {
            id: story.id.to_string(),
            title: story.title,
            genre: story.genre,
            summary: story.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ChapterSummaryDto {
    pub id: String,
    pub title: String,
    pub chapter_number: i64,
    pub summary: Option<String>,
}

impl From<Chapter> for ChapterSummaryDto {
    fn from(chapter: Chapter) -> Self {
        Self {
            id: chapter.id.to_string(),
            title: chapter.title,
            chapter_number: chapter.chapter_number,
            summary: chapter.summary,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SavedDataDto {
    pub characters: Vec<CharacterSummaryDto>,
    pub locations: Vec<LocationSummaryDto>,
    pub stories: Vec<StorySummaryDto>,
    pub chapters: Vec<ChapterSummaryDto>,
}

impl From<SavedData> for SavedDataDto {
    fn from(data: SavedData) -> Self {
        Self {
            characters: data.characters.into_iter().map(Into::into).collect(),
            locations: data.locations.into_iter().map(Into::into).collect(),
            stories: data.stories.into_iter().map(Into::into).collect(),
            chapters: data.chapters.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct AuthStatusDto {
    pub authenticated: bool,
    pub user_id: Option<String>,
}
