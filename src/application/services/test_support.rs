//! In-memory port implementations for service tests

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::application::ports::outbound::{
    ChapterRepositoryPort, CharacterRepositoryPort, LocationRepositoryPort, ObjectStoragePort,
    Repositories, RepositoryError, StorageError, StoryRepositoryPort,
};
use crate::domain::entities::{Chapter, CharacterProfile, CharacterRecord, Location, Story};
use crate::domain::value_objects::{ChapterId, CharacterProfileId, LocationId, StoryId, UserId};

#[derive(Default)]
pub struct InMemoryRepository {
    pub characters: Mutex<Vec<CharacterRecord>>,
    pub locations: Mutex<Vec<Location>>,
    pub stories: Mutex<Vec<Story>>,
    pub chapters: Mutex<Vec<Chapter>>,
    /// Make every location insert fail
    pub fail_locations: bool,
    /// Yield to the scheduler after a placeholder lookup
    pub yield_on_lookup: bool,
}

impl InMemoryRepository {
    pub fn failing_locations() -> Self {
        Self {
            fail_locations: true,
            ..Default::default()
        }
    }

    pub fn yielding_lookups() -> Self {
        Self {
            yield_on_lookup: true,
            ..Default::default()
        }
    }

    pub fn story_count(&self) -> usize {
        self.stories.lock().unwrap().len()
    }

    pub fn chapter_count(&self) -> usize {
        self.chapters.lock().unwrap().len()
    }
}

pub fn repositories(repo: &Arc<InMemoryRepository>) -> Repositories {
    Repositories {
        characters: repo.clone(),
        locations: repo.clone(),
        stories: repo.clone(),
        chapters: repo.clone(),
    }
}

#[async_trait]
impl CharacterRepositoryPort for InMemoryRepository {
    async fn create(&self, record: &CharacterRecord) -> Result<CharacterProfileId, RepositoryError> {
        self.characters.lock().unwrap().push(record.clone());
        Ok(record.profile.id)
    }

    async fn list_for_user(
        &self,
        user_id: UserId,
        limit: i64,
    ) -> Result<Vec<CharacterProfile>, RepositoryError> {
        Ok(self
            .characters
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.profile.user_id == user_id)
            .take(limit as usize)
            .map(|r| r.profile.clone())
            .collect())
    }
}

#[async_trait]
impl LocationRepositoryPort for InMemoryRepository {
    async fn create(&self, location: &Location) -> Result<LocationId, RepositoryError> {
        if self.fail_locations {
            return Err(RepositoryError::Database("locations table is read-only".to_string()));
        }
        self.locations.lock().unwrap().push(location.clone());
        Ok(location.id)
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Location>, RepositoryError> {
        Ok(self
            .locations
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl StoryRepositoryPort for InMemoryRepository {
    async fn create(&self, story: &Story) -> Result<StoryId, RepositoryError> {
        self.stories.lock().unwrap().push(story.clone());
        Ok(story.id)
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        story_id: StoryId,
    ) -> Result<Option<Story>, RepositoryError> {
        Ok(self
            .stories
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.id == story_id && s.user_id == user_id)
            .cloned())
    }

    async fn find_placeholder(&self, user_id: UserId) -> Result<Option<Story>, RepositoryError> {
        let found = self
            .stories
            .lock()
            .unwrap()
            .iter()
            .find(|s| s.user_id == user_id && s.is_placeholder())
            .cloned();
        if self.yield_on_lookup {
            tokio::task::yield_now().await;
        }
        Ok(found)
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Story>, RepositoryError> {
        Ok(self
            .stories
            .lock()
            .unwrap()
            .iter()
            .filter(|s| s.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl ChapterRepositoryPort for InMemoryRepository {
    async fn create(&self, chapter: &Chapter) -> Result<ChapterId, RepositoryError> {
        let story_exists = self
            .stories
            .lock()
            .unwrap()
            .iter()
            .any(|s| s.id == chapter.story_id);
        if !story_exists {
            return Err(RepositoryError::Database(
                "FOREIGN KEY constraint failed".to_string(),
            ));
        }
        self.chapters.lock().unwrap().push(chapter.clone());
        Ok(chapter.id)
    }

    async fn list_for_user(&self, user_id: UserId, limit: i64) -> Result<Vec<Chapter>, RepositoryError> {
        Ok(self
            .chapters
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.user_id == user_id)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
pub struct InMemoryStorage {
    pub objects: Mutex<HashMap<String, Vec<u8>>>,
    /// Make every download fail
    pub fail_downloads: bool,
}

#[async_trait]
impl ObjectStoragePort for InMemoryStorage {
    async fn upload(&self, key: &str, bytes: &[u8]) -> Result<String, StorageError> {
        let mut objects = self.objects.lock().unwrap();
        if objects.contains_key(key) {
            return Err(StorageError::AlreadyExists(key.to_string()));
        }
        objects.insert(key.to_string(), bytes.to_vec());
        Ok(key.to_string())
    }

    async fn download(&self, key: &str) -> Result<Vec<u8>, StorageError> {
        if self.fail_downloads {
            return Err(StorageError::Io("connection reset".to_string()));
        }
        self.objects
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }

    async fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.objects
            .lock()
            .unwrap()
            .remove(key)
            .map(|_| ())
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}
