//! Review Service - Holds extracted items while a user reviews them
//!
//! A review session walks the three wizard steps: input, extracting and
//! review. Only one extraction may run per session at a time, and approval
//! only writes items that have not been saved yet. Sessions left idle for
//! longer than the configured time to live are dropped.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info, instrument, warn};

use crate::application::services::extraction_service::{
    validate_request, ExtractionError, ExtractionService, SAMPLE_CONTENT,
};
use crate::application::services::persistence_service::{
    ItemSaveError, PersistenceService, SaveError, SaveOptions, SaveResult, SavedRecord,
};
use crate::domain::entities::{ExtractedItem, FieldEditError};
use crate::domain::value_objects::{ItemType, ReviewSessionId, UserId};

/// Templates selected when a session opens
pub const DEFAULT_TEMPLATES: [ItemType; 3] =
    [ItemType::Character, ItemType::Location, ItemType::Story];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Input,
    Extracting,
    Review,
}

impl WizardStep {
    pub fn number(&self) -> u8 {
        match self {
            WizardStep::Input => 1,
            WizardStep::Extracting => 2,
            WizardStep::Review => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            WizardStep::Input => "input",
            WizardStep::Extracting => "extracting",
            WizardStep::Review => "review",
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub item: ExtractedItem,
    /// Row id once the item has been approved and saved
    pub saved_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewSession {
    pub id: ReviewSessionId,
    pub step: WizardStep,
    pub content: String,
    pub templates: Vec<ItemType>,
    pub items: Vec<ReviewItem>,
    pub created_at: DateTime<Utc>,
    /// Last change made through the service
    pub last_active: DateTime<Utc>,
    approving: bool,
    /// Bumped on reset so a late extraction result is dropped
    generation: u64,
}

impl ReviewSession {
    fn new() -> Self {
        let now = Utc::now();
        Self {
            id: ReviewSessionId::new(),
            step: WizardStep::Input,
            content: SAMPLE_CONTENT.to_string(),
            templates: DEFAULT_TEMPLATES.to_vec(),
            items: Vec::new(),
            created_at: now,
            last_active: now,
            approving: false,
            generation: 0,
        }
    }

    pub fn extracted_items(&self) -> Vec<ExtractedItem> {
        self.items.iter().map(|r| r.item.clone()).collect()
    }

    /// Idle past `ttl` and not in the middle of an extraction or approval
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        if self.approving || self.step == WizardStep::Extracting {
            return false;
        }
        (now - self.last_active)
            .to_std()
            .map(|idle| idle > ttl)
            .unwrap_or(false)
    }
}

/// Look up a session for a change and mark it active
fn active_session(
    sessions: &mut HashMap<ReviewSessionId, ReviewSession>,
    id: ReviewSessionId,
) -> Result<&mut ReviewSession, ReviewError> {
    let session = sessions.get_mut(&id).ok_or(ReviewError::SessionNotFound(id))?;
    session.last_active = Utc::now();
    Ok(session)
}

#[derive(Debug, thiserror::Error)]
pub enum ReviewError {
    #[error("Review session not found: {0}")]
    SessionNotFound(ReviewSessionId),
    #[error("No extracted item at index {0}")]
    ItemNotFound(usize),
    #[error(transparent)]
    Field(#[from] FieldEditError),
    #[error("Item {0} has already been approved and saved")]
    ItemAlreadyApproved(usize),
    #[error("There are no extracted items to approve")]
    NothingToApprove,
    #[error("Approval is already in progress")]
    ApprovalInProgress,
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
    #[error(transparent)]
    Save(#[from] SaveError),
}

#[derive(Debug, Clone, Serialize)]
pub struct ApprovalOutcome {
    #[serde(flatten)]
    pub result: SaveResult,
    /// Items skipped because an earlier approval saved them
    pub already_saved: usize,
    pub summary: String,
}

/// `{n} items approved ...` followed by one `• {type}: {label}` line per item
pub fn approval_summary(items: &[ExtractedItem]) -> String {
    let lines: Vec<String> = items
        .iter()
        .map(|item| format!("• {}: {}", item.item_type, item.label()))
        .collect();
    format!(
        "{} items approved and saved to respective categories:\n\n{}",
        items.len(),
        lines.join("\n")
    )
}

pub struct ReviewService {
    sessions: RwLock<HashMap<ReviewSessionId, ReviewSession>>,
    extraction: Arc<ExtractionService>,
    persistence: Arc<dyn PersistenceService>,
    session_ttl: Duration,
}

impl ReviewService {
    pub fn new(
        extraction: Arc<ExtractionService>,
        persistence: Arc<dyn PersistenceService>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            extraction,
            persistence,
            session_ttl,
        }
    }

    /// Open a new session, dropping any that have expired
    pub async fn open(&self) -> ReviewSession {
        let session = ReviewSession::new();
        let mut sessions = self.sessions.write().await;
        let evicted = Self::evict_expired(&mut sessions, self.session_ttl);
        if evicted > 0 {
            debug!(evicted, "Dropped expired review sessions");
        }
        sessions.insert(session.id, session.clone());
        info!(session_id = %session.id, "Opened review session");
        session
    }

    fn evict_expired(
        sessions: &mut HashMap<ReviewSessionId, ReviewSession>,
        ttl: Duration,
    ) -> usize {
        let now = Utc::now();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired(now, ttl));
        before - sessions.len()
    }

    pub async fn get(&self, id: ReviewSessionId) -> Result<ReviewSession, ReviewError> {
        self.sessions
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or(ReviewError::SessionNotFound(id))
    }

    pub async fn close(&self, id: ReviewSessionId) -> Result<(), ReviewError> {
        if self.sessions.write().await.remove(&id).is_none() {
            return Err(ReviewError::SessionNotFound(id));
        }
        debug!(session_id = %id, "Closed review session");
        Ok(())
    }

    /// Replace the input text and/or template selection
    pub async fn update_input(
        &self,
        id: ReviewSessionId,
        content: Option<String>,
        templates: Option<Vec<ItemType>>,
    ) -> Result<ReviewSession, ReviewError> {
        let mut sessions = self.sessions.write().await;
        let session = active_session(&mut sessions, id)?;
        if session.step == WizardStep::Extracting {
            return Err(ExtractionError::ExtractionInProgress.into());
        }
        if let Some(content) = content {
            session.content = content;
        }
        if let Some(templates) = templates {
            session.templates = templates;
        }
        Ok(session.clone())
    }

    /// Validate, lock the session, wait out the delay and store the results
    #[instrument(skip(self), fields(session_id = %id))]
    pub async fn extract(&self, id: ReviewSessionId) -> Result<ReviewSession, ReviewError> {
        let (content, templates, generation) = {
            let mut sessions = self.sessions.write().await;
            let session = active_session(&mut sessions, id)?;
            if session.step == WizardStep::Extracting {
                return Err(ExtractionError::ExtractionInProgress.into());
            }
            validate_request(&session.content, &session.templates)?;
            session.step = WizardStep::Extracting;
            (session.content.clone(), session.templates.clone(), session.generation)
        };

        let extracted = self.extraction.extract(&content, &templates).await;

        let mut sessions = self.sessions.write().await;
        let session = active_session(&mut sessions, id)?;
        if session.generation != generation {
            debug!("Session was reset during extraction; discarding results");
            return Ok(session.clone());
        }

        let items = match extracted {
            Ok(items) => items,
            Err(e) => {
                session.step = WizardStep::Input;
                return Err(e.into());
            }
        };

        for item in &items {
            let drift = item.flag_drift();
            if !drift.is_empty() {
                warn!(item_type = %item.item_type, fields = ?drift, "Flags name fields absent from data");
            }
        }

        session.items = items
            .into_iter()
            .map(|item| ReviewItem {
                item,
                saved_id: None,
            })
            .collect();
        session.step = WizardStep::Review;
        info!(count = session.items.len(), "Extraction complete");
        Ok(session.clone())
    }

    /// Replace one field of an unsaved item
    ///
    /// Refused while an approval is saving, since the saved row would no
    /// longer match the item.
    pub async fn edit_field(
        &self,
        id: ReviewSessionId,
        index: usize,
        field: &str,
        value: Value,
    ) -> Result<ExtractedItem, ReviewError> {
        let mut sessions = self.sessions.write().await;
        let session = active_session(&mut sessions, id)?;
        if session.approving {
            return Err(ReviewError::ApprovalInProgress);
        }
        let entry = session
            .items
            .get_mut(index)
            .ok_or(ReviewError::ItemNotFound(index))?;
        if entry.saved_id.is_some() {
            return Err(ReviewError::ItemAlreadyApproved(index));
        }
        entry.item.edit_field(field, value)?;
        debug!(session_id = %id, index, field, "Edited field");
        Ok(entry.item.clone())
    }

    /// Save every item that has not been saved by an earlier approval
    #[instrument(skip(self, options), fields(session_id = %id))]
    pub async fn approve_all(
        &self,
        id: ReviewSessionId,
        user_id: Option<UserId>,
        options: SaveOptions,
    ) -> Result<ApprovalOutcome, ReviewError> {
        let (user_id, pending, already_saved, generation) = {
            let mut sessions = self.sessions.write().await;
            let session = active_session(&mut sessions, id)?;
            if session.items.is_empty() {
                return Err(ReviewError::NothingToApprove);
            }
            if session.approving {
                return Err(ReviewError::ApprovalInProgress);
            }
            let user_id = user_id.ok_or(SaveError::NotAuthenticated)?;
            session.approving = true;

            let pending: Vec<(usize, ExtractedItem)> = session
                .items
                .iter()
                .enumerate()
                .filter(|(_, r)| r.saved_id.is_none())
                .map(|(index, r)| (index, r.item.clone()))
                .collect();
            let already_saved = session.items.len() - pending.len();
            (user_id, pending, already_saved, session.generation)
        };

        let mut saved = Vec::new();
        let mut errors: Vec<ItemSaveError> = Vec::new();
        for (index, item) in &pending {
            match self.persistence.save_item(user_id, item, options).await {
                Ok(row_id) => saved.push(SavedRecord {
                    index: *index,
                    item_type: item.item_type,
                    id: row_id,
                }),
                Err(e) => errors.push(e),
            }
        }

        let summary = {
            let mut sessions = self.sessions.write().await;
            match sessions.get_mut(&id) {
                Some(session) => {
                    session.approving = false;
                    if session.generation == generation {
                        for record in &saved {
                            if let Some(entry) = session.items.get_mut(record.index) {
                                entry.saved_id = Some(record.id.clone());
                            }
                        }
                    }
                    approval_summary(&session.extracted_items())
                }
                None => {
                    let items: Vec<ExtractedItem> = pending.into_iter().map(|(_, item)| item).collect();
                    approval_summary(&items)
                }
            }
        };

        if !errors.is_empty() {
            let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
            warn!(errors = ?details, "Some items failed to save during approval");
        }
        info!(saved = saved.len(), failed = errors.len(), already_saved, "Approved items");

        Ok(ApprovalOutcome {
            result: SaveResult::from_outcomes(saved, errors),
            already_saved,
            summary,
        })
    }

    /// Items exactly as held, in extraction order
    pub async fn export_items(&self, id: ReviewSessionId) -> Result<Vec<ExtractedItem>, ReviewError> {
        Ok(self.get(id).await?.extracted_items())
    }

    /// Clear items, restore the sample text and return to step 1
    pub async fn reset(&self, id: ReviewSessionId) -> Result<ReviewSession, ReviewError> {
        let mut sessions = self.sessions.write().await;
        let session = active_session(&mut sessions, id)?;
        session.items.clear();
        session.content = SAMPLE_CONTENT.to_string();
        session.step = WizardStep::Input;
        session.generation += 1;
        debug!(session_id = %id, "Reset review session");
        Ok(session.clone())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use serde_json::json;

    use super::*;
    use crate::application::services::persistence_service::PersistenceServiceImpl;
    use crate::application::services::test_support::{repositories, InMemoryRepository};
    use crate::domain::value_objects::ChapterStoryPolicy;

    const TTL: Duration = Duration::from_secs(3600);

    fn service_with_delay(repo: &Arc<InMemoryRepository>, delay: Duration) -> Arc<ReviewService> {
        let persistence = Arc::new(PersistenceServiceImpl::new(
            repositories(repo),
            ChapterStoryPolicy::AlwaysCreate,
        ));
        Arc::new(ReviewService::new(
            Arc::new(ExtractionService::new(delay)),
            persistence,
            TTL,
        ))
    }

    /// Persistence that takes a while per item
    struct SlowPersistence {
        per_item: Duration,
    }

    #[async_trait::async_trait]
    impl PersistenceService for SlowPersistence {
        async fn save_items(
            &self,
            user_id: Option<UserId>,
            items: &[ExtractedItem],
            options: SaveOptions,
        ) -> Result<SaveResult, SaveError> {
            let user_id = user_id.ok_or(SaveError::NotAuthenticated)?;
            let mut saved = Vec::new();
            for (index, item) in items.iter().enumerate() {
                if let Ok(id) = self.save_item(user_id, item, options).await {
                    saved.push(SavedRecord {
                        index,
                        item_type: item.item_type,
                        id,
                    });
                }
            }
            Ok(SaveResult::from_outcomes(saved, Vec::new()))
        }

        async fn save_item(
            &self,
            _user_id: UserId,
            item: &ExtractedItem,
            _options: SaveOptions,
        ) -> Result<String, ItemSaveError> {
            tokio::time::sleep(self.per_item).await;
            Ok(format!("row-for-{}", item.label()))
        }
    }

    fn service(repo: &Arc<InMemoryRepository>) -> Arc<ReviewService> {
        service_with_delay(repo, Duration::ZERO)
    }

    #[tokio::test]
    async fn test_new_session_defaults() {
        let repo = Arc::new(InMemoryRepository::default());
        let session = service(&repo).open().await;
        assert_eq!(session.step, WizardStep::Input);
        assert_eq!(session.content, SAMPLE_CONTENT);
        assert_eq!(session.templates, DEFAULT_TEMPLATES.to_vec());
        assert!(session.items.is_empty());
    }

    #[tokio::test]
    async fn test_extract_moves_to_review() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;

        let session = service.extract(id).await.unwrap();
        assert_eq!(session.step, WizardStep::Review);
        // Default templates: two characters, two locations, one story
        assert_eq!(session.items.len(), 5);
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_state_untouched() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;
        service
            .update_input(id, Some("   ".to_string()), None)
            .await
            .unwrap();

        let err = service.extract(id).await.unwrap_err();
        assert!(matches!(err, ReviewError::Extraction(ExtractionError::EmptyContent)));
        assert_eq!(service.get(id).await.unwrap().step, WizardStep::Input);

        service
            .update_input(id, Some(SAMPLE_CONTENT.to_string()), Some(vec![]))
            .await
            .unwrap();
        let err = service.extract(id).await.unwrap_err();
        assert!(matches!(
            err,
            ReviewError::Extraction(ExtractionError::NoTemplatesSelected)
        ));
    }

    #[tokio::test]
    async fn test_concurrent_extraction_is_rejected() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service_with_delay(&repo, Duration::from_millis(200));
        let id = service.open().await.id;

        let first = {
            let service = service.clone();
            tokio::spawn(async move { service.extract(id).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        let second = service.extract(id).await;
        assert!(matches!(
            second,
            Err(ReviewError::Extraction(ExtractionError::ExtractionInProgress))
        ));
        assert_eq!(service.get(id).await.unwrap().step, WizardStep::Extracting);

        let first = first.await.unwrap().unwrap();
        assert_eq!(first.step, WizardStep::Review);
    }

    #[tokio::test]
    async fn test_reset_during_extraction_discards_results() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service_with_delay(&repo, Duration::from_millis(200));
        let id = service.open().await.id;

        let pending = {
            let service = service.clone();
            tokio::spawn(async move { service.extract(id).await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;
        service.reset(id).await.unwrap();

        let session = pending.await.unwrap().unwrap();
        assert_eq!(session.step, WizardStep::Input);
        assert!(session.items.is_empty());
    }

    #[tokio::test]
    async fn test_edit_field_updates_value_and_flags() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;
        service.extract(id).await.unwrap();

        let item = service
            .edit_field(id, 1, "age", json!("29"))
            .await
            .unwrap();
        assert_eq!(item.data["age"], json!("29"));
        assert!(item.missing_fields.is_empty());

        let err = service
            .edit_field(id, 0, "abilities", json!("none"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Field(FieldEditError::KindMismatch { .. })));

        let err = service.edit_field(id, 42, "age", json!("1")).await.unwrap_err();
        assert!(matches!(err, ReviewError::ItemNotFound(42)));
    }

    #[tokio::test]
    async fn test_approve_requires_user_and_items() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;

        let err = service
            .approve_all(id, Some(UserId::new()), SaveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::NothingToApprove));

        service.extract(id).await.unwrap();
        let err = service
            .approve_all(id, None, SaveOptions::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::Save(SaveError::NotAuthenticated)));

        // A rejected approval must not leave the session locked
        service
            .approve_all(id, Some(UserId::new()), SaveOptions::default())
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_approve_is_idempotent() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;
        service.extract(id).await.unwrap();
        let user = UserId::new();

        let first = service
            .approve_all(id, Some(user), SaveOptions::default())
            .await
            .unwrap();
        assert_eq!(first.result.message, "Successfully saved 5 items");
        assert!(first
            .summary
            .starts_with("5 items approved and saved to respective categories:\n\n• character: Elias Hart"));
        assert!(first.summary.ends_with("• story: The Awakening Chronicle"));

        let second = service
            .approve_all(id, Some(user), SaveOptions::default())
            .await
            .unwrap();
        assert_eq!(second.result.message, "Successfully saved 0 items");
        assert_eq!(second.already_saved, 5);
        assert_eq!(repo.characters.lock().unwrap().len(), 2);

        let err = service.edit_field(id, 0, "title", json!("Dr")).await.unwrap_err();
        assert!(matches!(err, ReviewError::ItemAlreadyApproved(0)));
    }

    #[tokio::test]
    async fn test_failed_items_are_retried_on_next_approval() {
        let repo = Arc::new(InMemoryRepository::failing_locations());
        let service = service(&repo);
        let id = service.open().await.id;
        service.extract(id).await.unwrap();

        let outcome = service
            .approve_all(id, Some(UserId::new()), SaveOptions::default())
            .await
            .unwrap();
        assert_eq!(outcome.result.message, "Successfully saved 3 items, 2 failed");

        let session = service.get(id).await.unwrap();
        let unsaved: Vec<usize> = session
            .items
            .iter()
            .enumerate()
            .filter(|(_, r)| r.saved_id.is_none())
            .map(|(i, _)| i)
            .collect();
        assert_eq!(unsaved, vec![2, 3]);
    }

    #[tokio::test]
    async fn test_edit_is_refused_while_approval_is_saving() {
        let service = Arc::new(ReviewService::new(
            Arc::new(ExtractionService::new(Duration::ZERO)),
            Arc::new(SlowPersistence {
                per_item: Duration::from_millis(100),
            }),
            TTL,
        ));
        let id = service.open().await.id;
        service.extract(id).await.unwrap();

        let approval = {
            let service = service.clone();
            tokio::spawn(async move {
                service
                    .approve_all(id, Some(UserId::new()), SaveOptions::default())
                    .await
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        let err = service
            .edit_field(id, 1, "age", json!("99"))
            .await
            .unwrap_err();
        assert!(matches!(err, ReviewError::ApprovalInProgress));

        let outcome = approval.await.unwrap().unwrap();
        assert_eq!(outcome.result.message, "Successfully saved 5 items");
        let session = service.get(id).await.unwrap();
        assert_ne!(session.items[1].item.data["age"], json!("99"));
        assert!(session.items.iter().all(|r| r.saved_id.is_some()));
    }

    #[tokio::test]
    async fn test_idle_sessions_expire_on_next_open() {
        let repo = Arc::new(InMemoryRepository::default());
        let persistence = Arc::new(PersistenceServiceImpl::new(
            repositories(&repo),
            ChapterStoryPolicy::AlwaysCreate,
        ));
        let service = ReviewService::new(
            Arc::new(ExtractionService::new(Duration::ZERO)),
            persistence,
            Duration::from_millis(200),
        );

        let idle = service.open().await.id;
        let busy = service.open().await.id;
        tokio::time::sleep(Duration::from_millis(120)).await;
        service.update_input(busy, None, None).await.unwrap();
        tokio::time::sleep(Duration::from_millis(120)).await;

        let fresh = service.open().await.id;
        assert!(matches!(
            service.get(idle).await,
            Err(ReviewError::SessionNotFound(_))
        ));
        assert!(service.get(busy).await.is_ok());
        assert!(service.get(fresh).await.is_ok());
    }

    #[tokio::test]
    async fn test_reset_restores_sample_and_keeps_templates() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;
        service
            .update_input(id, Some("Elias Hart".to_string()), Some(vec![ItemType::Chapter]))
            .await
            .unwrap();
        service.extract(id).await.unwrap();

        let session = service.reset(id).await.unwrap();
        assert_eq!(session.step, WizardStep::Input);
        assert_eq!(session.content, SAMPLE_CONTENT);
        assert_eq!(session.templates, vec![ItemType::Chapter]);
        assert!(service.export_items(id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_closed_session_is_gone() {
        let repo = Arc::new(InMemoryRepository::default());
        let service = service(&repo);
        let id = service.open().await.id;
        service.close(id).await.unwrap();
        assert!(matches!(
            service.get(id).await,
            Err(ReviewError::SessionNotFound(_))
        ));
    }
}
