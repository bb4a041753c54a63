//! In-memory prompt cache kept in step with the backend.
//!
//! The cache mirrors the last successful server response. Writes to it happen
//! under a lock once a response has arrived, so overlapping handlers never
//! lose each other's changes. Mutations of the same prompt id are additionally
//! queued behind one another; different ids and creates run concurrently.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::api::ApiClient;
use crate::entity::{PendingEdit, Prompt, PromptId};
use crate::error::{PromptdeskError, Result};
use crate::notify::{titles, Notification, NotificationCenter};

pub struct PromptController {
    api: ApiClient,
    cache: Mutex<Vec<Prompt>>,
    pending: Mutex<PendingEdit>,
    in_flight: Mutex<HashMap<PromptId, Arc<Mutex<()>>>>,
    notifications: NotificationCenter,
}

impl PromptController {
    pub fn new(api: ApiClient, notifications: NotificationCenter) -> Self {
        Self {
            api,
            cache: Mutex::new(Vec::new()),
            pending: Mutex::new(PendingEdit::default()),
            in_flight: Mutex::new(HashMap::new()),
            notifications,
        }
    }

    /// Snapshot of the cache in display order.
    pub async fn prompts(&self) -> Vec<Prompt> {
        self.cache.lock().await.clone()
    }

    pub async fn pending(&self) -> PendingEdit {
        self.pending.lock().await.clone()
    }

    /// Replace the cache with the backend's list. On failure the stale cache
    /// stays and nothing is shown to the user.
    pub async fn refresh(&self, token: &str) -> Result<()> {
        match self.api.list_prompts(token).await {
            Ok(prompts) => {
                tracing::debug!(count = prompts.len(), "prompt cache refreshed");
                *self.cache.lock().await = prompts;
                Ok(())
            }
            Err(e) => {
                tracing::warn!("Failed to fetch prompts: {}", e);
                Err(e)
            }
        }
    }

    pub async fn create(&self, token: &str, name: &str, text: &str) -> Result<Prompt> {
        match self.api.create_prompt(token, name, text).await {
            Ok(prompt) => {
                self.cache.lock().await.push(prompt.clone());
                self.pending.lock().await.reset();
                self.notifications
                    .push(Notification::success(titles::PROMPT_CREATED))
                    .await;
                Ok(prompt)
            }
            Err(e) => {
                tracing::error!("Error creating prompt: {}", e);
                self.notifications
                    .push(Notification::error(titles::PROMPT_CREATE_FAILED, None))
                    .await;
                Err(e)
            }
        }
    }

    /// Replace the entry whose id matches with the backend's version. Other
    /// entries keep their position and content.
    pub async fn update(&self, token: &str, id: &PromptId, name: &str, text: &str) -> Result<Prompt> {
        let lock = self.entity_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply_update(token, id, name, text).await
        };
        self.release_entity_lock(id, lock).await;
        result
    }

    pub async fn delete(&self, token: &str, id: &PromptId) -> Result<()> {
        let lock = self.entity_lock(id).await;
        let result = {
            let _guard = lock.lock().await;
            self.apply_delete(token, id).await
        };
        self.release_entity_lock(id, lock).await;
        result
    }

    async fn apply_update(&self, token: &str, id: &PromptId, name: &str, text: &str) -> Result<Prompt> {
        match self.api.update_prompt(token, id, name, text).await {
            Ok(prompt) => {
                {
                    let mut cache = self.cache.lock().await;
                    if let Some(slot) = cache.iter_mut().find(|p| &p.id == id) {
                        *slot = prompt.clone();
                    }
                }
                self.pending.lock().await.reset();
                self.notifications
                    .push(Notification::success(titles::PROMPT_UPDATED))
                    .await;
                Ok(prompt)
            }
            Err(e) => {
                tracing::error!("Error updating prompt {}: {}", id, e);
                self.notifications
                    .push(Notification::error(titles::PROMPT_UPDATE_FAILED, None))
                    .await;
                Err(e)
            }
        }
    }

    async fn apply_delete(&self, token: &str, id: &PromptId) -> Result<()> {
        match self.api.delete_prompt(token, id).await {
            Ok(()) => {
                self.cache.lock().await.retain(|p| &p.id != id);
                self.notifications
                    .push(Notification::success(titles::PROMPT_DELETED))
                    .await;
                Ok(())
            }
            Err(e) => {
                tracing::error!("Error deleting prompt {}: {}", id, e);
                self.notifications
                    .push(Notification::error(titles::PROMPT_DELETE_FAILED, None))
                    .await;
                Err(e)
            }
        }
    }

    /// Load a cached prompt into the form for editing.
    pub async fn begin_edit(&self, id: &PromptId) -> Result<PendingEdit> {
        let cache = self.cache.lock().await;
        let prompt = cache
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| PromptdeskError::PromptNotFound(id.clone()))?;

        let mut pending = self.pending.lock().await;
        *pending = PendingEdit::editing(prompt);
        Ok(pending.clone())
    }

    pub async fn set_name(&self, name: impl Into<String>) {
        self.pending.lock().await.name = name.into();
    }

    pub async fn set_text(&self, text: impl Into<String>) {
        self.pending.lock().await.text = text.into();
    }

    pub async fn reset_pending(&self) {
        self.pending.lock().await.reset();
    }

    /// Submit the form: update when it targets a prompt, create otherwise.
    pub async fn submit(&self, token: &str) -> Result<Prompt> {
        let pending = self.pending().await;
        match &pending.target {
            Some(id) => self.update(token, id, &pending.name, &pending.text).await,
            None => self.create(token, &pending.name, &pending.text).await,
        }
    }

    /// Drop the cache and any half-filled form.
    pub async fn clear(&self) {
        self.cache.lock().await.clear();
        self.pending.lock().await.reset();
    }

    async fn entity_lock(&self, id: &PromptId) -> Arc<Mutex<()>> {
        let mut locks = self.in_flight.lock().await;
        locks.entry(id.clone()).or_default().clone()
    }

    async fn release_entity_lock(&self, id: &PromptId, lock: Arc<Mutex<()>>) {
        let mut locks = self.in_flight.lock().await;
        // One reference in the map, one held here: nobody else is queued.
        if Arc::strong_count(&lock) <= 2 {
            locks.remove(id);
        }
    }

    #[cfg(test)]
    pub(crate) async fn seed(&self, prompts: Vec<Prompt>) {
        *self.cache.lock().await = prompts;
    }

    #[cfg(test)]
    async fn tracked_locks(&self) -> usize {
        self.in_flight.lock().await.len()
    }
}
