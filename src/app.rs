//! Application state: one session, one prompt cache, one notification queue.
//!
//! `App` owns both controllers and wires the cross-controller steps (a fresh
//! login triggers a prompt fetch, logout drops the cache). Nothing here is
//! global, so several independent `App`s can live in one process.

use chrono::Utc;

use crate::api::ApiClient;
use crate::config::Config;
use crate::entity::{PendingEdit, Prompt, PromptId};
use crate::error::{PromptdeskError, Result};
use crate::notify::{Notification, NotificationCenter};
use crate::prompts::PromptController;
use crate::session::{SessionController, SessionState};
use crate::storage::{FileStore, KeyValueStore, SessionStore};
use crate::view::{self, Screen};

pub struct App {
    session: SessionController,
    prompts: PromptController,
    notifications: NotificationCenter,
    verify_stored_token: bool,
}

impl App {
    pub fn new(api: ApiClient, kv: Box<dyn KeyValueStore>) -> Self {
        let notifications = NotificationCenter::new();
        Self {
            session: SessionController::new(
                api.clone(),
                SessionStore::new(kv),
                notifications.clone(),
            ),
            prompts: PromptController::new(api, notifications.clone()),
            notifications,
            verify_stored_token: false,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let store = match &config.storage_path {
            Some(path) => FileStore::new(path),
            None => FileStore::default_location()?,
        };
        tracing::debug!(api_url = %config.api_url, storage = %store.path().display(), "starting");

        let app = Self::new(ApiClient::new(config.api_url.as_str()), Box::new(store));
        Ok(app.with_token_verification(config.verify_stored_token))
    }

    /// When set, a stored token the backend rejects (401/403) is discarded at
    /// startup instead of leaving an authenticated screen with no prompts.
    pub fn with_token_verification(mut self, verify: bool) -> Self {
        self.verify_stored_token = verify;
        self
    }

    /// Pick up a stored session without contacting the backend.
    pub fn restore(&mut self) -> SessionState {
        self.session.restore();
        self.session.state()
    }

    /// Startup check: restore a stored session and fetch its prompts.
    pub async fn start(&mut self) -> SessionState {
        let Some(token) = self.session.restore() else {
            return self.session.state();
        };

        if let Err(e) = self.prompts.refresh(&token).await {
            let rejected = matches!(e.status(), Some(401) | Some(403));
            if self.verify_stored_token && rejected {
                tracing::info!("Stored token rejected by backend, signing out");
                // Storage failures are already logged; the state is reset regardless.
                let _ = self.session.logout();
                self.prompts.clear().await;
            }
        }

        self.session.state()
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn prompts(&self) -> &PromptController {
        &self.prompts
    }

    pub fn toggle_mode(&mut self) -> Result<SessionState> {
        self.session.toggle_mode()
    }

    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        let token = self.session.submit_login(username, password).await?;
        let _ = self.prompts.refresh(&token).await;
        Ok(())
    }

    pub async fn register(&mut self, username: &str, email: &str, password: &str) -> Result<()> {
        let token = self
            .session
            .submit_register(username, email, password)
            .await?;
        let _ = self.prompts.refresh(&token).await;
        Ok(())
    }

    /// Always ends anonymous with an empty cache.
    pub async fn logout(&mut self) -> Result<()> {
        self.prompts.clear().await;
        self.session.logout()
    }

    /// Re-fetch the list. Failures are logged only.
    pub async fn refresh(&self) -> Result<()> {
        let token = self.token()?;
        let _ = self.prompts.refresh(&token).await;
        Ok(())
    }

    pub async fn begin_edit(&self, id: &PromptId) -> Result<PendingEdit> {
        self.token()?;
        self.prompts.begin_edit(id).await
    }

    /// Start a fresh create form, abandoning any edit in progress.
    pub async fn new_prompt(&self) {
        self.prompts.reset_pending().await;
    }

    pub async fn set_name(&self, name: &str) {
        self.prompts.set_name(name).await;
    }

    pub async fn set_text(&self, text: &str) {
        self.prompts.set_text(text).await;
    }

    pub async fn submit(&self) -> Result<Prompt> {
        let token = self.token()?;
        self.prompts.submit(&token).await
    }

    pub async fn delete(&self, id: &PromptId) -> Result<()> {
        let token = self.token()?;
        self.prompts.delete(&token, id).await
    }

    /// Draw the current screen with the notifications still visible.
    pub async fn render(&self) -> String {
        let prompts = self.prompts.prompts().await;
        let pending = self.prompts.pending().await;
        let notifications = self.notifications.active(Utc::now()).await;
        view::render(&Screen {
            state: self.session.state(),
            prompts: &prompts,
            pending: &pending,
            notifications: &notifications,
        })
    }

    /// Take every notification raised so far.
    pub async fn take_notifications(&self) -> Vec<Notification> {
        self.notifications.drain().await
    }

    fn token(&self) -> Result<String> {
        match (self.session.state(), self.session.token()) {
            (SessionState::Authenticated, Some(token)) => Ok(token.to_string()),
            _ => Err(PromptdeskError::NotAuthenticated),
        }
    }
}
