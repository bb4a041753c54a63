//! Authentication state machine.
//!
//! ```text
//! AnonymousLogin  <-- toggle_mode -->  AnonymousRegister
//!       |                                    |
//!   submit_login                      submit_register
//!       v                                    v
//!       +----------> Authenticated <---------+
//!                         |
//!                       logout ----> AnonymousLogin
//! ```

use std::fmt;

use crate::api::ApiClient;
use crate::error::{PromptdeskError, Result};
use crate::notify::{titles, Notification, NotificationCenter};
use crate::storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    AnonymousLogin,
    AnonymousRegister,
    Authenticated,
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionState::AnonymousLogin => write!(f, "login"),
            SessionState::AnonymousRegister => write!(f, "register"),
            SessionState::Authenticated => write!(f, "authenticated"),
        }
    }
}

/// The one session of this running instance.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<String>,
}

pub struct SessionController {
    api: ApiClient,
    store: SessionStore,
    state: SessionState,
    session: Session,
    notifications: NotificationCenter,
}

impl SessionController {
    pub fn new(api: ApiClient, store: SessionStore, notifications: NotificationCenter) -> Self {
        Self {
            api,
            store,
            state: SessionState::AnonymousLogin,
            session: Session::default(),
            notifications,
        }
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn token(&self) -> Option<&str> {
        self.session.token.as_deref()
    }

    /// Startup check. A stored token is trusted without asking the backend;
    /// returns it so the caller can trigger the first prompt fetch.
    pub fn restore(&mut self) -> Option<String> {
        let token = match self.store.load() {
            Ok(token) => token?,
            Err(e) => {
                tracing::warn!("Could not read stored session: {}", e);
                return None;
            }
        };

        tracing::debug!("restored session from storage");
        self.session.token = Some(token.clone());
        self.state = SessionState::Authenticated;
        Some(token)
    }

    /// Switch between the login and registration forms.
    pub fn toggle_mode(&mut self) -> Result<SessionState> {
        self.state = match self.state {
            SessionState::AnonymousLogin => SessionState::AnonymousRegister,
            SessionState::AnonymousRegister => SessionState::AnonymousLogin,
            SessionState::Authenticated => {
                return Err(PromptdeskError::InvalidState {
                    action: "switch forms",
                    state: self.state.to_string(),
                })
            }
        };
        Ok(self.state)
    }

    pub async fn submit_login(&mut self, username: &str, password: &str) -> Result<String> {
        self.require(SessionState::AnonymousLogin, "log in")?;

        match self.api.login(username, password).await {
            Ok(token) => {
                self.enter_authenticated(&token);
                self.notifications
                    .push(Notification::success(titles::LOGIN_SUCCESS))
                    .await;
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Login error: {}", e);
                self.notifications
                    .push(Notification::error(
                        titles::LOGIN_FAILED,
                        Some(titles::LOGIN_FAILED_DETAIL),
                    ))
                    .await;
                Err(e)
            }
        }
    }

    pub async fn submit_register(
        &mut self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<String> {
        self.require(SessionState::AnonymousRegister, "register")?;

        match self.api.register(username, email, password).await {
            Ok(token) => {
                self.enter_authenticated(&token);
                self.notifications
                    .push(Notification::success(titles::REGISTER_SUCCESS))
                    .await;
                Ok(token)
            }
            Err(e) => {
                tracing::error!("Registration error: {}", e);
                self.notifications
                    .push(Notification::error(
                        titles::REGISTER_FAILED,
                        Some(titles::REGISTER_FAILED_DETAIL),
                    ))
                    .await;
                Err(e)
            }
        }
    }

    /// Forget the token locally. No revocation call is made; the state
    /// always ends at `AnonymousLogin` even if clearing storage fails.
    pub fn logout(&mut self) -> Result<()> {
        self.session.token = None;
        self.state = SessionState::AnonymousLogin;
        if let Err(e) = self.store.clear() {
            tracing::error!("Failed to clear stored session: {}", e);
            return Err(e);
        }
        Ok(())
    }

    fn enter_authenticated(&mut self, token: &str) {
        if let Err(e) = self.store.save(token) {
            tracing::warn!("Session will not survive a restart: {}", e);
        }
        self.session.token = Some(token.to_string());
        self.state = SessionState::Authenticated;
    }

    fn require(&self, expected: SessionState, action: &'static str) -> Result<()> {
        if self.state == expected {
            return Ok(());
        }
        if self.state == SessionState::Authenticated {
            return Err(PromptdeskError::AlreadyAuthenticated);
        }
        Err(PromptdeskError::InvalidState {
            action,
            state: self.state.to_string(),
        })
    }
}
