//! Text rendering of the two screens.
//!
//! Everything here is a pure function of its arguments: the same session
//! state, cache, form and notifications always produce the same output.

use crate::entity::{PendingEdit, Prompt};
use crate::notify::{Notification, NotificationStatus};
use crate::session::SessionState;

/// Everything a screen is drawn from.
#[derive(Debug, Clone, Copy)]
pub struct Screen<'a> {
    pub state: SessionState,
    pub prompts: &'a [Prompt],
    pub pending: &'a PendingEdit,
    pub notifications: &'a [Notification],
}

pub fn render(screen: &Screen<'_>) -> String {
    let mut lines = Vec::new();

    if !screen.notifications.is_empty() {
        lines.extend(notification_lines(screen.notifications));
        lines.push(String::new());
    }

    match screen.state {
        SessionState::AnonymousLogin | SessionState::AnonymousRegister => {
            lines.extend(auth_lines(screen.state))
        }
        SessionState::Authenticated => {
            lines.push("Prompt Management".to_string());
            lines.push(String::new());
            lines.extend(prompt_lines(screen.prompts));
            lines.push(String::new());
            lines.extend(form_lines(screen.pending));
            lines.push(String::new());
            lines.push("[logout] Logout".to_string());
        }
    }

    lines.join("\n")
}

pub fn render_notifications(notifications: &[Notification]) -> String {
    notification_lines(notifications).join("\n")
}

pub fn render_prompt_list(prompts: &[Prompt]) -> String {
    prompt_lines(prompts).join("\n")
}

fn notification_lines(notifications: &[Notification]) -> Vec<String> {
    notifications
        .iter()
        .map(|n| {
            let marker = match n.status {
                NotificationStatus::Success => "[ok]",
                NotificationStatus::Error => "[error]",
            };
            match &n.description {
                Some(description) => format!("{} {}: {}", marker, n.title, description),
                None => format!("{} {}", marker, n.title),
            }
        })
        .collect()
}

fn auth_lines(state: SessionState) -> Vec<String> {
    if state == SessionState::AnonymousRegister {
        vec![
            "Register".to_string(),
            "  Username, Email, Password".to_string(),
            "  > register <username> <email> <password>".to_string(),
            String::new(),
            "Already have an account? Login (type `mode`)".to_string(),
        ]
    } else {
        vec![
            "Login".to_string(),
            "  Username, Password".to_string(),
            "  > login <username> <password>".to_string(),
            String::new(),
            "Don't have an account? Register (type `mode`)".to_string(),
        ]
    }
}

fn prompt_lines(prompts: &[Prompt]) -> Vec<String> {
    if prompts.is_empty() {
        return vec!["  No prompts yet.".to_string()];
    }

    let mut lines = Vec::new();
    for p in prompts {
        lines.push(format!("  [{}] {}", p.id, p.name));
        for text_line in p.text.lines() {
            lines.push(format!("      {}", text_line));
        }
    }
    lines
}

fn form_lines(pending: &PendingEdit) -> Vec<String> {
    let (heading, action) = match &pending.target {
        Some(id) => (format!("Edit Prompt [{}]", id), "Update Prompt"),
        None => ("Create Prompt".to_string(), "Create Prompt"),
    };

    vec![
        heading,
        format!("  Prompt Name: {}", pending.name),
        format!("  Prompt Text: {}", pending.text),
        format!("  [save] {}", action),
    ]
}
