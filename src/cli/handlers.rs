use std::io::{self, BufRead, Read};

use dialoguer::Password;

use crate::app::App;
use crate::entity::{Prompt, PromptId};
use crate::error::{PromptdeskError, Result};
use crate::notify::{Notification, NotificationStatus};
use crate::session::SessionState;
use crate::view;

/// Errors the user has already been told about through a notification.
pub fn already_notified(error: &PromptdeskError) -> bool {
    matches!(
        error,
        PromptdeskError::Auth { .. }
            | PromptdeskError::Fetch { .. }
            | PromptdeskError::Mutation { .. }
            | PromptdeskError::Transport(_)
            | PromptdeskError::Json(_)
    )
}

/// Success notifications go to stdout, failures to stderr.
async fn flush_notifications(app: &App) {
    let notifications: Vec<Notification> = app.take_notifications().await;
    for n in &notifications {
        let line = view::render_notifications(std::slice::from_ref(n));
        match n.status {
            NotificationStatus::Success => println!("{}", line),
            NotificationStatus::Error => eprintln!("{}", line),
        }
    }
}

fn read_password(password: Option<String>) -> Result<String> {
    if let Some(password) = password {
        return Ok(password);
    }

    if atty::is(atty::Stream::Stdin) {
        return Ok(Password::new().with_prompt("Password").interact()?);
    }

    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

fn read_stdin() -> Result<String> {
    let mut content = String::new();
    io::stdin().read_to_string(&mut content)?;
    Ok(content)
}

fn print_prompt(prompt: &Prompt, verb: &str, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(prompt)?);
    } else {
        println!("{} prompt [{}] - {}", verb, prompt.id, prompt.name);
    }
    Ok(())
}

pub async fn handle_login(app: &mut App, username: String, password: Option<String>) -> Result<()> {
    if app.state() == SessionState::Authenticated {
        return Err(PromptdeskError::AlreadyAuthenticated);
    }
    let password = read_password(password)?;

    let result = app.login(&username, &password).await;
    flush_notifications(app).await;
    result?;

    println!("{} prompt(s) available.", app.prompts().prompts().await.len());
    Ok(())
}

pub async fn handle_register(
    app: &mut App,
    username: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    if app.state() == SessionState::Authenticated {
        return Err(PromptdeskError::AlreadyAuthenticated);
    }
    let password = read_password(password)?;

    app.toggle_mode()?;
    let result = app.register(&username, &email, &password).await;
    flush_notifications(app).await;
    result
}

pub async fn handle_logout(app: &mut App) -> Result<()> {
    let was_authenticated = app.state() == SessionState::Authenticated;
    app.logout().await?;

    if was_authenticated {
        println!("Logged out.");
    } else {
        println!("Not logged in.");
    }
    Ok(())
}

pub async fn handle_list(app: &App, json: bool) -> Result<()> {
    if app.state() != SessionState::Authenticated {
        return Err(PromptdeskError::NotAuthenticated);
    }

    // The startup check already fetched the list; a failed fetch only logs.
    let prompts = app.prompts().prompts().await;
    if json {
        println!("{}", serde_json::to_string_pretty(&prompts)?);
    } else if prompts.is_empty() {
        println!("No prompts found.");
    } else {
        println!("Prompts:\n");
        println!("{}", view::render_prompt_list(&prompts));
    }
    Ok(())
}

pub async fn handle_create(
    app: &App,
    name: String,
    text: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    if app.state() != SessionState::Authenticated {
        return Err(PromptdeskError::NotAuthenticated);
    }
    let text = if stdin {
        read_stdin()?
    } else {
        text.unwrap_or_default()
    };

    app.new_prompt().await;
    app.set_name(&name).await;
    app.set_text(&text).await;

    let result = app.submit().await;
    flush_notifications(app).await;
    print_prompt(&result?, "Created", json)
}

pub async fn handle_update(
    app: &App,
    id: PromptId,
    name: Option<String>,
    text: Option<String>,
    stdin: bool,
    json: bool,
) -> Result<()> {
    app.begin_edit(&id).await?;

    if let Some(name) = name {
        app.set_name(&name).await;
    }
    if stdin {
        app.set_text(&read_stdin()?).await;
    } else if let Some(text) = text {
        app.set_text(&text).await;
    }

    let result = app.submit().await;
    flush_notifications(app).await;
    print_prompt(&result?, "Updated", json)
}

pub async fn handle_delete(app: &App, id: PromptId) -> Result<()> {
    let result = app.delete(&id).await;
    flush_notifications(app).await;
    result?;

    println!("Deleted prompt [{}]", id);
    Ok(())
}
