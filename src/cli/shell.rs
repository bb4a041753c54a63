//! Interactive front end: read an action, run it, redraw the screen.

use std::io::{self, Write};
use std::str::FromStr;

use tokio::io::{AsyncBufReadExt, BufReader};

use super::handlers::already_notified;
use crate::app::App;
use crate::entity::PromptId;
use crate::error::Result;

const HELP: &str = "\
Commands:
  login <username> <password>             log in (login form)
  register <username> <email> <password>  create an account (register form)
  mode                                    switch between login and register forms
  refresh                                 reload prompts from the backend
  edit <id>                               load a prompt into the form
  new                                     clear the form for a new prompt
  name <text>                             set the form's prompt name
  text <text>                             set the form's prompt text
  save                                    create or update from the form
  delete <id>                             delete a prompt
  logout                                  forget the session
  help                                    show this help
  quit                                    leave the shell";

/// One line of shell input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellInput {
    Help,
    Mode,
    Login { username: String, password: String },
    Register {
        username: String,
        email: String,
        password: String,
    },
    Logout,
    Refresh,
    Edit(PromptId),
    New,
    Name(String),
    Text(String),
    Save,
    Delete(PromptId),
    Quit,
}

impl FromStr for ShellInput {
    type Err = String;

    fn from_str(line: &str) -> std::result::Result<Self, Self::Err> {
        let line = line.trim();
        let (command, rest) = match line.split_once(char::is_whitespace) {
            Some((command, rest)) => (command, rest.trim()),
            None => (line, ""),
        };
        let args: Vec<&str> = rest.split_whitespace().collect();

        match (command, args.as_slice()) {
            ("help" | "?", []) => Ok(ShellInput::Help),
            ("mode", []) => Ok(ShellInput::Mode),
            ("login", [username, password]) => Ok(ShellInput::Login {
                username: username.to_string(),
                password: password.to_string(),
            }),
            ("register", [username, email, password]) => Ok(ShellInput::Register {
                username: username.to_string(),
                email: email.to_string(),
                password: password.to_string(),
            }),
            ("logout", []) => Ok(ShellInput::Logout),
            ("refresh", []) => Ok(ShellInput::Refresh),
            ("edit", [id]) => Ok(ShellInput::Edit(PromptId::new(*id))),
            ("new", []) => Ok(ShellInput::New),
            // name/text keep the rest of the line verbatim, spaces included
            ("name", _) => Ok(ShellInput::Name(rest.to_string())),
            ("text", _) => Ok(ShellInput::Text(rest.to_string())),
            ("save", []) => Ok(ShellInput::Save),
            ("delete", [id]) => Ok(ShellInput::Delete(PromptId::new(*id))),
            ("quit" | "exit", []) => Ok(ShellInput::Quit),
            ("login" | "register" | "edit" | "delete", _) => Err(format!(
                "Wrong number of arguments for '{}'. Type 'help' for usage.",
                command
            )),
            _ => Err(format!("Unknown command '{}'. Type 'help' for usage.", command)),
        }
    }
}

async fn dispatch(app: &mut App, input: ShellInput) -> Result<()> {
    match input {
        ShellInput::Help => println!("{}", HELP),
        ShellInput::Mode => {
            app.toggle_mode()?;
        }
        ShellInput::Login { username, password } => app.login(&username, &password).await?,
        ShellInput::Register {
            username,
            email,
            password,
        } => app.register(&username, &email, &password).await?,
        ShellInput::Logout => app.logout().await?,
        ShellInput::Refresh => app.refresh().await?,
        ShellInput::Edit(id) => {
            app.begin_edit(&id).await?;
        }
        ShellInput::New => app.new_prompt().await,
        ShellInput::Name(name) => app.set_name(&name).await,
        ShellInput::Text(text) => app.set_text(&text).await,
        ShellInput::Save => {
            app.submit().await?;
        }
        ShellInput::Delete(id) => app.delete(&id).await?,
        ShellInput::Quit => {}
    }
    Ok(())
}

/// Run until `quit` or end of input. Action failures are reported and the
/// loop carries on.
pub async fn run_shell(app: &mut App) -> Result<()> {
    let interactive = atty::is(atty::Stream::Stdin);
    println!("{}", app.render().await);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        if interactive {
            print!("\n> ");
            io::stdout().flush()?;
        }

        let Some(line) = lines.next_line().await? else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        let input = match line.parse::<ShellInput>() {
            Ok(input) => input,
            Err(message) => {
                eprintln!("{}", message);
                continue;
            }
        };
        if input == ShellInput::Quit {
            break;
        }
        let redraw = input != ShellInput::Help;

        if let Err(e) = dispatch(app, input).await {
            if !already_notified(&e) {
                eprintln!("Error: {}", e);
            }
        }

        if redraw {
            println!("\n{}", app.render().await);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_login() {
        let input: ShellInput = "login alice s3cret".parse().unwrap();
        assert_eq!(
            input,
            ShellInput::Login {
                username: "alice".to_string(),
                password: "s3cret".to_string()
            }
        );
    }

    #[test]
    fn test_parse_register_needs_three_args() {
        assert!("register bob pw".parse::<ShellInput>().is_err());
        let input: ShellInput = "register bob bob@example.com pw".parse().unwrap();
        assert!(matches!(input, ShellInput::Register { .. }));
    }

    #[test]
    fn test_name_and_text_keep_spaces() {
        let name: ShellInput = "name  My  Prompt ".parse().unwrap();
        assert_eq!(name, ShellInput::Name("My  Prompt".to_string()));

        let text: ShellInput = "text Summarize the following: {input}".parse().unwrap();
        assert_eq!(
            text,
            ShellInput::Text("Summarize the following: {input}".to_string())
        );
    }

    #[test]
    fn test_empty_name_clears_field() {
        let name: ShellInput = "name".parse().unwrap();
        assert_eq!(name, ShellInput::Name(String::new()));
    }

    #[test]
    fn test_parse_ids() {
        assert_eq!(
            "edit 12".parse::<ShellInput>().unwrap(),
            ShellInput::Edit(PromptId::from(12))
        );
        assert_eq!(
            "delete abc".parse::<ShellInput>().unwrap(),
            ShellInput::Delete(PromptId::from("abc"))
        );
    }

    #[test]
    fn test_unknown_command() {
        let err = "frobnicate".parse::<ShellInput>().unwrap_err();
        assert!(err.contains("Unknown command 'frobnicate'"));
    }

    #[test]
    fn test_quit_aliases() {
        assert_eq!("quit".parse::<ShellInput>().unwrap(), ShellInput::Quit);
        assert_eq!("exit".parse::<ShellInput>().unwrap(), ShellInput::Quit);
    }
}
