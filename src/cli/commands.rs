use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::entity::PromptId;

#[derive(Parser, Debug)]
#[command(name = "promptdesk")]
#[command(version, about = "Manage prompts stored in a headless CMS")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Config file (default: ./.promptdesk/config.yaml, then the user config dir)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Backend API origin, e.g. http://localhost:1337/api
    #[arg(long, global = true, env = "PROMPTDESK_API_URL", value_name = "URL")]
    pub api_url: Option<String>,

    /// Storage file that keeps the session token between runs
    #[arg(long, global = true, env = "PROMPTDESK_STORAGE", value_name = "PATH")]
    pub storage: Option<PathBuf>,

    /// Log request details to stderr
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Log in with a username or email
    Login {
        /// Username or email
        username: String,

        /// Password (read from stdin when omitted)
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Create an account and log in
    Register {
        username: String,

        email: String,

        /// Password (read from stdin when omitted)
        #[arg(long, short = 'p')]
        password: Option<String>,
    },

    /// Forget the stored session
    Logout,

    /// List your prompts
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Create a prompt
    Create {
        /// Prompt name
        name: String,

        /// Prompt text
        #[arg(conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the prompt text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Change a prompt's name and/or text
    Update {
        /// Prompt ID as shown by `list`
        id: PromptId,

        /// New name
        #[arg(long)]
        name: Option<String>,

        /// New text
        #[arg(long, conflicts_with = "stdin")]
        text: Option<String>,

        /// Read the new text from stdin
        #[arg(long)]
        stdin: bool,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Delete a prompt (no confirmation)
    Delete {
        /// Prompt ID as shown by `list`
        id: PromptId,
    },

    /// Interactive session that redraws the screen after every action
    Shell,
}

impl Commands {
    /// Commands that read the prompt list fetched at startup. The others only
    /// need the stored session and must not wait on the backend first.
    pub fn needs_prompt_list(&self) -> bool {
        matches!(
            self,
            Commands::List { .. } | Commands::Update { .. } | Commands::Shell
        )
    }
}
