use clap::Parser;
use promptdesk::cli::{
    already_notified, handle_create, handle_delete, handle_list, handle_login, handle_logout,
    handle_register, handle_update, run_shell, Cli, Commands,
};
use promptdesk::{App, Config, Result};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Diagnostics go to stderr; warnings and errors only unless RUST_LOG or -v say otherwise.
    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    if let Err(e) = run(cli).await {
        if !already_notified(&e) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config =
        Config::load(cli.config.as_deref())?.with_overrides(cli.api_url, cli.storage)?;

    let mut app = App::from_config(&config)?;
    if cli.command.needs_prompt_list() {
        app.start().await;
    } else {
        app.restore();
    }

    match cli.command {
        Commands::Login { username, password } => handle_login(&mut app, username, password).await,
        Commands::Register {
            username,
            email,
            password,
        } => handle_register(&mut app, username, email, password).await,
        Commands::Logout => handle_logout(&mut app).await,
        Commands::List { json } => handle_list(&app, json).await,
        Commands::Create {
            name,
            text,
            stdin,
            json,
        } => handle_create(&app, name, text, stdin, json).await,
        Commands::Update {
            id,
            name,
            text,
            stdin,
            json,
        } => handle_update(&app, id, name, text, stdin, json).await,
        Commands::Delete { id } => handle_delete(&app, id).await,
        Commands::Shell => run_shell(&mut app).await,
    }
}
