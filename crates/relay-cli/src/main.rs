use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use colored::Colorize;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tracing_subscriber::EnvFilter;

use relay_core::session::{ChatStore, MessageRole};
use relay_core::transport::{FileAttachment, ReplyTransport};
use relay_infrastructure::{
    JsonHistoryRepository, RelayConfig, RelayPaths, load_attachment, write_export,
};
use relay_transport::WebhookTransport;

/// CLI arguments for relay
#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Relay - webhook-backed chat client", long_about = None)]
#[command(version)]
struct Cli {
    /// Webhook endpoint producing assistant replies (overrides config and
    /// the RELAY_WEBHOOK_URL environment variable)
    #[arg(long, value_name = "URL")]
    webhook_url: Option<String>,

    /// Path to the configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Directory for the persisted history (and default export location)
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("RELAY_LOG")
                .or_else(|_| EnvFilter::try_from_default_env())
                .unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => RelayConfig::load(path)?,
        None => RelayConfig::load_default()?,
    }
    .apply_env();
    if cli.webhook_url.is_some() {
        config.webhook_url = cli.webhook_url.clone();
    }

    let history_path = match &cli.data_dir {
        Some(dir) => dir.join("history.json"),
        None => RelayPaths::history_file().context("Failed to resolve history file path")?,
    };
    let export_dir = match (&config.export_dir, &cli.data_dir) {
        (Some(dir), _) => dir.clone(),
        (None, Some(dir)) => dir.join("exports"),
        (None, None) => RelayPaths::exports_dir().context("Failed to resolve exports directory")?,
    };

    tracing::debug!(history = ?history_path, exports = ?export_dir, "resolved data paths");

    let repository = Arc::new(JsonHistoryRepository::new(history_path));
    let transport: Option<Arc<dyn ReplyTransport>> = config.webhook_url.as_ref().map(|url| {
        Arc::new(
            WebhookTransport::new(url.clone())
                .with_timeout(Duration::from_secs(config.request_timeout_secs)),
        ) as Arc<dyn ReplyTransport>
    });
    let demo_mode = transport.is_none();

    let store = ChatStore::new(repository, transport);
    store.load_history().await;

    println!("{}", "=== Relay ===".bright_magenta().bold());
    if demo_mode {
        println!(
            "{}",
            "Demo mode: no webhook endpoint configured, replies are canned.".yellow()
        );
    } else if let Some(url) = &config.webhook_url {
        println!("{}", format!("Webhook endpoint: {}", url).bright_black());
    }
    println!(
        "{}",
        "Type a message to send it, '/help' for commands, 'quit' to exit.".bright_black()
    );
    println!();

    run_repl(&store, &export_dir).await?;

    // Persist whatever the debounce window still holds.
    store.flush().await;

    Ok(())
}

async fn run_repl(store: &ChatStore, export_dir: &std::path::Path) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut pending_attachment: Option<FileAttachment> = None;

    loop {
        match rl.readline(">> ") {
            Ok(line) => {
                let trimmed = line.trim();

                if trimmed == "quit" || trimmed == "exit" {
                    println!("{}", "Goodbye!".bright_green());
                    break;
                }
                if trimmed.is_empty() && pending_attachment.is_none() {
                    continue;
                }

                let _ = rl.add_history_entry(&line);

                if let Some(command) = trimmed.strip_prefix('/') {
                    handle_command(store, command, &mut pending_attachment, export_dir).await;
                } else {
                    send_message(store, trimmed, pending_attachment.take()).await;
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type 'quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "CTRL-D detected. Exiting...".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {:?}", err).red());
                break;
            }
        }
    }

    Ok(())
}

async fn send_message(store: &ChatStore, content: &str, attachment: Option<FileAttachment>) {
    store.send(content, attachment).await;

    if let Some(error) = store.last_error().await {
        println!("{}", format!("Exchange failed: {}", error).red());
    }

    let Some(session) = store.current_session().await else {
        return;
    };
    if let Some(reply) = session
        .messages
        .iter()
        .rev()
        .find(|m| m.role == MessageRole::Assistant && !m.is_typing)
    {
        for line in reply.content.lines() {
            println!("{}", line.bright_blue());
        }
        println!();
    }
}

async fn handle_command(
    store: &ChatStore,
    command: &str,
    pending_attachment: &mut Option<FileAttachment>,
    export_dir: &std::path::Path,
) {
    let (name, arg) = match command.split_once(' ') {
        Some((name, arg)) => (name, arg.trim()),
        None => (command, ""),
    };

    match name {
        "help" => print_help(),
        "new" => {
            store.save_current().await;
            store.new_session().await;
            println!("{}", "Started a new chat.".green());
        }
        "list" => print_session_list(store).await,
        "load" => match resolve_session(store, arg).await {
            Some(id) => {
                store.save_current().await;
                store.load_session(&id).await;
                if let Some(session) = store.current_session().await {
                    println!("{}", format!("Loaded: {}", session.title).green());
                }
            }
            None => println!("{}", format!("No session matching '{}'", arg).yellow()),
        },
        "delete" => match resolve_session(store, arg).await {
            Some(id) => {
                store.delete_session(&id).await;
                println!("{}", "Session deleted.".green());
            }
            None => println!("{}", format!("No session matching '{}'", arg).yellow()),
        },
        "clear" => {
            store.clear_all().await;
            println!("{}", "All chat history cleared.".green());
        }
        "attach" => match load_attachment(std::path::Path::new(arg)) {
            Ok(attachment) => {
                println!(
                    "{}",
                    format!(
                        "Attached {} ({}, {} bytes); it rides with your next message.",
                        attachment.file_name,
                        attachment.mime_type,
                        attachment.data.len()
                    )
                    .green()
                );
                *pending_attachment = Some(attachment);
            }
            Err(err) => println!("{}", format!("Could not attach file: {:#}", err).red()),
        },
        "export" => export_history(store, arg, export_dir).await,
        _ => println!("{}", "Unknown command; try '/help'.".bright_black()),
    }
}

async fn export_history(store: &ChatStore, format: &str, export_dir: &std::path::Path) {
    let document = match format {
        "json" => match store.export_json().await {
            Ok(document) => document,
            Err(err) => {
                println!("{}", format!("Export failed: {}", err).red());
                return;
            }
        },
        "md" | "markdown" => store.export_markdown().await,
        _ => {
            println!("{}", "Usage: /export <json|md>".yellow());
            return;
        }
    };

    match write_export(&document, export_dir) {
        Ok(path) => println!("{}", format!("Exported to {:?}", path).green()),
        Err(err) => println!("{}", format!("Export failed: {:#}", err).red()),
    }
}

async fn print_session_list(store: &ChatStore) {
    let history = store.history().await;
    if history.is_empty() {
        println!("{}", "No saved sessions yet.".bright_black());
        return;
    }
    let current_id = store.current_session().await.map(|s| s.id);
    for (index, session) in history.iter().enumerate() {
        let marker = if Some(&session.id) == current_id.as_ref() {
            "*"
        } else {
            " "
        };
        println!(
            "{} {:>3}. {}  {}",
            marker,
            index + 1,
            session.title,
            session
                .updated_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black()
        );
    }
}

/// Resolves a `/load` / `/delete` argument: a 1-based list index or a
/// session id prefix.
async fn resolve_session(store: &ChatStore, arg: &str) -> Option<String> {
    if arg.is_empty() {
        return None;
    }
    let history = store.history().await;
    if let Ok(index) = arg.parse::<usize>() {
        if (1..=history.len()).contains(&index) {
            return Some(history[index - 1].id.clone());
        }
        return None;
    }
    history
        .iter()
        .find(|s| s.id.starts_with(arg))
        .map(|s| s.id.clone())
}

fn print_help() {
    println!("{}", "Commands:".bold());
    println!("  /new              start a new chat (current one is saved)");
    println!("  /list             list saved sessions");
    println!("  /load <n|id>      switch to a saved session");
    println!("  /delete <n|id>    delete a saved session");
    println!("  /clear            delete all saved sessions");
    println!("  /attach <path>    attach a file to your next message");
    println!("  /export <json|md> export the history");
    println!("  quit              exit");
}

