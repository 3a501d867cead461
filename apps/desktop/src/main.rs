use std::{path::PathBuf, sync::Arc};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{load_settings, ChatClient, ChatSettings, HttpWebhook, WebhookTransport};
use shared::domain::{ChatMessage, Role};
use storage::FileStore;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "n8n-chat", about = "Chat with an n8n workflow webhook")]
struct Cli {
    /// Webhook endpoint; overrides n8n_chat.toml and the environment.
    #[arg(long)]
    webhook_url: Option<String>,
    /// Directory holding the persisted session and preferences.
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Interactive conversation (default).
    Chat,
    /// Send one message and print the reply.
    Send { message: String },
    /// Print the session id, optionally replacing it first.
    Session {
        #[arg(long)]
        reset: bool,
    },
    /// Show or toggle display preferences.
    Prefs {
        #[arg(long)]
        toggle_theme: bool,
        #[arg(long)]
        toggle_contrast: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let settings = load_settings()?.with_overrides(cli.webhook_url.as_deref(), cli.data_dir)?;
    let store = FileStore::open_in(&settings.data_dir).with_context(|| {
        format!(
            "failed to open chat storage in '{}'",
            settings.data_dir.display()
        )
    })?;
    tracing::debug!(path = %store.path().display(), "using chat storage");
    let mut client = ChatClient::open(Arc::new(store));

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => run_interactive(&mut client, &settings).await?,
        Command::Send { message } => {
            let webhook = HttpWebhook::new(settings.webhook_url.clone());
            match client.exchange(message, &webhook).await {
                Some(reply) => println!("{}", reply.text),
                None => anyhow::bail!("message is empty; nothing was sent"),
            }
        }
        Command::Session { reset } => {
            if reset {
                let renewed = client.reset_session()?;
                println!("{renewed}");
            } else {
                println!("{}", client.session_id());
            }
        }
        Command::Prefs {
            toggle_theme,
            toggle_contrast,
        } => {
            if toggle_theme {
                client.toggle_theme();
            }
            if toggle_contrast {
                client.toggle_high_contrast();
            }
            let prefs = client.preferences();
            println!("theme={}", prefs.theme.as_stored());
            println!("high_contrast={}", prefs.high_contrast);
        }
    }

    Ok(())
}

async fn run_interactive(client: &mut ChatClient, settings: &ChatSettings) -> Result<()> {
    let webhook = HttpWebhook::new(settings.webhook_url.clone());
    println!("🤖 n8n Chatbot  (session {}...)", client.session_id().short());
    println!("Webhook: {}", webhook.endpoint());
    println!("Commands: /theme, /contrast, /session, /quit");

    let mut printed = print_new_messages(client, 0);
    let mut stdin = BufReader::new(tokio::io::stdin());
    while let Some(line) = next_input_line(&mut stdin).await? {
        match line.trim() {
            "/quit" | "/exit" => break,
            "/theme" => {
                client.toggle_theme();
                println!("{}", client.preferences().mode_hint());
            }
            "/contrast" => {
                client.toggle_high_contrast();
                println!("{}", client.preferences().mode_hint());
            }
            "/session" => println!("Session: {}", client.session_id()),
            _ => {
                if let Some(request) = client.submit_text(line.as_str()) {
                    printed = print_new_messages(client, printed);
                    println!("Bot is typing...");
                    let outcome = webhook.deliver(&request).await;
                    client.resolve(outcome);
                }
            }
        }
        printed = print_new_messages(client, printed);
    }
    Ok(())
}

/// Reads the next line without its terminator. Lines that are not valid
/// UTF-8 are logged and skipped; `None` means end of input.
async fn next_input_line<R>(reader: &mut R) -> std::io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            return Ok(None);
        }
        while matches!(buf.last(), Some(b'\n' | b'\r')) {
            buf.pop();
        }
        match String::from_utf8(std::mem::take(&mut buf)) {
            Ok(line) => return Ok(Some(line)),
            Err(err) => {
                tracing::warn!(
                    bytes = err.as_bytes().len(),
                    "skipping input line that is not valid UTF-8"
                );
            }
        }
    }
}

fn print_new_messages(client: &ChatClient, printed: usize) -> usize {
    for message in client.messages_since(printed) {
        println!("{}", format_message(message));
    }
    client.transcript().len()
}

fn format_message(message: &ChatMessage) -> String {
    let speaker = match message.role {
        Role::User => "you",
        Role::Bot => "bot",
    };
    format!("{speaker}> {}", message.text)
}
