use std::{path::PathBuf, sync::Arc};

mod backend_bridge;
mod controller;
mod ui;

use anyhow::{anyhow, Context, Result};
use backend_bridge::{commands::BackendCommand, runtime};
use clap::Parser;
use client_core::{load_settings, ChatClient, HttpWebhook};
use controller::events::UiEvent;
use crossbeam_channel::bounded;
use eframe::egui;
use storage::FileStore;
use tracing_subscriber::EnvFilter;
use ui::app::DesktopGuiApp;

const APP_TITLE: &str = "n8n Chatbot";

#[derive(Parser, Debug)]
#[command(name = "n8n-chat-gui", about = "Desktop chat window for an n8n workflow webhook")]
struct Cli {
    /// Webhook endpoint; overrides n8n_chat.toml and the environment.
    #[arg(long)]
    webhook_url: Option<String>,
    /// Directory holding the persisted session and preferences.
    #[arg(long)]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
    let cli = Cli::parse();

    let settings = load_settings()?.with_overrides(cli.webhook_url.as_deref(), cli.data_dir)?;
    let store = FileStore::open_in(&settings.data_dir).with_context(|| {
        format!(
            "failed to open chat storage in '{}'",
            settings.data_dir.display()
        )
    })?;
    let client = ChatClient::open(Arc::new(store));
    tracing::info!(webhook = %settings.webhook_url, "starting desktop chat");

    let (cmd_tx, cmd_rx) = bounded::<BackendCommand>(16);
    let (ui_tx, ui_rx) = bounded::<UiEvent>(64);
    runtime::launch(
        cmd_rx,
        ui_tx,
        Arc::new(HttpWebhook::new(settings.webhook_url.clone())),
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(APP_TITLE)
            .with_inner_size([520.0, 720.0])
            .with_min_inner_size([360.0, 480.0]),
        ..Default::default()
    };
    eframe::run_native(
        APP_TITLE,
        options,
        Box::new(move |_cc| Ok(Box::new(DesktopGuiApp::new(client, cmd_tx, ui_rx)))),
    )
    .map_err(|err| anyhow!("desktop window failed: {err}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_overrides() {
        let cli = Cli::try_parse_from([
            "n8n-chat-gui",
            "--webhook-url",
            "https://n8n.example.com/webhook/chat",
            "--data-dir",
            "/tmp/n8n-chat",
        ])
        .expect("parse");
        assert_eq!(
            cli.webhook_url.as_deref(),
            Some("https://n8n.example.com/webhook/chat")
        );
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/n8n-chat")));
    }
}
