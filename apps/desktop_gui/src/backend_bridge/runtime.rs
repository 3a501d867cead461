//! Runtime bridge between UI command queue and backend event intake.

use std::{sync::Arc, thread};

use client_core::WebhookTransport;
use crossbeam_channel::{Receiver, Sender};

use crate::backend_bridge::commands::BackendCommand;
use crate::controller::events::UiEvent;

/// Spawns the backend worker thread. Commands are handled one at a time.
pub fn launch(
    cmd_rx: Receiver<BackendCommand>,
    ui_tx: Sender<UiEvent>,
    transport: Arc<dyn WebhookTransport>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(1)
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(err) => {
                tracing::error!("failed to build backend runtime: {err}");
                let _ = ui_tx.send(UiEvent::BackendUnavailable(format!(
                    "backend worker startup failure: {err}"
                )));
                return;
            }
        };

        while let Ok(cmd) = cmd_rx.recv() {
            let cmd_name = cmd.name();
            tracing::debug!(command = cmd_name, "backend worker handling command");
            let event = runtime.block_on(handle_command(cmd, transport.as_ref()));
            if ui_tx.send(event).is_err() {
                tracing::debug!("ui event channel closed; stopping backend worker");
                break;
            }
        }
        tracing::debug!("backend worker stopped");
    })
}

async fn handle_command(cmd: BackendCommand, transport: &dyn WebhookTransport) -> UiEvent {
    match cmd {
        BackendCommand::DeliverMessage { request } => {
            let outcome = transport.deliver(&request).await;
            if let Err(err) = &outcome {
                tracing::warn!("webhook delivery failed: {err}");
            }
            UiEvent::ReplyReceived(outcome)
        }
    }
}
