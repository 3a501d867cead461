//! Command orchestration helpers from UI actions to backend command queue.

use crossbeam_channel::{Sender, TrySendError};
use shared::error::ExchangeError;

use crate::backend_bridge::commands::BackendCommand;

/// Queues `cmd` for the backend worker. A refusal is reported as a transport
/// failure so the caller can settle the outstanding exchange.
pub fn dispatch_backend_command(
    cmd_tx: &Sender<BackendCommand>,
    cmd: BackendCommand,
) -> Result<(), ExchangeError> {
    let cmd_name = cmd.name();
    match cmd_tx.try_send(cmd) {
        Ok(()) => {
            tracing::debug!(command = cmd_name, "queued ui->backend command");
            Ok(())
        }
        Err(TrySendError::Full(_)) => {
            tracing::warn!(command = cmd_name, "ui->backend command queue is full");
            Err(ExchangeError::transport("backend command queue is full"))
        }
        Err(TrySendError::Disconnected(_)) => {
            tracing::error!(command = cmd_name, "ui->backend command queue disconnected");
            Err(ExchangeError::transport(
                "backend command processor disconnected",
            ))
        }
    }
}
