use crate::dom::MutationRecord;
use crate::extension::command_handler::handle_command;
use crate::extension::ContentScript;
use crate::model::ContentCommand;
use crate::storage::SettingsChange;
use tokio::sync::broadcast::error::RecvError;
use tokio::sync::{broadcast, mpsc};
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Event loop of the content script. Mutations and setting changes only mark
/// a pass as pending; the next frame tick runs it. Ends when the tab's
/// command channel closes.
pub async fn run(
    mut script: ContentScript,
    mut commands: mpsc::Receiver<ContentCommand>,
    mut mutations: mpsc::UnboundedReceiver<MutationRecord>,
    mut settings: broadcast::Receiver<SettingsChange>,
) {
    let mut frames = interval(script.frame_interval);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut settings_open = true;

    loop {
        tokio::select! {
            Some(record) = mutations.recv() => {
                debug!("[observer] +{} -{} nodes", record.added, record.removed);
                script.controller.notify_mutation();
            }
            change = settings.recv(), if settings_open => match change {
                Ok(SettingsChange::FilterEnabled(enabled)) => script.controller.set_enabled(enabled),
                Ok(SettingsChange::Profile(_)) => {}
                Err(RecvError::Lagged(skipped)) => {
                    warn!("⚠️ Missed {} settings changes, re-reading flag", skipped);
                    match script.store.lock().await.filter_enabled() {
                        Ok(enabled) => script.controller.set_enabled(enabled),
                        Err(e) => warn!("Flag re-read failed: {:?}", e),
                    }
                }
                Err(RecvError::Closed) => settings_open = false,
            },
            _ = frames.tick() => script.on_frame(),
            command = commands.recv() => match command {
                Some(command) => handle_command(command, &mut script).await,
                None => {
                    info!("🛑 Tab closed, content script ended.");
                    break;
                }
            },
        }
    }
}
