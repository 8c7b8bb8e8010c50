use crate::extension::ContentScript;
use crate::model::{AutofillResponse, ContentCommand};
use tracing::{info, warn};

/// Handles a command from the popup and replies on its channel.
pub async fn handle_command(command: ContentCommand, script: &mut ContentScript) {
    match command {
        ContentCommand::RunAutofill { reply } => {
            info!("Handling command: RunAutofill");
            let profile = script.store.lock().await.profile();
            let response = match profile {
                Ok(profile) => {
                    let filled = script
                        .autofiller
                        .run_autofill(&mut script.page.borrow_mut(), &profile);
                    AutofillResponse {
                        ok: true,
                        filled_count: filled,
                    }
                }
                Err(e) => {
                    warn!("❌ Could not read profile: {:?}", e);
                    AutofillResponse {
                        ok: false,
                        filled_count: 0,
                    }
                }
            };
            if reply.send(response).is_err() {
                warn!("Popup closed before the autofill reply");
            }
        }
    }
}
