// Popup actions. Every user-facing action ends in a status line.
use crate::extension::TabHandle;
use crate::model::{AutofillResponse, ChannelError, ContentCommand, Profile, StatusMessage, StorageError};
use crate::seed::load_profile;
use crate::source::Fetcher;
use crate::storage::SharedStore;
use crate::utils::current_year;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{info, warn};

const JOBS_URL_MARKER: &str = "linkedin.com/jobs";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopupState {
    pub filter_enabled: bool,
    pub profile: Profile,
}

pub struct Popup {
    store: SharedStore,
    fetcher: Arc<dyn Fetcher>,
}

impl Popup {
    pub fn new(store: SharedStore, fetcher: Arc<dyn Fetcher>) -> Self {
        Self { store, fetcher }
    }

    pub async fn load(&self) -> Result<PopupState, StorageError> {
        let store = self.store.lock().await;
        Ok(PopupState {
            filter_enabled: store.filter_enabled()?,
            profile: store.profile()?,
        })
    }

    pub async fn toggle_filter(&self, enabled: bool) -> Result<(), StorageError> {
        self.store.lock().await.set_filter_enabled(enabled)
    }

    pub async fn save_profile(&self, profile: &Profile) -> StatusMessage {
        match self.store.lock().await.set_profile(&profile.trimmed()) {
            Ok(()) => StatusMessage::info("Profile saved."),
            Err(e) => {
                warn!("❌ Profile save failed: {:?}", e);
                StatusMessage::error("Could not save profile.")
            }
        }
    }

    /// Saves the form profile, then asks the content script of the active tab
    /// to autofill.
    pub async fn autofill_active_tab(&self, profile: &Profile, tab: Option<&TabHandle>) -> StatusMessage {
        if let Err(e) = self.store.lock().await.set_profile(&profile.trimmed()) {
            warn!("❌ Profile save failed: {:?}", e);
            return StatusMessage::error("Could not save profile.");
        }

        let Some(tab) = tab.filter(|t| t.url.contains(JOBS_URL_MARKER)) else {
            return StatusMessage::error("Open a LinkedIn Jobs tab first.");
        };

        match send_autofill(tab).await {
            Err(e) => {
                warn!("📭 Autofill command not delivered: {}", e);
                StatusMessage::error("Could not access this tab. Refresh page and try again.")
            }
            Ok(response) if !response.ok => StatusMessage::error("Autofill failed."),
            Ok(response) => {
                info!("✅ Autofill filled {} field(s)", response.filled_count);
                StatusMessage::info(format!(
                    "Autofill complete. Filled {} field(s).",
                    response.filled_count
                ))
            }
        }
    }

    /// Loads the seed documents and stores the derived profile.
    pub async fn import_seed(&self, profile_location: &str, resume_location: &str) -> StatusMessage {
        let profile = match load_profile(
            self.fetcher.as_ref(),
            profile_location,
            resume_location,
            current_year(),
        )
        .await
        {
            Ok(profile) => profile,
            Err(e) => {
                warn!("❌ Seed import failed: {}", e);
                return StatusMessage::error(e.user_message());
            }
        };

        match self.store.lock().await.set_profile(&profile) {
            Ok(()) => StatusMessage::info("Profile loaded from seed files."),
            Err(e) => {
                warn!("❌ Profile save failed: {:?}", e);
                StatusMessage::error("Could not save profile.")
            }
        }
    }
}

async fn send_autofill(tab: &TabHandle) -> Result<AutofillResponse, ChannelError> {
    let (reply, response) = oneshot::channel();
    tab.commands
        .send(ContentCommand::RunAutofill { reply })
        .await
        .map_err(|_| ChannelError::Unreachable)?;
    response.await.map_err(|_| ChannelError::NoResponse)
}
