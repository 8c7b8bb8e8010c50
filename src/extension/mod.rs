pub mod command_handler;
pub mod listener;
pub mod popup;

use crate::autofill::Autofiller;
use crate::dom::SharedPage;
use crate::filter::{CardFilter, FilterController};
use crate::model::ContentCommand;
use crate::storage::SharedStore;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

pub use popup::Popup;

/// Default frame length used to coalesce filter passes.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

/// What the popup knows about the active tab: its URL and the channel to the
/// content script running in it.
#[derive(Debug, Clone)]
pub struct TabHandle {
    pub url: String,
    pub commands: mpsc::Sender<ContentCommand>,
}

/// The page-side half of the extension: keeps job cards filtered and answers
/// autofill commands.
pub struct ContentScript {
    pub page: SharedPage,
    pub store: SharedStore,
    pub controller: FilterController,
    pub autofiller: Autofiller,
    pub frame_interval: Duration,
}

impl ContentScript {
    pub fn new(page: SharedPage, store: SharedStore, frame_interval: Duration) -> Self {
        Self {
            page,
            store,
            controller: FilterController::new(true),
            autofiller: Autofiller::new(),
            frame_interval,
        }
    }

    /// Injects the hide style, loads the stored flag, subscribes to settings and
    /// page mutations, then spawns the listener on the current `LocalSet`.
    pub async fn start(mut self, url: &str) -> (TabHandle, JoinHandle<()>) {
        CardFilter::ensure_style(&mut self.page.borrow_mut());

        let (enabled, settings) = {
            let store = self.store.lock().await;
            let enabled = store.filter_enabled().unwrap_or_else(|e| {
                warn!("⚠️ Could not read filter flag, using default: {:?}", e);
                true
            });
            (enabled, store.subscribe())
        };
        self.controller.set_enabled(enabled);

        let mutations = self.page.borrow_mut().observe();
        let (tx, rx) = mpsc::channel(8);

        info!("▶️ Content script started on {}", url);
        let task = tokio::task::spawn_local(listener::run(self, rx, mutations, settings));

        (
            TabHandle {
                url: url.to_string(),
                commands: tx,
            },
            task,
        )
    }

    /// Runs the pending filter pass, if any.
    pub fn on_frame(&mut self) {
        if !self.controller.is_pending() {
            return;
        }
        let mut page = self.page.borrow_mut();
        if let Some(report) = self.controller.on_frame(&mut page) {
            if report.changed > 0 {
                info!(
                    "🧹 [filter] {} of {} cards hidden ({} changed)",
                    report.hidden, report.scanned, report.changed
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom::{NodeId, Page};
    use crate::filter::HIDE_CLASS;
    use crate::model::{AutofillResponse, FetchError, Profile, StatusMessage};
    use crate::source::Fetcher;
    use crate::storage::SettingsStore;
    use scraper::Selector;
    use std::collections::HashMap;
    use std::sync::Arc;
    use tokio::task::LocalSet;

    const JOBS_URL: &str = "https://www.linkedin.com/jobs/search/?keywords=rust";

    const PAGE: &str = r#"<html><body>
        <ul class="jobs-search__results-list">
          <li id="easy"><span>Easy Apply</span></li>
          <li id="plain"><span>Apply on company website</span></li>
        </ul>
        <div class="jobs-easy-apply-modal">
          <label for="n">Full Name</label><input id="n" type="text">
          <label for="e">Email Address</label><input id="e" type="email">
        </div>
    </body></html>"#;

    struct StaticFetcher(HashMap<&'static str, &'static str>);

    #[async_trait::async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, location: &str) -> Result<String, FetchError> {
            self.0
                .get(location)
                .map(|body| body.to_string())
                .ok_or(FetchError::InvalidResponse(404))
        }
    }

    fn by_id(page: &SharedPage, id: &str) -> NodeId {
        page.borrow().select(&Selector::parse(&format!("#{}", id)).unwrap())[0]
    }

    fn is_hidden(page: &SharedPage, id: &str) -> bool {
        let node = by_id(page, id);
        page.borrow().has_class(node, HIDE_CLASS)
    }

    async fn wait_until(mut condition: impl FnMut() -> bool) -> bool {
        for _ in 0..200 {
            if condition() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        condition()
    }

    fn popup(store: &SharedStore) -> Popup {
        let fetcher = StaticFetcher(HashMap::from([
            ("profile.json", r#"{"name":"John Q Public","links":["https://github.com/jqp"]}"#),
            ("resume.json", r#"{"experience":[{"start":"2015"}]}"#),
            ("broken.json", "{"),
        ]));
        Popup::new(store.clone(), Arc::new(fetcher))
    }

    #[tokio::test]
    async fn test_content_script_filters_and_follows_settings() {
        LocalSet::new()
            .run_until(async {
                let page = Page::parse(PAGE).shared();
                let store = SettingsStore::in_memory().unwrap().shared();
                let script = ContentScript::new(page.clone(), store.clone(), Duration::from_millis(2));
                let (tab, task) = script.start(JOBS_URL).await;

                assert!(wait_until(|| is_hidden(&page, "easy")).await);
                assert!(!is_hidden(&page, "plain"));
                assert_eq!(page.borrow().injected_styles().count(), 1);

                popup(&store).toggle_filter(false).await.unwrap();
                assert!(wait_until(|| !is_hidden(&page, "easy")).await);

                popup(&store).toggle_filter(true).await.unwrap();
                page.borrow_mut()
                    .append_html(
                        "ul.jobs-search__results-list",
                        r#"<li id="late"><p>Promoted</p></li>"#,
                    )
                    .unwrap();
                assert!(wait_until(|| is_hidden(&page, "late") && is_hidden(&page, "easy")).await);

                drop(tab);
                task.await.unwrap();
            })
            .await;
    }

    #[tokio::test]
    async fn test_popup_autofill_round_trip() {
        LocalSet::new()
            .run_until(async {
                let page = Page::parse(PAGE).shared();
                let store = SettingsStore::in_memory().unwrap().shared();
                let (tab, _task) = ContentScript::new(page.clone(), store.clone(), FRAME_INTERVAL)
                    .start(JOBS_URL)
                    .await;

                let profile = Profile {
                    full_name: " Jane Doe ".into(),
                    email: "jane@x.com".into(),
                    ..Default::default()
                };
                let popup = popup(&store);

                let status = popup.autofill_active_tab(&profile, Some(&tab)).await;
                assert_eq!(status.text, "Autofill complete. Filled 2 field(s).");
                assert!(!status.is_error);
                assert_eq!(page.borrow().value(by_id(&page, "n")), "Jane Doe");

                let again = popup.autofill_active_tab(&profile, Some(&tab)).await;
                assert_eq!(again.text, "Autofill complete. Filled 0 field(s).");

                assert_eq!(popup.load().await.unwrap().profile.full_name, "Jane Doe");
            })
            .await;
    }

    #[tokio::test]
    async fn test_popup_autofill_errors() {
        let store = SettingsStore::in_memory().unwrap().shared();
        let popup = popup(&store);
        let profile = Profile::default();

        let none = popup.autofill_active_tab(&profile, None).await;
        assert_eq!(none.text, "Open a LinkedIn Jobs tab first.");
        assert!(none.is_error);

        let (tx, rx) = mpsc::channel(1);
        let other = TabHandle {
            url: "https://example.com".into(),
            commands: tx.clone(),
        };
        let wrong = popup.autofill_active_tab(&profile, Some(&other)).await;
        assert_eq!(wrong.text, "Open a LinkedIn Jobs tab first.");

        drop(rx);
        let dead = TabHandle {
            url: JOBS_URL.into(),
            commands: tx,
        };
        let status = popup.autofill_active_tab(&profile, Some(&dead)).await;
        assert_eq!(status.text, "Could not access this tab. Refresh page and try again.");
        assert!(status.is_error);
    }

    /// A tab whose content script answers the first command with `response`,
    /// or drops the reply when there is none.
    fn scripted_tab(response: Option<AutofillResponse>) -> TabHandle {
        let (tx, mut rx) = mpsc::channel(1);
        tokio::spawn(async move {
            if let Some(ContentCommand::RunAutofill { reply }) = rx.recv().await {
                if let Some(response) = response {
                    let _ = reply.send(response);
                }
            }
        });
        TabHandle {
            url: JOBS_URL.into(),
            commands: tx,
        }
    }

    #[tokio::test]
    async fn test_popup_autofill_failed_reply() {
        let store = SettingsStore::in_memory().unwrap().shared();
        let tab = scripted_tab(Some(AutofillResponse {
            ok: false,
            filled_count: 0,
        }));

        let status = popup(&store).autofill_active_tab(&Profile::default(), Some(&tab)).await;
        assert_eq!(status, StatusMessage::error("Autofill failed."));
    }

    #[tokio::test]
    async fn test_popup_autofill_dropped_reply() {
        let store = SettingsStore::in_memory().unwrap().shared();
        let tab = scripted_tab(None);

        let status = popup(&store).autofill_active_tab(&Profile::default(), Some(&tab)).await;
        assert_eq!(
            status,
            StatusMessage::error("Could not access this tab. Refresh page and try again.")
        );
    }

    #[tokio::test]
    async fn test_popup_save_profile_trims() {
        let store = SettingsStore::in_memory().unwrap().shared();
        let popup = popup(&store);
        let profile = Profile {
            email: "  a@b.c \n".into(),
            full_name: " Jane ".into(),
            ..Default::default()
        };

        let status = popup.save_profile(&profile).await;
        assert_eq!(status, StatusMessage::info("Profile saved."));
        let stored = popup.load().await.unwrap().profile;
        assert_eq!(stored.email, "a@b.c");
        assert_eq!(stored.full_name, "Jane");
    }

    #[tokio::test]
    async fn test_popup_seed_import() {
        let store = SettingsStore::in_memory().unwrap().shared();
        let popup = popup(&store);

        let ok = popup.import_seed("profile.json", "resume.json").await;
        assert_eq!(ok.text, "Profile loaded from seed files.");
        let state = popup.load().await.unwrap();
        assert_eq!(state.profile.first_name, "John");
        assert_eq!(state.profile.github, "https://github.com/jqp");
        assert!(state.filter_enabled);

        for (profile, resume) in [("broken.json", "resume.json"), ("missing.json", "resume.json")] {
            let status = popup.import_seed(profile, resume).await;
            assert_eq!(status.text, "Could not load profile data.");
            assert!(status.is_error);
        }
    }
}
