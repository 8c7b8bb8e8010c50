mod autofill;
mod classifier;
mod config;
mod console;
mod dom;
mod extension;
mod filter;
mod model;
mod seed;
mod source;
mod storage;
mod utils;

use config::{load_config, AppConfig};
use dom::Page;
use extension::{ContentScript, Popup};
use source::{Fetcher, FetcherImpl};
use std::sync::Arc;
use std::time::Duration;
use storage::SettingsStore;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::task::LocalSet;
use tracing::{error, info, warn};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config: AppConfig = match load_config("config.json") {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    // The page and the content script share one thread, like a browser tab.
    LocalSet::new().run_until(run(config)).await;
}

async fn run(config: AppConfig) {
    let store = match SettingsStore::new(&config.settings_db) {
        Ok(s) => s.shared(),
        Err(e) => {
            error!("Failed to initialize settings store: {:?}", e);
            return;
        }
    };

    let fetcher: Arc<dyn Fetcher> = match FetcherImpl::new() {
        Ok(f) => Arc::new(f),
        Err(e) => {
            error!("Failed to build HTTP client: {:?}", e);
            return;
        }
    };
    let popup = Popup::new(store.clone(), fetcher.clone());

    if let Some(seed) = &config.seed {
        let status = popup.import_seed(&seed.profile, &seed.resume).await;
        if status.is_error {
            warn!("{}", status.text);
        } else {
            info!("{}", status.text);
        }
    }

    info!("Loading page {}...", config.page);
    let html = match fetcher.fetch(&config.page).await {
        Ok(html) => html,
        Err(e) => {
            error!("Page load error: {:?}", e);
            return;
        }
    };
    let page = Page::parse(&html).shared();

    let script = ContentScript::new(
        page.clone(),
        store.clone(),
        Duration::from_millis(config.frame_interval_ms.max(1)),
    );
    let (tab, task) = script.start(&config.tab_url).await;

    if config.autofill_on_start {
        let profile = match popup.load().await {
            Ok(state) => state.profile,
            Err(e) => {
                warn!("Could not read stored profile: {:?}", e);
                Default::default()
            }
        };
        let status = popup.autofill_active_tab(&profile, Some(&tab)).await;
        info!("Popup status: {}", status.text);
    }

    // Let the first frame run before reporting.
    tokio::time::sleep(Duration::from_millis(config.frame_interval_ms.saturating_mul(2))).await;
    info!("📊 {}", console::page_summary(&page.borrow()));

    info!("Reading commands from stdin until Ctrl-C (type 'help')...");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;
    loop {
        tokio::select! {
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) if line.trim().is_empty() => {}
                Ok(Some(line)) => match console::parse_command(&line) {
                    Ok(command) => {
                        let status = console::handle_command(command, &popup, &tab, &page).await;
                        if status.is_error {
                            warn!("{}", status.text);
                        } else {
                            info!("{}", status.text);
                        }
                    }
                    Err(e) => warn!("{}", e),
                },
                Ok(None) => stdin_open = false,
                Err(e) => {
                    warn!("stdin error: {}", e);
                    stdin_open = false;
                }
            },
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    warn!("Ctrl-C handler failed: {}", e);
                }
                break;
            }
        }
    }

    drop(tab);
    if let Err(e) = task.await {
        warn!("Content script task failed: {:?}", e);
    }
}
