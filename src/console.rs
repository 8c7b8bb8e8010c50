// Console commands: drive the popup and the host page from stdin
use crate::dom::{Page, SharedPage};
use crate::extension::{Popup, TabHandle};
use crate::filter::{CardLocator, HIDE_CLASS};
use crate::model::{CommandError, Profile, StatusMessage};
use scraper::Selector;
use tracing::{info, warn};

const HELP: &str = "Available commands:\n\
    toggle on|off — enable or disable card filtering\n\
    save <profile json> — save the autofill profile\n\
    autofill — autofill the active tab with the saved profile\n\
    import <profile> <resume> — load the profile from seed files\n\
    append <selector> <html> — add markup to the page\n\
    remove <selector> — remove the first matching element\n\
    inspect <selector> — show value, classes and events of an element\n\
    status — card and style summary\n\
    help — this list";

#[derive(Debug, Clone, PartialEq)]
pub enum ConsoleCommand {
    Toggle(bool),
    Save(Profile),
    Autofill,
    Import { profile: String, resume: String },
    Append { target: String, html: String },
    Remove(String),
    Inspect(String),
    Status,
    Help,
}

/// Parses one input line. The first word is the command, the rest its argument.
pub fn parse_command(line: &str) -> Result<ConsoleCommand, CommandError> {
    let line = line.trim();
    let (name, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();

    match name {
        "toggle" => match rest {
            "on" => Ok(ConsoleCommand::Toggle(true)),
            "off" => Ok(ConsoleCommand::Toggle(false)),
            _ => Err(CommandError::Usage("toggle on|off")),
        },
        "save" if !rest.is_empty() => Ok(ConsoleCommand::Save(serde_json::from_str(rest)?)),
        "save" => Err(CommandError::Usage("save <profile json>")),
        "autofill" => Ok(ConsoleCommand::Autofill),
        "import" => match rest.split_whitespace().collect::<Vec<_>>().as_slice() {
            [profile, resume] => Ok(ConsoleCommand::Import {
                profile: profile.to_string(),
                resume: resume.to_string(),
            }),
            _ => Err(CommandError::Usage("import <profile> <resume>")),
        },
        "append" => match rest.split_once(char::is_whitespace) {
            Some((target, html)) if !html.trim().is_empty() => Ok(ConsoleCommand::Append {
                target: target.to_string(),
                html: html.trim().to_string(),
            }),
            _ => Err(CommandError::Usage("append <selector> <html>")),
        },
        "remove" if !rest.is_empty() => Ok(ConsoleCommand::Remove(rest.to_string())),
        "remove" => Err(CommandError::Usage("remove <selector>")),
        "inspect" if !rest.is_empty() => Ok(ConsoleCommand::Inspect(rest.to_string())),
        "inspect" => Err(CommandError::Usage("inspect <selector>")),
        "status" => Ok(ConsoleCommand::Status),
        "help" => Ok(ConsoleCommand::Help),
        other => Err(CommandError::Unknown(other.to_string())),
    }
}

/// Runs a parsed command against the popup, the active tab and its page.
pub async fn handle_command(
    command: ConsoleCommand,
    popup: &Popup,
    tab: &TabHandle,
    page: &SharedPage,
) -> StatusMessage {
    info!("Handling command: {:?}", command);
    match command {
        ConsoleCommand::Toggle(enabled) => match popup.toggle_filter(enabled).await {
            Ok(()) if enabled => StatusMessage::info("Filter enabled."),
            Ok(()) => StatusMessage::info("Filter disabled."),
            Err(e) => {
                warn!("toggle error: {:?}", e);
                StatusMessage::error("Could not save setting.")
            }
        },
        ConsoleCommand::Save(profile) => popup.save_profile(&profile).await,
        ConsoleCommand::Autofill => match popup.load().await {
            Ok(state) => popup.autofill_active_tab(&state.profile, Some(tab)).await,
            Err(e) => {
                warn!("autofill profile read error: {:?}", e);
                StatusMessage::error("Autofill failed.")
            }
        },
        ConsoleCommand::Import { profile, resume } => popup.import_seed(&profile, &resume).await,
        ConsoleCommand::Append { target, html } => match page.borrow_mut().append_html(&target, &html) {
            Ok(added) => StatusMessage::info(format!("Added {} node(s) to {}.", added, target)),
            Err(e) => StatusMessage::error(e.to_string()),
        },
        ConsoleCommand::Remove(target) => {
            let mut page = page.borrow_mut();
            match first_match(&page, &target) {
                Ok(id) => {
                    if page.remove_element(id) {
                        StatusMessage::info(format!("Removed {}.", target))
                    } else {
                        StatusMessage::error(format!("Cannot remove {}.", target))
                    }
                }
                Err(message) => message,
            }
        }
        ConsoleCommand::Inspect(target) => {
            let page = page.borrow();
            match first_match(&page, &target) {
                Ok(id) => StatusMessage::info(format!(
                    "value={:?} classes={:?} events={:?} focused={}",
                    page.value(id),
                    page.class_list(id),
                    page.events(id).iter().map(|e| e.kind).collect::<Vec<_>>(),
                    page.focused() == Some(id)
                )),
                Err(message) => message,
            }
        }
        ConsoleCommand::Status => StatusMessage::info(page_summary(&page.borrow())),
        ConsoleCommand::Help => StatusMessage::info(HELP),
    }
}

/// One-line overview of the filter state of the page.
pub fn page_summary(page: &Page) -> String {
    let cards = CardLocator::new().locate_cards(page);
    let hidden = cards.iter().filter(|&&c| page.has_class(c, HIDE_CLASS)).count();
    format!(
        "{} job cards, {} hidden, {} injected style(s)",
        cards.len(),
        hidden,
        page.injected_styles().count()
    )
}

fn first_match(page: &Page, target: &str) -> Result<crate::dom::NodeId, StatusMessage> {
    let selector = Selector::parse(target)
        .map_err(|e| StatusMessage::error(format!("Invalid selector {}: {}", target, e)))?;
    page.select(&selector)
        .into_iter()
        .next()
        .ok_or_else(|| StatusMessage::error(format!("No element matches {}", target)))
}
