use scraper::Selector;
use tracing::warn;

/// Compiles a selector list, dropping entries that fail to parse so that a
/// bad selector behaves like one that matches nothing.
pub fn compile(list: &[&str]) -> Vec<Selector> {
    list.iter()
        .filter_map(|raw| match Selector::parse(raw) {
            Ok(selector) => Some(selector),
            Err(e) => {
                warn!("⚠️ Skipping invalid selector {:?}: {}", raw, e);
                None
            }
        })
        .collect()
}
