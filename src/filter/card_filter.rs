use crate::classifier::{is_blocked_label, is_blocked_leaf_label};
use crate::dom::selectors::compile;
use crate::dom::{NodeId, Page};
use scraper::Selector;
use tracing::debug;

pub const HIDE_CLASS: &str = "li-no-easy-apply-hidden";
pub const STYLE_ID: &str = "li-no-easy-apply-style";
pub const HIDE_CSS: &str = ".li-no-easy-apply-hidden { display: none !important; }";

const LABEL_SELECTORS: &[&str] = &["button, span, strong, div, p"];
const ARIA_SELECTORS: &[&str] = &["[aria-label]"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterReport {
    pub scanned: usize,
    pub hidden: usize,
    pub changed: usize,
}

pub struct CardFilter {
    labels: Vec<Selector>,
    aria: Vec<Selector>,
}

impl CardFilter {
    pub fn new() -> Self {
        Self {
            labels: compile(LABEL_SELECTORS),
            aria: compile(ARIA_SELECTORS),
        }
    }

    /// Injects the single hide rule into the page, once.
    pub fn ensure_style(page: &mut Page) -> bool {
        page.ensure_style(STYLE_ID, HIDE_CSS)
    }

    /// Whether the card carries any blocked label: anywhere in its text, as a
    /// leaf label element, or in a descendant aria-label.
    pub fn is_blocked(&self, page: &Page, card: NodeId) -> bool {
        if is_blocked_label(&page.text_content(card)) {
            return true;
        }

        for selector in &self.labels {
            for node in page.select_within(card, selector) {
                if is_blocked_leaf_label(&page.text_content(node)) {
                    return true;
                }
            }
        }

        for selector in &self.aria {
            for node in page.select_within(card, selector) {
                if is_blocked_label(page.attr(node, "aria-label").unwrap_or_default()) {
                    return true;
                }
            }
        }

        false
    }

    /// Sets or clears the hide marker on every card. Writing a state the card
    /// already has changes nothing.
    pub fn apply_filter(&self, page: &mut Page, cards: &[NodeId], enabled: bool) -> FilterReport {
        let mut report = FilterReport {
            scanned: cards.len(),
            ..Default::default()
        };

        for &card in cards {
            let hide = enabled && self.is_blocked(page, card);
            let changed = if hide {
                page.add_class(card, HIDE_CLASS)
            } else {
                page.remove_class(card, HIDE_CLASS)
            };
            if hide {
                report.hidden += 1;
            }
            if changed {
                report.changed += 1;
            }
        }

        debug!(
            "🧹 [filter] scanned={} hidden={} changed={}",
            report.scanned, report.hidden, report.changed
        );
        report
    }
}

impl Default for CardFilter {
    fn default() -> Self {
        Self::new()
    }
}
