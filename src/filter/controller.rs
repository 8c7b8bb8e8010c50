use crate::dom::Page;
use crate::filter::{CardFilter, CardLocator, FilterReport};
use tracing::{debug, info};

/// Whether a filter pass is waiting for the next frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushState {
    Idle,
    PendingFlush,
}

/// Owns the enabled flag and coalesces triggers so that any number of them
/// between two frames produces a single filter pass.
pub struct FilterController {
    enabled: bool,
    state: FlushState,
    passes: u64,
    locator: CardLocator,
    filter: CardFilter,
}

impl FilterController {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            state: FlushState::Idle,
            passes: 0,
            locator: CardLocator::new(),
            filter: CardFilter::new(),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.state == FlushState::PendingFlush
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if self.enabled != enabled {
            info!("🔀 [filter] enabled = {}", enabled);
        }
        self.enabled = enabled;
        self.schedule();
    }

    pub fn notify_mutation(&mut self) {
        self.schedule();
    }

    /// Idle -> PendingFlush. Returns false if a pass was already pending.
    pub fn schedule(&mut self) -> bool {
        match self.state {
            FlushState::Idle => {
                self.state = FlushState::PendingFlush;
                true
            }
            FlushState::PendingFlush => false,
        }
    }

    /// Called once per frame. Runs exactly one pass if one is pending.
    pub fn on_frame(&mut self, page: &mut Page) -> Option<FilterReport> {
        if self.state == FlushState::Idle {
            return None;
        }
        self.state = FlushState::Idle;
        Some(self.run_pass(page))
    }

    /// Unconditional pass over the cards currently in the page.
    pub fn run_pass(&mut self, page: &mut Page) -> FilterReport {
        let cards = self.locator.locate_cards(page);
        let report = self.filter.apply_filter(page, &cards, self.enabled);
        self.passes += 1;
        debug!("[filter] pass #{} over {} cards", self.passes, report.scanned);
        report
    }
}
