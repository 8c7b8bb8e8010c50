use crate::autofill::mapper::{derive_label, map_label_to_profile_field};
use crate::dom::selectors::compile;
use crate::dom::{EventKind, NodeId, Page};
use crate::model::Profile;
use scraper::Selector;
use std::collections::HashSet;
use tracing::{debug, info};

/// Application form wrappers on the jobs site.
pub const FORM_CONTAINER_SELECTORS: &[&str] = &[
    ".jobs-easy-apply-modal",
    ".jobs-easy-apply-content",
    "div[role=\"dialog\"]",
];

/// Text-like inputs; an input without a type is a text input.
pub const INPUT_SELECTORS: &[&str] = &[
    "input[type=\"text\"], input[type=\"email\"], input[type=\"tel\"], input[type=\"url\"], input[type=\"number\"], input:not([type]), textarea",
];

pub struct Autofiller {
    containers: Vec<Selector>,
    inputs: Vec<Selector>,
}

impl Autofiller {
    pub fn new() -> Self {
        Self {
            containers: compile(FORM_CONTAINER_SELECTORS),
            inputs: compile(INPUT_SELECTORS),
        }
    }

    /// Candidate inputs inside the form containers, or the whole document
    /// when no container is present. Each element appears once.
    pub fn collect_candidate_inputs(&self, page: &Page) -> Vec<NodeId> {
        let scopes: Vec<NodeId> = self
            .containers
            .iter()
            .flat_map(|selector| page.select(selector))
            .collect();

        let mut seen = HashSet::new();
        let mut found = Vec::new();
        let mut push = |id: NodeId| {
            if seen.insert(id) {
                found.push(id);
            }
        };

        if scopes.is_empty() {
            for selector in &self.inputs {
                page.select(selector).into_iter().for_each(&mut push);
            }
        } else {
            for &scope in &scopes {
                for selector in &self.inputs {
                    page.select_within(scope, selector).into_iter().for_each(&mut push);
                }
            }
        }

        found
    }

    /// Writes `value` into an empty, editable input and fires input, change
    /// and blur. Returns false without touching anything otherwise.
    pub fn fill(&self, page: &mut Page, input: NodeId, value: &str) -> bool {
        if value.is_empty() || page.element(input).is_none() {
            return false;
        }
        if page.has_attr(input, "disabled") || page.has_attr(input, "readonly") {
            return false;
        }
        if page
            .attr(input, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("hidden"))
        {
            return false;
        }
        if !page.value(input).trim().is_empty() {
            return false;
        }

        page.focus(input);
        page.set_value(input, value);
        for kind in [EventKind::Input, EventKind::Change, EventKind::Blur] {
            page.dispatch_event(input, kind);
        }
        true
    }

    /// One pass over the current candidate inputs. Returns how many were filled.
    pub fn run_autofill(&self, page: &mut Page, profile: &Profile) -> usize {
        let inputs = self.collect_candidate_inputs(page);
        let mut filled = 0;

        for input in inputs {
            let label = derive_label(page, input);
            let value = map_label_to_profile_field(&label, profile);
            if self.fill(page, input, &value) {
                debug!("✍️ [autofill] '{}' filled", label);
                filled += 1;
            }
        }

        info!("✅ [autofill] filled {} field(s)", filled);
        filled
    }
}

impl Default for Autofiller {
    fn default() -> Self {
        Self::new()
    }
}
