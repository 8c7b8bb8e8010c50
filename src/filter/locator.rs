// LinkedIn-specific job-card lookup
use crate::dom::selectors::compile;
use crate::dom::{NodeId, Page};
use scraper::Selector;
use std::collections::HashSet;

/// List-row containers, evaluated first so each row is counted once.
pub const ROW_SELECTORS: &[&str] = &[
    "li.jobs-search-results__list-item",
    "li.scaffold-layout__list-item",
    "ul.jobs-search__results-list > li",
];

/// Card containers that are only used when not wrapped by a matched row.
pub const STANDALONE_SELECTORS: &[&str] = &["div.job-card-container", "li.occludable-update"];

pub struct CardLocator {
    rows: Vec<Selector>,
    standalone: Vec<Selector>,
}

impl CardLocator {
    pub fn new() -> Self {
        Self::with_selectors(ROW_SELECTORS, STANDALONE_SELECTORS)
    }

    pub fn with_selectors(rows: &[&str], standalone: &[&str]) -> Self {
        Self {
            rows: compile(rows),
            standalone: compile(standalone),
        }
    }

    /// Current job cards in selector-evaluation order, each element at most once.
    pub fn locate_cards(&self, page: &Page) -> Vec<NodeId> {
        let mut cards = Vec::new();
        let mut seen = HashSet::new();

        for selector in &self.rows {
            for id in page.select(selector) {
                if seen.insert(id) {
                    cards.push(id);
                }
            }
        }
        let rows: HashSet<NodeId> = seen.clone();

        for selector in &self.standalone {
            for id in page.select(selector) {
                if rows.contains(&id) || page.ancestors(id).iter().any(|a| rows.contains(a)) {
                    continue;
                }
                if seen.insert(id) {
                    cards.push(id);
                }
            }
        }

        cards
    }
}

impl Default for CardLocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(page: &Page, css: &str) -> Vec<NodeId> {
        page.select(&Selector::parse(css).unwrap())
    }

    #[test]
    fn test_rows_are_found() {
        let page = Page::parse(
            r#"<ul class="jobs-search__results-list">
                 <li>first</li>
                 <li class="jobs-search-results__list-item">second</li>
               </ul>"#,
        );
        let cards = CardLocator::new().locate_cards(&page);
        assert_eq!(cards.len(), 2);
    }

    #[test]
    fn test_nested_standalone_not_double_counted() {
        let page = Page::parse(
            r#"<ul>
                 <li class="scaffold-layout__list-item">
                   <div class="job-card-container">wrapped</div>
                 </li>
               </ul>
               <div class="job-card-container" id="loose">standalone</div>"#,
        );
        let cards = CardLocator::new().locate_cards(&page);
        let row = ids(&page, "li.scaffold-layout__list-item")[0];
        let loose = ids(&page, "#loose")[0];
        assert_eq!(cards, vec![row, loose]);
    }

    #[test]
    fn test_row_matched_by_two_selectors_once() {
        let page = Page::parse(
            r#"<ul class="jobs-search__results-list">
                 <li class="jobs-search-results__list-item scaffold-layout__list-item occludable-update">x</li>
               </ul>"#,
        );
        let cards = CardLocator::new().locate_cards(&page);
        assert_eq!(cards.len(), 1);
    }

    #[test]
    fn test_missing_targets_yield_empty() {
        let page = Page::parse("<main><p>No results</p></main>");
        assert!(CardLocator::new().locate_cards(&page).is_empty());
    }

    #[test]
    fn test_rederived_after_mutation() {
        let mut page = Page::parse(r#"<ul class="jobs-search__results-list"><li>a</li></ul>"#);
        let locator = CardLocator::new();
        assert_eq!(locator.locate_cards(&page).len(), 1);

        page.append_html("ul.jobs-search__results-list", "<li>b</li><li>c</li>")
            .unwrap();
        assert_eq!(locator.locate_cards(&page).len(), 3);
    }
}
