// Job-card filtering: locate cards, classify them, toggle the hide marker.
pub mod card_filter;
pub mod controller;
pub mod locator;

pub use card_filter::{CardFilter, FilterReport, HIDE_CLASS};
pub use controller::FilterController;
pub use locator::CardLocator;
