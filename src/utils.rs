// Utility functions
use chrono::{Datelike, Utc};
use regex::Regex;
use std::sync::LazyLock;

static DIGIT_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9]+").expect("valid regex"));

/// Every standalone four-digit number in the text, in order of appearance.
pub fn four_digit_years(text: &str) -> Vec<i32> {
    DIGIT_RUN
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|digits| digits.len() == 4)
        .filter_map(|digits| digits.parse().ok())
        .collect()
}

pub fn current_year() -> i32 {
    Utc::now().year()
}
