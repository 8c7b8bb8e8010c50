// Text normalization and keyword classification for job-card labels

pub const EASY_APPLY_KEYWORDS: &[&str] = &["easy apply", "easy-apply", "easyapply"];
pub const PROMOTED_KEYWORDS: &[&str] = &["promoted"];
pub const REPOSTED_KEYWORDS: &[&str] = &["reposted"];

/// Every keyword group that marks a card as blocked.
pub const BLOCKED_GROUPS: &[&[&str]] = &[EASY_APPLY_KEYWORDS, PROMOTED_KEYWORDS, REPOSTED_KEYWORDS];

/// Collapses whitespace runs to a single space, trims and lowercases.
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// True if the normalized text contains any keyword.
pub fn matches_any(text: &str, keywords: &[&str]) -> bool {
    let value = normalize(text);
    keywords.iter().any(|keyword| value.contains(keyword))
}

/// True if the normalized text is exactly one of the keywords.
pub fn equals_any(text: &str, keywords: &[&str]) -> bool {
    let value = normalize(text);
    keywords.iter().any(|keyword| value == *keyword)
}

pub fn is_easy_apply_text(text: &str) -> bool {
    matches_any(text, EASY_APPLY_KEYWORDS)
}

pub fn is_promoted_text(text: &str) -> bool {
    matches_any(text, PROMOTED_KEYWORDS)
}

pub fn is_reposted_text(text: &str) -> bool {
    matches_any(text, REPOSTED_KEYWORDS)
}

/// Substring check against every blocked group.
pub fn is_blocked_label(text: &str) -> bool {
    is_easy_apply_text(text) || is_promoted_text(text) || is_reposted_text(text)
}

/// Exact check against every blocked keyword, used for leaf labels.
pub fn is_blocked_leaf_label(text: &str) -> bool {
    BLOCKED_GROUPS.iter().any(|group| equals_any(text, group))
}
