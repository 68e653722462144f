//! Input normalization rules for usernames and message text.
//!
//! Invalid input never produces an error: callers treat `None` as a
//! silent no-op.

/// Trims a username and truncates it to `max_chars` characters.
///
/// Returns `None` when the trimmed name is empty. Truncation counts
/// characters, not bytes, and always lands on a char boundary.
pub fn normalize_username(raw: &str, max_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    Some(truncate_chars(trimmed, max_chars).to_string())
}

/// Trims message text and enforces the length cap.
///
/// Returns `None` when the trimmed text is empty or exceeds `max_chars`
/// characters. Over-long text is rejected, never truncated.
pub fn normalize_text(raw: &str, max_chars: usize) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.chars().count() > max_chars {
        return None;
    }
    Some(trimmed.to_string())
}

fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
