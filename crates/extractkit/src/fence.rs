//! Markdown code-fence stripping for LLM output
//!
//! LLMs routinely wrap JSON answers in ```` ```json ```` fences even when
//! told not to. Fence stripping is idempotent: already-bare text passes
//! through unchanged.

/// Strip a leading ```` ```json ```` (or bare ```` ``` ````) fence and the
/// matching trailing fence, returning the trimmed inner text.
pub fn strip_code_fence(text: &str) -> &str {
    let trimmed = text.trim();

    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    // Drop an optional language tag on the fence line ("json", "JSON", ...)
    let rest = match rest.find('\n') {
        Some(idx) => {
            let tag = rest[..idx].trim();
            if tag.chars().all(|c| c.is_ascii_alphanumeric()) {
                &rest[idx + 1..]
            } else {
                // Not a fence tag line, keep it
                rest
            }
        }
        None => rest.trim_start_matches(|c: char| c.is_ascii_alphanumeric()),
    };

    let rest = rest.trim();
    rest.strip_suffix("```").map_or(rest, str::trim)
}
