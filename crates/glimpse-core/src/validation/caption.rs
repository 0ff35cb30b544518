use crate::constants::MAX_CAPTION_CHARS;

/// Trim a typed caption and cap it at [`MAX_CAPTION_CHARS`] characters.
///
/// Returns `None` when nothing is left, so an empty caption is stored as
/// "no caption".
pub fn normalize_caption(raw: &str) -> Option<String> {
    let capped: String = raw.trim().chars().take(MAX_CAPTION_CHARS).collect();
    let capped = capped.trim_end();
    if capped.is_empty() {
        None
    } else {
        Some(capped.to_string())
    }
}
