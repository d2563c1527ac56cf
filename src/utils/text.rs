/// First `max_chars` characters of `s` with a trailing ellipsis when
/// anything was cut. Char-boundary safe.
#[must_use]
pub fn excerpt(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", s[..idx].trim_end()),
        None => s.to_string(),
    }
}
