//! Text helpers

/// Truncate `input` to at most `max_chars` Unicode scalar values.
///
/// Never splits a character; returns the input unchanged when it already fits.
pub fn truncate_chars(input: &str, max_chars: usize) -> String {
    match input.char_indices().nth(max_chars) {
        Some((byte_index, _)) => input[..byte_index].to_string(),
        None => input.to_string(),
    }
}

/// Drop NUL characters, which Postgres `TEXT` cannot hold, then truncate.
pub fn clean_text(input: &str, max_chars: usize) -> String {
    if input.contains('\0') {
        truncate_chars(&input.replace('\0', ""), max_chars)
    } else {
        truncate_chars(input, max_chars)
    }
}

/// True when nothing but whitespace and NULs remain
pub fn is_blank(input: &str) -> bool {
    input.chars().all(|c| c.is_whitespace() || c == '\0')
}
