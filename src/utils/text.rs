//! Text helpers for prompt building and model output cleanup

/// First `max_chars` characters of `s` (characters, not bytes).
pub fn truncate_chars(s: &str, max_chars: usize) -> &str {
    match s.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &s[..byte_idx],
        None => s,
    }
}

/// Remove markdown code fences (```json / ```) anywhere in a model response.
pub fn strip_code_fences(response: &str) -> String {
    let mut cleaned = String::with_capacity(response.len());
    let mut rest = response;

    while let Some(pos) = rest.find("```") {
        cleaned.push_str(&rest[..pos]);
        rest = &rest[pos + 3..];
        // Language tag directly after an opening fence
        let tag_len = rest
            .char_indices()
            .take_while(|(_, c)| c.is_ascii_alphanumeric())
            .count();
        if rest[..tag_len].eq_ignore_ascii_case("json") {
            rest = &rest[tag_len..];
        }
    }
    cleaned.push_str(rest);

    cleaned.trim().to_string()
}
