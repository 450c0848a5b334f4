// src/core/sanitize.rs

/// Minimal entity decoding: the pages only ever emit this handful.
pub fn normalize_entities(s: &str) -> String {
    s.replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#12289;", "、")
}

/// Collapse whitespace runs into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// Character count, not byte count. Word-length bounds are in glyphs.
pub fn glyph_len(s: &str) -> usize {
    s.chars().filter(|c| !c.is_whitespace()).count()
}

/// True if the string contains at least one Han ideograph.
pub fn has_han(s: &str) -> bool {
    s.chars().any(|c| {
        let u = c as u32;
        (0x4E00..=0x9FFF).contains(&u) || (0x3400..=0x4DBF).contains(&u)
    })
}
