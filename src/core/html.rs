// src/core/html.rs
// Low-level HTML string manipulation, deliberately naive but tailored to the
// lexical-list page structure (flat sibling tables, no nesting, inconsistent
// attribute quoting). Tag and attribute matching is ASCII case-insensitive.

use crate::core::sanitize::{normalize_entities, normalize_ws};

/// One table cell: the opening tag (lowercased, for class checks), the raw
/// inner HTML, and the cleaned text.
pub struct Cell {
    pub open_tag: String,
    pub raw: String,
    pub text: String,
    pub header: bool,
}

impl Cell {
    pub fn has_class(&self, class: &str) -> bool {
        // Tolerate class=word, class="word", class='word', multi-class lists.
        let needle = class.to_ascii_lowercase();
        match attr_value(&self.open_tag, "class") {
            Some(v) => v.split_whitespace().any(|c| c == needle),
            None => false,
        }
    }
}

/// Fast ASCII-only lowercasing for tag/attribute matching.
pub fn to_lower(s: &str) -> String {
    s.chars()
        .map(|c| if c.is_ascii() { c.to_ascii_lowercase() } else { c })
        .collect()
}

/// Next complete `<open>...</close>` block from `from` onwards,
/// case-insensitive. Returns byte offsets spanning the whole block.
pub fn next_tag_block_ci(s: &str, open_tag: &str, close_tag: &str, from: usize) -> Option<(usize, usize)> {
    let lc = to_lower(s);
    let open_lc = to_lower(open_tag);
    let close_lc = to_lower(close_tag);

    let start = lc.get(from..)?.find(&open_lc)? + from;
    let open_end = s[start..].find('>')? + start + 1;
    let end_rel = lc[open_end..].find(&close_lc)?;
    let end = open_end + end_rel + close_tag.len();
    Some((start, end))
}

/// All `<table>...</table>` blocks in document order.
pub fn table_blocks(doc: &str) -> Vec<&str> {
    blocks_of(doc, "<table", "</table>")
}

/// All `<tr>...</tr>` blocks inside one table block.
pub fn row_blocks(table: &str) -> Vec<&str> {
    blocks_of(table, "<tr", "</tr>")
}

fn blocks_of<'a>(s: &'a str, open: &str, close: &str) -> Vec<&'a str> {
    let mut out = Vec::new();
    let mut pos = 0usize;
    while let Some((b_s, b_e)) = next_tag_block_ci(s, open, close, pos) {
        out.push(&s[b_s..b_e]);
        pos = b_e;
    }
    out
}

/// All cells of a row, `<td>` and `<th>` interleaved in document order.
pub fn cells(row: &str) -> Vec<Cell> {
    let lc = to_lower(row);
    let mut out = Vec::new();
    let mut pos = 0usize;

    loop {
        let td = lc[pos..].find("<td").map(|i| i + pos);
        let th = lc[pos..].find("<th").map(|i| i + pos);
        let (start, close_tag, header) = match (td, th) {
            (Some(a), Some(b)) if a < b => (a, "</td>", false),
            (Some(_), Some(b)) => (b, "</th>", true),
            (Some(a), None) => (a, "</td>", false),
            (None, Some(b)) => (b, "</th>", true),
            (None, None) => break,
        };
        let Some((c_s, c_e)) = next_tag_block_ci(row, &row[start..start + 3], close_tag, start) else { break };
        let block = &row[c_s..c_e];
        let open_end = match block.find('>') {
            Some(i) => i,
            None => break,
        };
        let raw = inner_after_open_tag(block);
        out.push(Cell {
            open_tag: to_lower(&block[..open_end + 1]),
            text: strip_tags(normalize_entities(&raw)),
            raw,
            header,
        });
        pos = c_e;
    }
    out
}

/// Given a complete tag block like `<td ...>INNER</td>`, return INNER
/// (may still contain nested tags).
pub fn inner_after_open_tag(block: &str) -> String {
    if let Some(open_end) = block.find('>') {
        if let Some(close_start) = block.rfind('<') {
            if close_start > open_end {
                return block[open_end + 1..close_start].to_string();
            }
        }
    }
    String::new()
}

/// First block of `tag` carrying `class`, as cleaned text.
pub fn classed_text(doc: &str, tag: &str, class: &str) -> Option<String> {
    let open = join!("<", tag);
    let close = join!("</", tag, ">");
    let mut pos = 0usize;
    while let Some((b_s, b_e)) = next_tag_block_ci(doc, &open, &close, pos) {
        let block = &doc[b_s..b_e];
        let open_end = block.find('>')?;
        let open_tag = to_lower(&block[..open_end + 1]);
        let classed = attr_value(&open_tag, "class")
            .map(|v| v.split_whitespace().any(|c| c == class))
            .unwrap_or(false);
        if classed {
            let txt = strip_tags(normalize_entities(&inner_after_open_tag(block)));
            if !txt.is_empty() {
                return Some(txt);
            }
        }
        pos = b_e;
    }
    None
}

/// Pull an attribute value out of a (lowercased) opening tag. Accepts
/// double-quoted, single-quoted, and bare values. The attribute name must
/// start at a word boundary so `subclass=` never reads as `class=`.
pub fn attr_value(open_tag: &str, attr: &str) -> Option<String> {
    let key = join!(attr, "=");
    let mut search = 0usize;
    let at = loop {
        let i = open_tag[search..].find(&key)? + search;
        let preceded_ok = open_tag[..i]
            .chars()
            .next_back()
            .map(|c| c.is_whitespace())
            .unwrap_or(false);
        if preceded_ok {
            break i + key.len();
        }
        search = i + key.len();
    };
    let rest = &open_tag[at..];
    let (val, _) = match rest.chars().next()? {
        '"' => {
            let end = rest[1..].find('"')?;
            (&rest[1..1 + end], ())
        }
        '\'' => {
            let end = rest[1..].find('\'')?;
            (&rest[1..1 + end], ())
        }
        _ => {
            let end = rest.find(|c: char| c == ' ' || c == '>').unwrap_or(rest.len());
            (&rest[..end], ())
        }
    };
    Some(val.trim().to_string())
}

/// Split raw inner HTML on `<br>` variants; each piece is stripped and
/// normalized, empties dropped. One cell may hold several entries.
pub fn split_br(raw: &str) -> Vec<String> {
    let lc = to_lower(raw);
    let mut pieces = Vec::new();
    let mut last = 0usize;
    let mut pos = 0usize;
    while let Some(i) = lc[pos..].find("<br") {
        let at = pos + i;
        let tag_end = match raw[at..].find('>') {
            Some(e) => at + e + 1,
            None => break,
        };
        pieces.push(&raw[last..at]);
        last = tag_end;
        pos = tag_end;
    }
    pieces.push(&raw[last..]);

    pieces
        .into_iter()
        .map(|p| strip_tags(normalize_entities(p)))
        .filter(|p| !p.is_empty())
        .collect()
}

/// Remove all HTML tags `<...>` from the string, then collapse whitespace.
pub fn strip_tags(s: String) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    normalize_ws(&out)
}
