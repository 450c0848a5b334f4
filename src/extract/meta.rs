// src/extract/meta.rs
// Radical / stroke count / pronunciations. Best-effort enrichment: anything
// that cannot be located is simply None, never an error.

use std::sync::OnceLock;

use regex::Regex;

use crate::core::html;
use crate::core::sanitize::normalize_entities;
use crate::extract::rules::{self, JYUTPING, LabelRule, PINYIN, PronunciationRule, RADICAL, STROKE_COUNT};

/// Substring marking stroke-order still images among the page's `<img>` tags.
const STROKE_IMG_HINT: &str = "strokeorder";

#[derive(Clone, Debug, Default)]
pub struct MetaInfo {
    pub radical: Option<String>,
    pub stroke_count: Option<u32>,
    pub jyutping: Option<String>,
    pub pinyin: Option<String>,
    pub stroke_images: Vec<String>,
    /// The styled headword glyph, used when the input listing has no glyph.
    pub headword: Option<String>,
}

pub fn extract(doc: &str) -> MetaInfo {
    let page_text = html::strip_tags(normalize_entities(doc));

    let radical = labeled_value(doc, &RADICAL)
        .or_else(|| RADICAL.fallback(&page_text));

    let stroke_count = labeled_value(doc, &STROKE_COUNT)
        .or_else(|| STROKE_COUNT.fallback(&page_text))
        .and_then(|v| v.trim().parse::<u32>().ok());

    MetaInfo {
        radical,
        stroke_count,
        jyutping: pronunciation(doc, &page_text, &JYUTPING),
        pinyin: pronunciation(doc, &page_text, &PINYIN),
        stroke_images: stroke_images(doc),
        headword: html::classed_text(doc, "span", rules::CLASS_HEADWORD),
    }
}

/// Primary strategy: exact-match label cell, value from the same column of
/// the immediately following table row.
fn labeled_value(doc: &str, rule: &LabelRule) -> Option<String> {
    for table in html::table_blocks(doc) {
        let rows = html::row_blocks(table);
        for (ri, row) in rows.iter().enumerate() {
            let cs = html::cells(row);
            for (ci, cell) in cs.iter().enumerate() {
                if !rule.matches_label(&cell.text) { continue; }
                if let Some(next) = rows.get(ri + 1) {
                    if let Some(value) = html::cells(next).into_iter().nth(ci) {
                        if !value.text.is_empty() {
                            return Some(value.text);
                        }
                    }
                }
            }
        }
    }
    None
}

/// Layered: dedicated styled element first, permissive syllable scan second.
fn pronunciation(doc: &str, page_text: &str, rule: &PronunciationRule) -> Option<String> {
    if let Some(txt) = html::classed_text(doc, "span", rule.class_name) {
        return Some(txt);
    }
    rule.find_run(page_text)
}

fn img_src_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"(?i)<img[^>]+src\s*=\s*["']?([^"' >]+)"#).unwrap())
}

fn stroke_images(doc: &str) -> Vec<String> {
    img_src_re()
        .captures_iter(doc)
        .map(|c| c[1].to_string())
        .filter(|src| src.contains(STROKE_IMG_HINT))
        .collect()
}
