// src/extract/vocab.rs
// Seven categorized word/phrase lists: the staged primary word list plus the
// five appendix categories. Section boundaries are only marked by free-text
// headers, and one section's content may span several sibling tables, so the
// walk is: find the table that *opens* a section, then keep consuming tables
// until a different section's header appears.

use std::collections::HashSet;

use crate::core::html::{self, Cell};
use crate::core::sanitize::{glyph_len, has_han, normalize_entities};
use crate::extract::rules::{
    self, CLASS_JYUTPING, CLASS_PINYIN, CLASS_STAGE, CLASS_WORD, SectionRule,
    WORD_MAX_GLYPHS, WORD_MIN_GLYPHS,
};
use crate::record::WordEntry;

#[derive(Clone, Debug, Default)]
pub struct VocabLists {
    pub stage1: Vec<WordEntry>,
    pub stage2: Vec<WordEntry>,
    pub four_character_phrases: Vec<WordEntry>,
    pub classical_phrases: Vec<WordEntry>,
    pub multi_character_idioms: Vec<WordEntry>,
    pub proper_nouns: Vec<WordEntry>,
    pub transliterated_words: Vec<WordEntry>,
    /// The primary word-list table was present on the page.
    pub has_primary_table: bool,
}

/// Explicit "not in the lexical list" sentence anywhere on the page.
pub fn exclusion_marker(doc: &str) -> bool {
    html::strip_tags(normalize_entities(doc)).contains(rules::EXCLUSION_MARKER)
}

pub fn extract(doc: &str) -> VocabLists {
    let tables = html::table_blocks(doc);
    let texts: Vec<String> = tables
        .iter()
        .map(|t| html::strip_tags(normalize_entities(t)))
        .collect();

    let mut out = VocabLists::default();

    // 1. Primary word list: title present, appendix marker absent.
    if let Some(pi) = texts.iter().position(|t| rules::is_primary_word_list(t)) {
        out.has_primary_table = true;
        for row in html::row_blocks(tables[pi]) {
            if let Some(entry) = word_row(&html::cells(row), true) {
                match entry.stage {
                    2 => out.stage2.push(entry),
                    _ => out.stage1.push(entry),
                }
            }
        }
        dedup(&mut out.stage1);
        dedup(&mut out.stage2);
    }

    // 2. Appendix categories.
    for rule in rules::SECTIONS {
        let words = section_words(&tables, &texts, rule);
        match rule.name {
            "four_character_phrases" => out.four_character_phrases = words,
            "classical_phrases" => out.classical_phrases = words,
            "multi_character_idioms" => out.multi_character_idioms = words,
            "proper_nouns" => out.proper_nouns = words,
            _ => out.transliterated_words = words,
        }
    }

    out
}

/// Walk the section's opening table and every sibling table after it, until
/// a table opening a *different* section. Missing section: empty list.
fn section_words(tables: &[&str], texts: &[String], rule: &SectionRule) -> Vec<WordEntry> {
    let Some(start) = texts.iter().position(|t| rule.starts_in(t)) else {
        return Vec::new();
    };

    let mut words = Vec::new();
    for idx in start..tables.len() {
        if idx > start && rule.other_section_starts(&texts[idx]) {
            break;
        }
        for row in html::row_blocks(tables[idx]) {
            let cs = html::cells(row);
            if rule.pronounced {
                if let Some(entry) = word_row(&cs, false) {
                    words.push(entry);
                }
            } else {
                raw_words(&cs, &mut words);
            }
        }
    }
    dedup(&mut words);
    words
}

/// A row qualifies as a word row only if it carries a classed word cell, is
/// not a header row, and the word length is within bounds.
fn word_row(cells: &[Cell], staged: bool) -> Option<WordEntry> {
    if cells.iter().any(|c| c.header) {
        return None;
    }
    let word = cells.iter().find(|c| c.has_class(CLASS_WORD))?;
    if !word_len_ok(&word.text) {
        return None;
    }

    let stage = if staged {
        cells
            .iter()
            .find(|c| c.has_class(CLASS_STAGE))
            .and_then(|c| c.text.trim().parse::<u32>().ok())
            .filter(|s| *s == 1 || *s == 2)
            .unwrap_or(1)
    } else {
        0
    };

    Some(WordEntry {
        word: word.text.clone(),
        jyutping: class_text(cells, CLASS_JYUTPING),
        pinyin: class_text(cells, CLASS_PINYIN),
        stage,
    })
}

/// Pronunciation-less mode: raw text from word cells only; one cell may hold
/// several entries separated by line breaks.
fn raw_words(cells: &[Cell], out: &mut Vec<WordEntry>) {
    for cell in cells.iter().filter(|c| !c.header && c.has_class(CLASS_WORD)) {
        for word in html::split_br(&cell.raw) {
            if word_len_ok(&word) && has_han(&word) {
                out.push(WordEntry { word, ..Default::default() });
            }
        }
    }
}

fn word_len_ok(word: &str) -> bool {
    let len = glyph_len(word);
    (WORD_MIN_GLYPHS..=WORD_MAX_GLYPHS).contains(&len)
}

fn class_text(cells: &[Cell], class: &str) -> String {
    cells
        .iter()
        .find(|c| c.has_class(class))
        .map(|c| c.text.clone())
        .unwrap_or_default()
}

/// Exact word text, first-seen order preserved.
fn dedup(list: &mut Vec<WordEntry>) {
    let mut seen = HashSet::new();
    list.retain(|e| seen.insert(e.word.clone()));
}
