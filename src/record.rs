// src/record.rs
// The assembled per-character entity and its pieces. One record per
// character, created once per successful extraction pass, then immutable.
// Every field has a neutral default (empty string / empty vec / 0) so the
// serialized shape is stable for downstream consumers.

use serde::{Deserialize, Serialize};

use crate::extract::meta::MetaInfo;
use crate::extract::vocab::VocabLists;
use crate::params::{HOST, PAGE_TMPL};

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Anchor {
    pub x: f64,
    pub y: f64,
}

/// One reconstructed animation segment. Sorting a character's vectors by
/// `(stroke_number, segment)` reproduces stroke drawing order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StrokeVector {
    pub stroke_number: u32,
    /// 1-based within the stroke, contiguous.
    pub segment: u32,
    /// Absolute frame at which the segment appears.
    pub frame: u32,
    pub path_data: String,
    pub anchor: Anchor,
    pub color: String,
}

/// Dedup equality is by `word` text within one category list.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WordEntry {
    pub word: String,
    #[serde(default)]
    pub jyutping: String,
    #[serde(default)]
    pub pinyin: String,
    /// 1 or 2 for the staged primary lists, 0 for appendix categories.
    #[serde(default)]
    pub stage: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CharacterRecord {
    pub id: String,
    pub character: String,
    pub source_url: String,
    pub radical: String,
    pub stroke_count: u32,
    pub jyutping: String,
    pub pinyin: String,
    pub stroke_order_images: Vec<String>,
    pub stroke_vectors: Vec<StrokeVector>,
    #[serde(rename = "inLexicalListsHK")]
    pub in_lexical_lists_hk: bool,
    pub stage1_words: Vec<WordEntry>,
    pub stage2_words: Vec<WordEntry>,
    pub four_character_phrases: Vec<WordEntry>,
    pub classical_phrases: Vec<WordEntry>,
    pub multi_character_idioms: Vec<WordEntry>,
    pub proper_nouns: Vec<WordEntry>,
    pub transliterated_words: Vec<WordEntry>,
}

pub fn source_url(id: &str) -> String {
    join!("http://", HOST, &PAGE_TMPL.replace("{id}", id))
}

/// Merge the extractor outputs into one record. The exclusion marker
/// dominates: when present, the character is out of the lexical list even if
/// a primary word-list table was also found.
pub fn assemble(
    id: &str,
    glyph: &str,
    meta: MetaInfo,
    vocab: VocabLists,
    stroke_vectors: Vec<StrokeVector>,
    excluded: bool,
) -> CharacterRecord {
    let character = if glyph.is_empty() {
        meta.headword.clone().unwrap_or_default()
    } else {
        s!(glyph)
    };

    CharacterRecord {
        id: s!(id),
        character,
        source_url: source_url(id),
        radical: meta.radical.unwrap_or_default(),
        stroke_count: meta.stroke_count.unwrap_or(0),
        jyutping: meta.jyutping.unwrap_or_default(),
        pinyin: meta.pinyin.unwrap_or_default(),
        stroke_order_images: meta.stroke_images,
        stroke_vectors,
        in_lexical_lists_hk: !excluded && vocab.has_primary_table,
        stage1_words: vocab.stage1,
        stage2_words: vocab.stage2,
        four_character_phrases: vocab.four_character_phrases,
        classical_phrases: vocab.classical_phrases,
        multi_character_idioms: vocab.multi_character_idioms,
        proper_nouns: vocab.proper_nouns,
        transliterated_words: vocab.transliterated_words,
    }
}
