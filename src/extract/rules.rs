// src/extract/rules.rs
// Named heuristic rules shared by the extractors. One object per label /
// section / pronunciation system, so each fallback chain is testable on its
// own instead of living as inline regexes inside the extractors.

use std::sync::OnceLock;

use regex::Regex;

/* ---------- cell classes & markers ---------- */

pub const CLASS_WORD: &str = "word";
pub const CLASS_STAGE: &str = "stage";
pub const CLASS_JYUTPING: &str = "jyutping";
pub const CLASS_PINYIN: &str = "pinyin";
pub const CLASS_HEADWORD: &str = "headword";

/// Title of the primary word-list table.
pub const WORD_LIST_TITLE: &str = "香港小學學習字詞表";
/// Appendix tables mention the word-list title too; this marker tells them apart.
pub const APPENDIX_MARKER: &str = "附錄";
/// Explicit "this character is not in the lexical list" sentence.
pub const EXCLUSION_MARKER: &str = "不屬於香港小學學習字詞表";

/// Word-row sanity bounds, in glyphs (a "word" cell holding a whole sentence
/// is a layout row, not a word row).
pub const WORD_MIN_GLYPHS: usize = 1;
pub const WORD_MAX_GLYPHS: usize = 12;

/* ---------- labeled table cells ---------- */

/// Exact-match table label; value sits in the same column of the next row.
/// `fallback_src` is a whole-page regex used when the structured lookup
/// misses (capture group 1 is the value).
pub struct LabelRule {
    pub name: &'static str,
    pub label: &'static str,
    fallback_src: &'static str,
    fallback: OnceLock<Regex>,
}

impl LabelRule {
    const fn new(name: &'static str, label: &'static str, fallback_src: &'static str) -> Self {
        Self { name, label, fallback_src, fallback: OnceLock::new() }
    }

    pub fn matches_label(&self, cell_text: &str) -> bool {
        cell_text == self.label
    }

    /// Free-text fallback over the whole (tag-stripped) page.
    pub fn fallback(&self, page_text: &str) -> Option<String> {
        let re = self.fallback.get_or_init(|| Regex::new(self.fallback_src).unwrap());
        re.captures(page_text).map(|c| c[1].to_string())
    }
}

pub static RADICAL: LabelRule =
    LabelRule::new("radical", "部首", r"部首[:：]?\s*(\p{Han})");

pub static STROKE_COUNT: LabelRule =
    LabelRule::new("stroke_count", "總筆畫", r"總筆畫[:：]?\s*([0-9]{1,2})");

/* ---------- pronunciation systems ---------- */

/// One romanization system: a dedicated styled element first, then a
/// permissive syllable pattern over free text.
pub struct PronunciationRule {
    pub name: &'static str,
    /// class of the styled element carrying only the pronunciation
    pub class_name: &'static str,
    syllable_src: &'static str,
    syllable: OnceLock<Regex>,
}

impl PronunciationRule {
    const fn new(name: &'static str, class_name: &'static str, syllable_src: &'static str) -> Self {
        Self { name, class_name, syllable_src, syllable: OnceLock::new() }
    }

    fn re(&self) -> &Regex {
        self.syllable.get_or_init(|| Regex::new(self.syllable_src).unwrap())
    }

    /// Whole token is one syllable of this system.
    pub fn is_syllable(&self, token: &str) -> bool {
        self.re().find(token).map(|m| m.len() == token.len()).unwrap_or(false)
    }

    /// First syllable run in free text: consecutive matching tokens joined by
    /// single spaces ("sam1 seoi2", "shān shuǐ").
    pub fn find_run(&self, text: &str) -> Option<String> {
        let mut run: Vec<&str> = Vec::new();
        for token in text.split_whitespace() {
            if self.is_syllable(token) {
                run.push(token);
            } else if !run.is_empty() {
                break;
            }
        }
        if run.is_empty() { None } else { Some(run.join(" ")) }
    }
}

/// Romanization A: plain ASCII letters plus a tone digit (jyutping).
pub static JYUTPING: PronunciationRule =
    PronunciationRule::new("jyutping", CLASS_JYUTPING, r"^[a-z]{1,6}[1-6]$");

/// Romanization B: syllables bearing tone diacritics (pinyin). Distinguished
/// from A purely by character class: diacritic-bearing vowels vs ASCII+digit.
pub static PINYIN: PronunciationRule = PronunciationRule::new(
    "pinyin",
    CLASS_PINYIN,
    r"^[a-zA-ZüÜ]*[āáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜĀÁǍÀĒÉĚÈĪÍǏÌŌÓǑÒŪÚǓÙ][a-zA-ZüÜāáǎàēéěèīíǐìōóǒòūúǔùǖǘǚǜ]*$",
);

/* ---------- vocabulary sections ---------- */

/// One appendix vocabulary category. A table *starts* the section when its
/// text mentions the title together with either the appendix marker or the
/// word-list title (bare mentions inside other sections don't count); the
/// section then spans sibling tables until another category's title shows up.
pub struct SectionRule {
    pub name: &'static str,
    pub title: &'static str,
    /// true: rows carry word + pronunciation cells; false: raw word cells,
    /// possibly several entries per cell split on line breaks.
    pub pronounced: bool,
}

pub static FOUR_CHARACTER: SectionRule =
    SectionRule { name: "four_character_phrases", title: "四字詞", pronounced: true };
pub static CLASSICAL: SectionRule =
    SectionRule { name: "classical_phrases", title: "文言字詞", pronounced: true };
pub static IDIOMS: SectionRule =
    SectionRule { name: "multi_character_idioms", title: "多字熟語", pronounced: false };
pub static PROPER_NOUNS: SectionRule =
    SectionRule { name: "proper_nouns", title: "專名", pronounced: false };
pub static TRANSLITERATED: SectionRule =
    SectionRule { name: "transliterated_words", title: "外來詞", pronounced: false };

pub static SECTIONS: [&SectionRule; 5] =
    [&FOUR_CHARACTER, &CLASSICAL, &IDIOMS, &PROPER_NOUNS, &TRANSLITERATED];

impl SectionRule {
    /// Does `table_text` open this section?
    pub fn starts_in(&self, table_text: &str) -> bool {
        table_text.contains(self.title)
            && (table_text.contains(APPENDIX_MARKER) || table_text.contains(WORD_LIST_TITLE))
    }

    /// Does `table_text` belong to a *different* section's header?
    pub fn other_section_starts(&self, table_text: &str) -> bool {
        SECTIONS.iter().any(|s| s.name != self.name && s.starts_in(table_text))
    }
}

/// Primary word-list table: the title without the appendix marker.
pub fn is_primary_word_list(table_text: &str) -> bool {
    table_text.contains(WORD_LIST_TITLE) && !table_text.contains(APPENDIX_MARKER)
}
