// src/index.rs
// Index Builder: pure, deterministic, full-rebuild projections of the whole
// persisted corpus. No incremental path; every run recomputes everything
// from the records on disk and overwrites the index files.

use std::collections::BTreeMap;
use std::collections::HashSet;
use std::error::Error;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::record::CharacterRecord;
use crate::store;

/// Grouped-by-stroke-count keys run 1..=32.
pub const MAX_STROKES: u32 = 32;

/// Kangxi radical → stroke count, used only for ordering the radical index.
/// Radicals missing from the table sort after all known ones.
const RADICAL_STROKES: &[(&str, u32)] = &[
    ("一", 1), ("丨", 1), ("丶", 1), ("丿", 1), ("乙", 1), ("亅", 1),
    ("二", 2), ("亠", 2), ("人", 2), ("儿", 2), ("入", 2), ("八", 2),
    ("冂", 2), ("冖", 2), ("冫", 2), ("几", 2), ("凵", 2), ("刀", 2),
    ("力", 2), ("勹", 2), ("匕", 2), ("匚", 2), ("匸", 2), ("十", 2),
    ("卜", 2), ("卩", 2), ("厂", 2), ("厶", 2), ("又", 2),
    ("口", 3), ("囗", 3), ("土", 3), ("士", 3), ("夂", 3), ("夊", 3),
    ("夕", 3), ("大", 3), ("女", 3), ("子", 3), ("宀", 3), ("寸", 3),
    ("小", 3), ("尢", 3), ("尸", 3), ("屮", 3), ("山", 3), ("巛", 3),
    ("工", 3), ("己", 3), ("巾", 3), ("干", 3), ("幺", 3), ("广", 3),
    ("廴", 3), ("廾", 3), ("弋", 3), ("弓", 3), ("彐", 3), ("彡", 3),
    ("彳", 3),
    ("心", 4), ("戈", 4), ("戶", 4), ("手", 4), ("支", 4), ("攴", 4),
    ("文", 4), ("斗", 4), ("斤", 4), ("方", 4), ("无", 4), ("日", 4),
    ("曰", 4), ("月", 4), ("木", 4), ("欠", 4), ("止", 4), ("歹", 4),
    ("殳", 4), ("毋", 4), ("比", 4), ("毛", 4), ("氏", 4), ("气", 4),
    ("水", 4), ("火", 4), ("爪", 4), ("父", 4), ("爻", 4), ("爿", 4),
    ("片", 4), ("牙", 4), ("牛", 4), ("犬", 4),
    ("玄", 5), ("玉", 5), ("瓜", 5), ("瓦", 5), ("甘", 5), ("生", 5),
    ("用", 5), ("田", 5), ("疋", 5), ("疒", 5), ("癶", 5), ("白", 5),
    ("皮", 5), ("皿", 5), ("目", 5), ("矛", 5), ("矢", 5), ("石", 5),
    ("示", 5), ("禸", 5), ("禾", 5), ("穴", 5), ("立", 5),
    ("竹", 6), ("米", 6), ("糸", 6), ("缶", 6), ("网", 6), ("羊", 6),
    ("羽", 6), ("老", 6), ("而", 6), ("耒", 6), ("耳", 6), ("聿", 6),
    ("肉", 6), ("臣", 6), ("自", 6), ("至", 6), ("臼", 6), ("舌", 6),
    ("舛", 6), ("舟", 6), ("艮", 6), ("色", 6), ("艸", 6), ("虍", 6),
    ("虫", 6), ("血", 6), ("行", 6), ("衣", 6), ("襾", 6),
    ("見", 7), ("角", 7), ("言", 7), ("谷", 7), ("豆", 7), ("豕", 7),
    ("豸", 7), ("貝", 7), ("赤", 7), ("走", 7), ("足", 7), ("身", 7),
    ("車", 7), ("辛", 7), ("辰", 7), ("辵", 7), ("邑", 7), ("酉", 7),
    ("釆", 7), ("里", 7),
    ("金", 8), ("長", 8), ("門", 8), ("阜", 8), ("隶", 8), ("隹", 8),
    ("雨", 8), ("靑", 8), ("非", 8),
    ("面", 9), ("革", 9), ("韋", 9), ("韭", 9), ("音", 9), ("頁", 9),
    ("風", 9), ("飛", 9), ("食", 9), ("首", 9), ("香", 9),
    ("馬", 10), ("骨", 10), ("高", 10), ("髟", 10), ("鬥", 10),
    ("鬯", 10), ("鬲", 10), ("鬼", 10),
    ("魚", 11), ("鳥", 11), ("鹵", 11), ("鹿", 11), ("麥", 11), ("麻", 11),
    ("黃", 12), ("黍", 12), ("黑", 12), ("黹", 12),
    ("黽", 13), ("鼎", 13), ("鼓", 13), ("鼠", 13),
    ("鼻", 14), ("齊", 14),
    ("齒", 15),
    ("龍", 16), ("龜", 16),
    ("龠", 17),
];

pub fn radical_strokes(radical: &str) -> Option<u32> {
    RADICAL_STROKES.iter().find(|(r, _)| *r == radical).map(|(_, n)| *n)
}

/// Flat per-character projection used by every index file.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IndexEntry {
    pub id: String,
    pub character: String,
    pub radical: String,
    pub stroke_count: u32,
    pub jyutping: String,
    pub pinyin: String,
    #[serde(rename = "inLexicalListsHK")]
    pub in_lexical_lists_hk: bool,
}

impl From<&CharacterRecord> for IndexEntry {
    fn from(r: &CharacterRecord) -> Self {
        Self {
            id: r.id.clone(),
            character: r.character.clone(),
            radical: r.radical.clone(),
            stroke_count: r.stroke_count,
            jyutping: r.jyutping.clone(),
            pinyin: r.pinyin.clone(),
            in_lexical_lists_hk: r.in_lexical_lists_hk,
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct StrokeGroup {
    pub strokes: u32,
    pub characters: Vec<IndexEntry>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RadicalGroup {
    pub radical: String,
    pub radical_strokes: u32,
    pub characters: Vec<IndexEntry>,
}

/// A staged word with a back-reference to the character it was listed under.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StagedWord {
    pub word: String,
    pub jyutping: String,
    pub pinyin: String,
    pub stage: u32,
    pub character: String,
    pub character_id: String,
}

#[derive(Clone, Debug, Serialize)]
pub struct StageGroup {
    pub stage: u32,
    pub words: Vec<StagedWord>,
}

#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub total_characters: usize,
    #[serde(rename = "inLexicalListsHK")]
    pub in_lexical_lists_hk: usize,
    /// stroke count → number of characters; zero-stroke records excluded
    pub stroke_histogram: BTreeMap<u32, usize>,
    /// radical stroke count → number of characters with a known radical
    pub radical_stroke_histogram: BTreeMap<u32, usize>,
}

pub struct CorpusIndex {
    pub all: Vec<IndexEntry>,
    pub lexical: Vec<IndexEntry>,
    pub strokes: Vec<StrokeGroup>,
    pub radicals: Vec<RadicalGroup>,
    pub stages: Vec<StageGroup>,
    pub summary: Summary,
}

/// Build every projection from the full corpus. Pure function: the same
/// records always produce the same index, byte for byte.
pub fn build(records: &[CharacterRecord]) -> CorpusIndex {
    let mut sorted: Vec<&CharacterRecord> = records.iter().collect();
    sorted.sort_by(|a, b| a.id.cmp(&b.id));

    let all: Vec<IndexEntry> = sorted.iter().map(|r| IndexEntry::from(*r)).collect();
    let lexical: Vec<IndexEntry> =
        all.iter().filter(|e| e.in_lexical_lists_hk).cloned().collect();

    let strokes = (1..=MAX_STROKES)
        .map(|n| StrokeGroup {
            strokes: n,
            characters: all.iter().filter(|e| e.stroke_count == n).cloned().collect(),
        })
        .collect();

    let radicals = radical_groups(&all);
    let stages = vec![stage_group(&sorted, 1), stage_group(&sorted, 2)];

    let mut stroke_histogram = BTreeMap::new();
    for e in all.iter().filter(|e| e.stroke_count > 0) {
        *stroke_histogram.entry(e.stroke_count).or_insert(0) += 1;
    }
    let mut radical_stroke_histogram = BTreeMap::new();
    for e in &all {
        if let Some(n) = radical_strokes(&e.radical) {
            *radical_stroke_histogram.entry(n).or_insert(0) += 1;
        }
    }

    let summary = Summary {
        total_characters: all.len(),
        in_lexical_lists_hk: lexical.len(),
        stroke_histogram,
        radical_stroke_histogram,
    };

    CorpusIndex { all, lexical, strokes, radicals, stages, summary }
}

/// Radicals ordered by the fixed stroke table, then lexicographically;
/// unknown radicals last. Characters without a radical are not grouped.
fn radical_groups(all: &[IndexEntry]) -> Vec<RadicalGroup> {
    let mut radicals: Vec<String> = all
        .iter()
        .filter(|e| !e.radical.is_empty())
        .map(|e| e.radical.clone())
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    radicals.sort_by(|a, b| {
        let ka = radical_strokes(a).unwrap_or(u32::MAX);
        let kb = radical_strokes(b).unwrap_or(u32::MAX);
        ka.cmp(&kb).then_with(|| a.cmp(b))
    });

    radicals
        .into_iter()
        .map(|radical| RadicalGroup {
            radical_strokes: radical_strokes(&radical).unwrap_or(0),
            characters: all.iter().filter(|e| e.radical == radical).cloned().collect(),
            radical,
        })
        .collect()
}

/// Union of every record's staged word list, deduplicated by word text
/// across the whole corpus (not per character), first-seen order with
/// records visited in id order.
fn stage_group(sorted: &[&CharacterRecord], stage: u32) -> StageGroup {
    let mut seen: HashSet<String> = HashSet::new();
    let mut words = Vec::new();

    for rec in sorted {
        let list = if stage == 1 { &rec.stage1_words } else { &rec.stage2_words };
        for w in list {
            if !seen.insert(w.word.clone()) { continue; }
            words.push(StagedWord {
                word: w.word.clone(),
                jyutping: w.jyutping.clone(),
                pinyin: w.pinyin.clone(),
                stage,
                character: rec.character.clone(),
                character_id: rec.id.clone(),
            });
        }
    }
    StageGroup { stage, words }
}

/// Write all six index files as whole-file overwrites.
pub fn write(out: &Path, idx: &CorpusIndex) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    Ok(vec![
        store::save_index_file(out, "all.json", &idx.all)?,
        store::save_index_file(out, "lexical-lists-hk.json", &idx.lexical)?,
        store::save_index_file(out, "strokes.json", &idx.strokes)?,
        store::save_index_file(out, "radical.json", &idx.radicals)?,
        store::save_index_file(out, "stage.json", &idx.stages)?,
        store::save_index_file(out, "summary.json", &idx.summary)?,
    ])
}
