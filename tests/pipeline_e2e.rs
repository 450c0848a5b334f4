// tests/pipeline_e2e.rs
// Full offline pass over captured-fixture-style inputs: extract → assemble →
// persist → index, with no network involved.

use std::fs;
use std::path::PathBuf;

use zici_scrape::extract::{meta, timeline, vocab};
use zici_scrape::{index, record, store};

fn tmp_out(name: &str) -> PathBuf {
    let mut p = std::env::temp_dir();
    p.push(format!("zici_e2e_{}", name));
    let _ = fs::remove_dir_all(&p);
    store::ensure_dirs(&p).unwrap();
    p
}

fn page() -> &'static str {
    r#"
    <html><body>
    <span class="headword">水</span>
    <table>
      <tr><td>部首</td><td>總筆畫</td></tr>
      <tr><td>水</td><td>4</td></tr>
    </table>
    <span class="jyutping">seoi2</span>
    <span class="pinyin">shuǐ</span>
    <img src="/img/strokeorder/0001_1.png">
    <table>
      <tr><td>香港小學學習字詞表</td></tr>
      <tr><td class="word">水果</td><td class="jyutping">seoi2 gwo2</td><td class="stage">1</td></tr>
    </table>
    </body></html>"#
}

fn script() -> String {
    let mut s = String::new();
    for (name, x) in [("shape_1", 5.0), ("shape_2", 6.0)] {
        s.push_str(&format!(
            "this.{n}.graphics.f(\"#333333\").s().p(\"AhZAkIBmhC\");\nthis.{n}.setTransform({x},1.5);\n",
            n = name,
            x = x,
        ));
    }
    s.push_str("this.label = new cjs.Text(\"1\", \"24px Arial\");\n");
    s.push_str("this.timeline.addTween(cjs.Tween.get(this.label).wait(24).to({text:\"2\"},0).wait(24));\n");
    s.push_str("this.timeline.addTween(cjs.Tween.get({}).to({state:[{t:this.shape_1}]},0).wait(1));\n");
    s.push_str("this.timeline.addTween(cjs.Tween.get({}).wait(24).to({state:[{t:this.shape_2}]},0).wait(1));\n");
    s
}

fn scrape_fixture(out: &PathBuf, id: &str, doc: &str, script: &str) -> record::CharacterRecord {
    let rec = record::assemble(
        id,
        "",
        meta::extract(doc),
        vocab::extract(doc),
        timeline::decode(script),
        vocab::exclusion_marker(doc),
    );
    store::save_record(out, &rec).unwrap();
    rec
}

#[test]
fn record_assembled_from_page_and_script() {
    let out = tmp_out("assemble");
    let rec = scrape_fixture(&out, "0001", page(), &script());

    assert_eq!(rec.character, "水"); // headword fallback, no glyph in listing
    assert_eq!(rec.radical, "水");
    assert_eq!(rec.stroke_count, 4);
    assert_eq!(rec.jyutping, "seoi2");
    assert_eq!(rec.pinyin, "shuǐ");
    assert_eq!(rec.stroke_order_images, vec!["/img/strokeorder/0001_1.png"]);
    assert!(rec.in_lexical_lists_hk);
    assert_eq!(rec.stage1_words.len(), 1);
    assert_eq!(rec.stroke_vectors.len(), 2);
    // labels at [0,24], blocks at [0,24]: direct match, drawing order
    assert_eq!(rec.stroke_vectors[0].stroke_number, 1);
    assert_eq!(rec.stroke_vectors[0].frame, 0);
    assert_eq!(rec.stroke_vectors[1].stroke_number, 2);
    assert_eq!(rec.stroke_vectors[1].frame, 24);
    assert!(rec.source_url.contains("0001"));
}

#[test]
fn excluded_character_still_persists() {
    let out = tmp_out("excluded");
    let doc = r#"
        <p>此字不屬於香港小學學習字詞表。</p>
        <table>
          <tr><td>附錄 香港小學學習字詞表 四字詞</td></tr>
          <tr><td class="word">似水流年</td><td class="jyutping">ci5 seoi2 lau4 nin4</td></tr>
        </table>"#;
    let rec = scrape_fixture(&out, "0002", doc, "");

    assert!(!rec.in_lexical_lists_hk);
    assert!(rec.stage1_words.is_empty());
    assert!(rec.stage2_words.is_empty());
    assert_eq!(rec.four_character_phrases.len(), 1);
    assert!(rec.stroke_vectors.is_empty());

    // record file exists despite exclusion and missing animation
    assert!(store::char_path(&out, "0002").exists());
}

#[test]
fn persisted_record_round_trips_through_json() {
    let out = tmp_out("roundtrip");
    let rec = scrape_fixture(&out, "0001", page(), &script());

    let loaded = store::load_record(&store::char_path(&out, "0001")).unwrap();
    assert_eq!(loaded, rec);

    // serialized field names are the published shape
    let json = fs::read_to_string(store::char_path(&out, "0001")).unwrap();
    for key in ["\"sourceUrl\"", "\"strokeCount\"", "\"inLexicalListsHK\"",
                "\"stage1Words\"", "\"strokeVectors\"", "\"pathData\""] {
        assert!(json.contains(key), "missing {key}");
    }
}

#[test]
fn corpus_indexes_built_from_store() {
    let out = tmp_out("index");
    scrape_fixture(&out, "0001", page(), &script());
    scrape_fixture(&out, "0002", "<p>此字不屬於香港小學學習字詞表。</p>", "");

    let corpus = store::load_corpus(&out).unwrap();
    let idx = index::build(&corpus);
    let files = index::write(&out, &idx).unwrap();
    assert_eq!(files.len(), 6);
    assert_eq!(idx.summary.total_characters, 2);
    assert_eq!(idx.summary.in_lexical_lists_hk, 1);
    assert_eq!(idx.stages[0].words[0].word, "水果");
    assert!(files.iter().all(|f| f.exists()));
}
