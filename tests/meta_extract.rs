// tests/meta_extract.rs
use zici_scrape::extract::meta;

#[test]
fn radical_and_strokes_from_label_table() {
    // label row, then values in the same columns of the following row
    let doc = r#"
        <table>
          <tr><td>部首</td><td>總筆畫</td></tr>
          <tr><td>水</td><td>4</td></tr>
        </table>"#;
    let m = meta::extract(doc);
    assert_eq!(m.radical.as_deref(), Some("水"));
    assert_eq!(m.stroke_count, Some(4));
}

#[test]
fn label_lookup_reads_correct_column() {
    let doc = r#"
        <table>
          <tr><td>編號</td><td>部首</td><td>總筆畫</td></tr>
          <tr><td>1234</td><td>火</td><td>8</td></tr>
        </table>"#;
    let m = meta::extract(doc);
    assert_eq!(m.radical.as_deref(), Some("火"));
    assert_eq!(m.stroke_count, Some(8));
}

#[test]
fn free_text_fallback_when_no_table() {
    let doc = "<p>部首：木 總筆畫：12</p>";
    let m = meta::extract(doc);
    assert_eq!(m.radical.as_deref(), Some("木"));
    assert_eq!(m.stroke_count, Some(12));
}

#[test]
fn missing_fields_are_simply_omitted() {
    let m = meta::extract("<p>nothing of interest</p>");
    assert_eq!(m.radical, None);
    assert_eq!(m.stroke_count, None);
    assert_eq!(m.jyutping, None);
    assert_eq!(m.pinyin, None);
    assert!(m.stroke_images.is_empty());
}

#[test]
fn pronunciations_prefer_styled_elements() {
    let doc = r#"
        <span class="jyutping">seoi2</span>
        <span class="pinyin">shuǐ</span>
        <p>unrelated seoi5 tokens</p>"#;
    let m = meta::extract(doc);
    assert_eq!(m.jyutping.as_deref(), Some("seoi2"));
    assert_eq!(m.pinyin.as_deref(), Some("shuǐ"));
}

#[test]
fn pronunciations_fall_back_to_syllable_scan() {
    // no styled elements: romanization A is ASCII + tone digit, B bears
    // diacritics; the scans must not pick up each other's syllables
    let doc = "<p>粵音 sam1 seoi2 拼音 shān shuǐ 完</p>";
    let m = meta::extract(doc);
    assert_eq!(m.jyutping.as_deref(), Some("sam1 seoi2"));
    assert_eq!(m.pinyin.as_deref(), Some("shān shuǐ"));
}

#[test]
fn stroke_order_images_collected() {
    let doc = r#"
        <img src="/img/logo.png">
        <img src="/img/strokeorder/0123_1.png">
        <img src='/img/strokeorder/0123_2.png'>"#;
    let m = meta::extract(doc);
    assert_eq!(
        m.stroke_images,
        vec!["/img/strokeorder/0123_1.png", "/img/strokeorder/0123_2.png"]
    );
}

#[test]
fn headword_span_found() {
    let doc = r#"<span class="headword">水</span>"#;
    assert_eq!(meta::extract(doc).headword.as_deref(), Some("水"));
}
