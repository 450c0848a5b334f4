// src/store.rs
// Output store layout:
//   <out>/characters/<id>.json   one record per character, write-once-on-success
//   <out>/index/*.json           full-rebuild index files
//   <out>/failed.log             identifiers skipped by the last crawl
//
// Every file is serialized fully in memory, written to a temp path, then
// renamed over the target, so a failed pass never clobbers a good record.

use std::error::Error;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::params::{CHARS_SUBDIR, FAILED_LOG, INDEX_SUBDIR};
use crate::record::CharacterRecord;

pub fn chars_dir(out: &Path) -> PathBuf {
    out.join(CHARS_SUBDIR)
}

pub fn index_dir(out: &Path) -> PathBuf {
    out.join(INDEX_SUBDIR)
}

pub fn char_path(out: &Path, id: &str) -> PathBuf {
    chars_dir(out).join(join!(id, ".json"))
}

pub fn ensure_dirs(out: &Path) -> std::io::Result<()> {
    fs::create_dir_all(chars_dir(out))?;
    fs::create_dir_all(index_dir(out))
}

fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<(), Box<dyn Error>> {
    let mut body = serde_json::to_string_pretty(value)?;
    body.push('\n');

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, body)?;
    fs::rename(&tmp, path)?;
    Ok(())
}

/// Persist one character record. Only called after a fully successful
/// extraction pass.
pub fn save_record(out: &Path, rec: &CharacterRecord) -> Result<PathBuf, Box<dyn Error>> {
    let path = char_path(out, &rec.id);
    write_atomic(&path, rec)?;
    Ok(path)
}

pub fn load_record(path: &Path) -> Result<CharacterRecord, Box<dyn Error>> {
    load_json(path)
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, Box<dyn Error>> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Read every persisted record, sorted by identifier. Unreadable files are
/// logged and skipped; the index is built from what is good on disk.
pub fn load_corpus(out: &Path) -> Result<Vec<CharacterRecord>, Box<dyn Error>> {
    let dir = chars_dir(out);
    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(&dir)? {
        let path = entry?.path();
        if !path.is_file() { continue; }
        if path.extension().and_then(|s| s.to_str()) != Some("json") { continue; }
        paths.push(path);
    }
    paths.sort();

    let mut records = Vec::with_capacity(paths.len());
    for path in paths {
        match load_record(&path) {
            Ok(rec) => records.push(rec),
            Err(e) => loge!("Store: skipping unreadable record {:?}: {}", path, e),
        }
    }
    records.sort_by(|a, b| a.id.cmp(&b.id));
    Ok(records)
}

/// Whole-file overwrite of one index file; returns the path written.
pub fn save_index_file<T: Serialize>(out: &Path, name: &str, value: &T) -> Result<PathBuf, Box<dyn Error>> {
    let path = index_dir(out).join(name);
    write_atomic(&path, value)?;
    Ok(path)
}

/// Machine-readable list of identifiers the crawl had to skip.
pub fn write_failed(out: &Path, failed: &[String]) -> std::io::Result<()> {
    let path = out.join(FAILED_LOG);
    if failed.is_empty() {
        // nothing failed; drop any stale list
        let _ = fs::remove_file(&path);
        return Ok(());
    }
    let mut f = fs::File::create(&path)?;
    for id in failed {
        writeln!(f, "{id}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::CharacterRecord;

    fn tmp_out(name: &str) -> PathBuf {
        let mut p = std::env::temp_dir();
        p.push(format!("zici_store_{}", name));
        let _ = fs::remove_dir_all(&p);
        ensure_dirs(&p).unwrap();
        p
    }

    #[test]
    fn record_roundtrip_and_overwrite() {
        let out = tmp_out("roundtrip");
        let mut rec = CharacterRecord { id: s!("0001"), character: s!("水"), ..Default::default() };
        save_record(&out, &rec).unwrap();

        rec.stroke_count = 4;
        save_record(&out, &rec).unwrap();

        let corpus = load_corpus(&out).unwrap();
        assert_eq!(corpus.len(), 1);
        assert_eq!(corpus[0].stroke_count, 4);
        assert_eq!(corpus[0].character, "水");
    }

    #[test]
    fn corpus_is_sorted_by_id() {
        let out = tmp_out("sorted");
        for id in ["0300", "0001", "0150"] {
            let rec = CharacterRecord { id: s!(id), ..Default::default() };
            save_record(&out, &rec).unwrap();
        }
        let ids: Vec<String> = load_corpus(&out).unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["0001", "0150", "0300"]);
    }

    #[test]
    fn failed_log_written_and_cleared() {
        let out = tmp_out("failed");
        write_failed(&out, &[s!("0007"), s!("0008")]).unwrap();
        let text = fs::read_to_string(out.join(FAILED_LOG)).unwrap();
        assert_eq!(text, "0007\n0008\n");

        write_failed(&out, &[]).unwrap();
        assert!(!out.join(FAILED_LOG).exists());
    }
}
