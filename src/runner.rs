// src/runner.rs
// Top-level pipeline. The crawl is strictly sequential: one character is
// fully fetched, extracted, and persisted before the next begins. A fetch
// failure (after retries) skips that character and keeps going; only startup
// errors abort the run. The index step is a separate single pass afterwards.

use std::error::Error;
use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use crate::core::net::{self, FetchPolicy};
use crate::extract::{meta, timeline, vocab};
use crate::params::{PAGE_TMPL, Params, SCRIPT_TMPL};
use crate::progress::Progress;
use crate::record;
use crate::{index, store};

/// Summary of what was produced.
pub struct RunSummary {
    pub scraped: usize,
    pub failed: Vec<String>,
    pub index_files: Vec<PathBuf>,
}

/// One listing entry: identifier plus optional glyph.
struct Listed {
    id: String,
    glyph: String,
}

pub fn run(
    params: &Params,
    mut progress: Option<&mut dyn Progress>,
) -> Result<RunSummary, Box<dyn Error>> {
    store::ensure_dirs(&params.out)?;
    crate::log::set_log_dir(&params.out);

    let mut summary = RunSummary { scraped: 0, failed: Vec::new(), index_files: Vec::new() };

    if !params.index_only {
        crawl(params, &mut progress, &mut summary)?;
    }

    if !params.skip_index {
        if let Some(p) = progress.as_deref_mut() {
            p.log("Rebuilding indexes…");
        }
        let corpus = store::load_corpus(&params.out)?;
        let idx = index::build(&corpus);
        summary.index_files = index::write(&params.out, &idx)?;
        logf!("Indexes rebuilt from {} records", corpus.len());
    }

    if let Some(p) = progress.as_deref_mut() {
        p.finish();
    }
    Ok(summary)
}

fn crawl(
    params: &Params,
    progress: &mut Option<&mut dyn Progress>,
    summary: &mut RunSummary,
) -> Result<(), Box<dyn Error>> {
    // Unreadable listing is the one fatal error of the crawl phase.
    let listing = read_listing(params)?;

    if let Some(p) = progress.as_deref_mut() {
        p.begin(listing.len());
        p.log("Fetching characters…");
    }

    let policy = FetchPolicy::default();

    for entry in &listing {
        match scrape_one(params, &policy, entry) {
            Ok(()) => {
                summary.scraped += 1;
                if let Some(p) = progress.as_deref_mut() {
                    p.item_done(&entry.id);
                }
                // politeness pause between successful iterations
                thread::sleep(Duration::from_millis(params.delay_ms));
            }
            Err(e) => {
                loge!("Skipping {}: {}", entry.id, e);
                summary.failed.push(entry.id.clone());
                if let Some(p) = progress.as_deref_mut() {
                    p.item_failed(&entry.id);
                }
            }
        }
    }

    store::write_failed(&params.out, &summary.failed)?;
    logf!("Crawl done: {} scraped, {} failed", summary.scraped, summary.failed.len());
    Ok(())
}

/// Fetch page + script, run the extractors, persist one record.
/// Errors here are per-character: the previous good record stays on disk.
fn scrape_one(params: &Params, policy: &FetchPolicy, entry: &Listed) -> Result<(), Box<dyn Error>> {
    let page_path = PAGE_TMPL.replace("{id}", &entry.id);
    let doc = net::fetch_with_policy(&page_path, policy)?;

    // The animation script is enrichment: a character without it still gets
    // a record, same as an unparseable script.
    let script_path = SCRIPT_TMPL.replace("{id}", &entry.id);
    let stroke_vectors = match net::fetch_with_policy(&script_path, policy) {
        Ok(script) => timeline::decode(&script),
        Err(e) => {
            logf!("No animation for {}: {}", entry.id, e);
            Vec::new()
        }
    };

    let rec = record::assemble(
        &entry.id,
        &entry.glyph,
        meta::extract(&doc),
        vocab::extract(&doc),
        stroke_vectors,
        vocab::exclusion_marker(&doc),
    );
    store::save_record(&params.out, &rec)?;
    logd!("Saved {} ({} vectors)", rec.id, rec.stroke_vectors.len());
    Ok(())
}

/// Listing file: one entry per line, `id<TAB>glyph`, glyph optional.
/// Blank lines and `#` comments are skipped; then --start/--ids/--limit.
fn read_listing(params: &Params) -> Result<Vec<Listed>, Box<dyn Error>> {
    let path = params
        .chars_file
        .as_ref()
        .ok_or("No character listing; pass --chars <file>")?;
    let text = fs::read_to_string(path)
        .map_err(|e| format!("Cannot read listing {:?}: {}", path, e))?;

    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        let mut parts = line.split_whitespace();
        let id = match parts.next() {
            Some(id) => s!(id),
            None => continue,
        };
        let glyph = parts.next().map(|g| s!(g)).unwrap_or_default();
        entries.push(Listed { id, glyph });
    }

    let mut entries: Vec<Listed> = entries.into_iter().skip(params.start).collect();
    if let Some(filter) = &params.ids_filter {
        entries.retain(|e| filter.contains(&e.id));
    }
    if let Some(limit) = params.limit {
        entries.truncate(limit);
    }
    Ok(entries)
}
