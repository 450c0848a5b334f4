// src/extract/mod.rs
//! # Page extractors
//!
//! The extractors know how to read one character's page and its animation
//! script. Each one focuses on a single concern and encodes *where the ground
//! truth lives in the markup* and *how to read it tolerantly*:
//!
//! - `meta` — labeled table cells (radical, total stroke count) and the two
//!   pronunciation systems, plus stroke-order still images.
//! - `vocab` — the primary word-list table and the five appendix categories,
//!   including sections that span several sibling tables.
//! - `timeline` — the embedded tween script: shape catalogue, label timeline,
//!   stroke timelines, stroke-number inference.
//! - `rules` — the named heuristics the above share. Every label, section
//!   title, and pronunciation pattern is a rule object so its fallback chain
//!   can be tested in isolation.
//!
//! Conventions:
//! - Case-insensitive tag detection via `core::html`; local scanning within
//!   known blocks, no full-document selector machinery.
//! - Structural absence is never an error. A field that is not on the page is
//!   `None`/empty; most characters legitimately lack several sections.
//! - No caching or IO here; extractors take `&str`, return owned data.

pub mod meta;
pub mod rules;
pub mod timeline;
pub mod vocab;
