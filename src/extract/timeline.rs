// src/extract/timeline.rs
// Decoder for the embedded stroke-animation script (a Flash-export style
// tween timeline). Reverse-engineering notes, as far as the encoding is
// understood:
//
// - Shapes:   this.NAME.graphics.f("#RRGGBB").s().p("<path data>");
//             this.NAME.setTransform(X,Y);
//   One shape per drawable fragment. Fragments filled with the guide color
//   are faint overlays of the finished stroke, not real stroke data.
//
// - Strokes:  this.timeline.addTween(cjs.Tween.get({})
//                 .wait(24).to({state:[{t:this.NAME}]},0)
//                 .wait(5).to({state:[{t:this.NAME},{t:this.NAME2}]},0) ...);
//   One addTween block per physical stroke; the shape references inside it
//   are the stroke's segments. Every wait() is RELATIVE to the previous
//   entry in the same block; absolute frame = prefix sum.
//
// - Labels:   a parallel tween chain on the text layer updates text:"N" with
//   its own relative waits; the displayed numbers are the human-visible
//   stroke numbers. The very first label shows at frame 0 by convention.
//
// Stroke numbering is inferred by matching block start frames against label
// frames. The encoding is not fully understood; for ambiguous timelines the
// documented fallback chain below is a best-effort heuristic and may be
// wrong. Unparseable scripts yield an empty vector list, never an error.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::record::{Anchor, StrokeVector};

/// Sentinel fill of guide/ghost strokes.
const GUIDE_COLOR: &str = "#CCCCCC";
/// Label-to-block matching tolerance, in frames (half a second at 24 fps).
const FRAME_TOLERANCE: u32 = 12;

#[derive(Clone, Debug)]
struct ShapeDefinition {
    path_data: String,
    anchor: Anchor,
    color: String,
}

/// One tween block's schedule: shape refs with absolute frames, block order.
#[derive(Clone, Debug)]
struct TimelineGroup {
    entries: Vec<(String, u32)>,
}

impl TimelineGroup {
    fn first_frame(&self) -> u32 {
        self.entries.first().map(|e| e.1).unwrap_or(0)
    }
}

fn path_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"this\.(\w+)\.graphics\.f\("([^"]*)"\)\.s\(\)\.p\("([^"]*)"\)"#).unwrap()
    })
}

fn xform_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"this\.(\w+)\.setTransform\((-?\d+(?:\.\d+)?),(-?\d+(?:\.\d+)?)").unwrap()
    })
}

fn token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    // block-interior tokens, document order: relative wait, text label, shape ref
    RE.get_or_init(|| {
        Regex::new(r#"\.wait\((\d+)\)|text\s*:\s*"(\d+)"|this\.(\w+)"#).unwrap()
    })
}

fn text_ctor_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"new\s+cjs\.Text\("(\d+)""#).unwrap())
}

/// Decode one animation script into ordered stroke vectors.
pub fn decode(script: &str) -> Vec<StrokeVector> {
    let shapes = catalogue(script);
    if shapes.is_empty() {
        return Vec::new();
    }

    let blocks = tween_blocks(script);
    let labels = decode_labels(script, &blocks);

    let mut groups: Vec<TimelineGroup> = blocks
        .iter()
        .filter(|b| !is_text_block(b))
        .filter_map(|b| decode_group(b, &shapes))
        .collect();
    if groups.is_empty() {
        return Vec::new();
    }

    // Drawing order first; numbering happens against that order.
    groups.sort_by_key(|g| g.first_frame());
    let numbers = assign_stroke_numbers(&groups, &labels);

    let mut out = Vec::new();
    for (group, stroke_number) in groups.iter().zip(numbers) {
        for (seg, (name, frame)) in group.entries.iter().enumerate() {
            let def = &shapes[name];
            out.push(StrokeVector {
                stroke_number,
                segment: seg as u32 + 1,
                frame: *frame,
                path_data: def.path_data.clone(),
                anchor: def.anchor,
                color: def.color.clone(),
            });
        }
    }
    out.sort_by_key(|v| (v.stroke_number, v.segment));
    out
}

/* ---------- step 1: shape catalogue ---------- */

fn catalogue(script: &str) -> HashMap<String, ShapeDefinition> {
    let mut anchors: HashMap<&str, Anchor> = HashMap::new();
    for cap in xform_re().captures_iter(script) {
        let x = cap[2].parse().unwrap_or(0.0);
        let y = cap[3].parse().unwrap_or(0.0);
        anchors.insert(cap.get(1).unwrap().as_str(), Anchor { x, y });
    }

    let mut out = HashMap::new();
    for cap in path_re().captures_iter(script) {
        let name = cap.get(1).unwrap().as_str();
        let color = cap[2].to_string();
        if color.eq_ignore_ascii_case(GUIDE_COLOR) {
            continue; // ghost stroke overlay
        }
        out.insert(
            name.to_string(),
            ShapeDefinition {
                path_data: cap[3].to_string(),
                anchor: anchors.get(name).copied().unwrap_or_default(),
                color,
            },
        );
    }
    out
}

/* ---------- step 2: block scanning ---------- */

/// Every `addTween( ... )` call body, found by paren balancing (path strings
/// are quoted, so quotes suspend counting).
fn tween_blocks(script: &str) -> Vec<&str> {
    const OPEN: &str = "addTween(";
    let mut out = Vec::new();
    let mut pos = 0usize;

    while let Some(i) = script[pos..].find(OPEN) {
        let body_start = pos + i + OPEN.len();
        let bytes = script.as_bytes();
        let mut depth = 1i32;
        let mut in_str = false;
        let mut end = None;
        for (off, &b) in bytes[body_start..].iter().enumerate() {
            match b {
                b'"' => in_str = !in_str,
                b'(' if !in_str => depth += 1,
                b')' if !in_str => {
                    depth -= 1;
                    if depth == 0 {
                        end = Some(body_start + off);
                        break;
                    }
                }
                _ => {}
            }
        }
        match end {
            Some(e) => {
                out.push(&script[body_start..e]);
                pos = e + 1;
            }
            None => break, // unbalanced tail; stop scanning
        }
    }
    out
}

fn is_text_block(block: &str) -> bool {
    // same tolerant text-property pattern the token scan uses
    block.contains("Tween.get(this.label")
        || token_re().captures_iter(block).any(|c| c.get(2).is_some())
}

/* ---------- step 3: label timeline ---------- */

/// Absolute frames at which each displayed stroke-number label appears.
fn decode_labels(script: &str, blocks: &[&str]) -> Vec<(u32, u32)> {
    let mut labels: Vec<(u32, u32)> = Vec::new();

    for block in blocks.iter().filter(|b| is_text_block(b)) {
        let mut frame = 0u32;
        for cap in token_re().captures_iter(block) {
            if let Some(w) = cap.get(1) {
                frame += w.as_str().parse::<u32>().unwrap_or(0);
            } else if let Some(n) = cap.get(2) {
                if let Ok(num) = n.as_str().parse::<u32>() {
                    labels.push((num, frame));
                }
            }
        }
    }

    // First label shows from frame 0: the constructor literal, when the
    // chain itself never sets text at frame 0.
    if labels.first().map(|l| l.1 > 0).unwrap_or(false) {
        if let Some(cap) = text_ctor_re().captures(script) {
            if let Ok(num) = cap[1].parse::<u32>() {
                labels.insert(0, (num, 0));
            }
        }
    }
    labels
}

/* ---------- step 4: shape timelines ---------- */

/// Prefix-sum the block's relative waits; keep refs that name real shapes.
fn decode_group(block: &str, shapes: &HashMap<String, ShapeDefinition>) -> Option<TimelineGroup> {
    let mut frame = 0u32;
    let mut entries = Vec::new();
    let mut seen = Vec::new();

    for cap in token_re().captures_iter(block) {
        if let Some(w) = cap.get(1) {
            frame += w.as_str().parse::<u32>().unwrap_or(0);
        } else if let Some(name) = cap.get(3) {
            let name = name.as_str();
            if shapes.contains_key(name) && !seen.contains(&name) {
                // a state array repeats earlier segments; only the newly
                // revealed shape is a new segment
                seen.push(name);
                entries.push((name.to_string(), frame));
            }
        }
    }

    if entries.is_empty() { None } else { Some(TimelineGroup { entries }) }
}

/* ---------- step 5: stroke-number inference ---------- */

/// Best-effort numbering. Fallback chain, in order:
/// 1. label/block counts match: nearest label within tolerance; a block
///    starting after the last label is the base stroke drawn over the guide
///    last, so it gets stroke 1;
/// 2. any block unresolved, or a collision: reverse drawing order;
/// 3. label/block counts differ: plain drawing order.
fn assign_stroke_numbers(groups: &[TimelineGroup], labels: &[(u32, u32)]) -> Vec<u32> {
    let n = groups.len();

    if !labels.is_empty() && labels.len() == n {
        let last_label_frame = labels.iter().map(|l| l.1).max().unwrap_or(0);
        let mut assigned: Vec<Option<u32>> = Vec::with_capacity(n);

        for g in groups {
            let first = g.first_frame();
            if first > last_label_frame {
                assigned.push(Some(1));
                continue;
            }
            let closest = labels
                .iter()
                .min_by_key(|(_, f)| first.abs_diff(*f))
                .filter(|(_, f)| first.abs_diff(*f) <= FRAME_TOLERANCE);
            assigned.push(closest.map(|(num, _)| *num));
        }

        let mut nums: Vec<u32> = assigned.iter().filter_map(|a| *a).collect();
        nums.sort_unstable();
        nums.dedup();
        if nums.len() == n {
            return assigned.into_iter().flatten().collect();
        }

        logd!("Timeline: label match failed ({} blocks), reverse order", n);
        return (0..n).map(|i| (n - i) as u32).collect();
    }

    // Counts disagree: plain drawing order.
    (0..n).map(|i| i as u32 + 1).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn shape(name: &str, color: &str) -> String {
        format!(
            "this.{n} = new cjs.Shape();\nthis.{n}.graphics.f(\"{c}\").s().p(\"Ah2{n}IQ\");\nthis.{n}.setTransform(10.5,-3.2);\n",
            n = name,
            c = color
        )
    }

    #[test]
    fn prefix_sum_reconstruction() {
        // waits [7, 5, 12] => absolute frames [7, 12, 24]
        let mut script = shape("seg_a", "#333333");
        script.push_str(&shape("seg_b", "#333333"));
        script.push_str(&shape("seg_c", "#333333"));
        script.push_str(
            "this.timeline.addTween(cjs.Tween.get({}).wait(7).to({state:[{t:this.seg_a}]},0)\
             .wait(5).to({state:[{t:this.seg_a},{t:this.seg_b}]},0)\
             .wait(12).to({state:[{t:this.seg_a},{t:this.seg_b},{t:this.seg_c}]},0).wait(1));",
        );
        let vs = decode(&script);
        assert_eq!(vs.len(), 3);
        assert_eq!(vs.iter().map(|v| v.frame).collect::<Vec<_>>(), vec![7, 12, 24]);
        assert_eq!(vs.iter().map(|v| v.segment).collect::<Vec<_>>(), vec![1, 2, 3]);
    }

    #[test]
    fn guide_shapes_never_catalogued() {
        let mut script = shape("real", "#1A1A1A");
        script.push_str(&shape("ghost", "#CCCCCC"));
        let cat = catalogue(&script);
        assert!(cat.contains_key("real"));
        assert!(!cat.contains_key("ghost"));
        assert_eq!(cat["real"].anchor, Anchor { x: 10.5, y: -3.2 });
    }

    #[test]
    fn unparseable_script_yields_empty() {
        assert!(decode("var x = 1; // no shapes here").is_empty());
        assert!(decode("").is_empty());
    }

    #[test]
    fn unbalanced_block_is_dropped() {
        let blocks = tween_blocks("addTween(cjs.Tween.get({}).wait(3)");
        assert!(blocks.is_empty());
    }

    #[test]
    fn quoted_parens_do_not_confuse_block_scan() {
        let blocks = tween_blocks(r#"addTween(cjs.Tween.get({}).to({state:[{t:this.a}]},0).wait(2)); addTween(x.p("A)B(C"));"#);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn spaced_text_property_still_read_as_labels() {
        // some exports write `text : "2"` with whitespace around the colon,
        // on a text layer not named `label`
        let mut script = shape("a", "#333333");
        script.push_str(&shape("b", "#333333"));
        script.push_str("this.num = new cjs.Text(\"1\", \"24px Arial\");\n");
        script.push_str(
            "this.timeline.addTween(cjs.Tween.get(this.num).wait(24).to({text : \"2\"},0).wait(24));\n",
        );
        script.push_str("this.timeline.addTween(cjs.Tween.get({}).wait(24).to({state:[{t:this.a}]},0).wait(1));\n");
        script.push_str("this.timeline.addTween(cjs.Tween.get({}).wait(48).to({state:[{t:this.b}]},0).wait(1));\n");

        let vs = decode(&script);
        assert_eq!(vs.len(), 2);
        // labels [1@0 (ctor), 2@24]; block @24 matches 2, block @48 trails → 1
        let stroke_of = |frame: u32| vs.iter().find(|v| v.frame == frame).unwrap().stroke_number;
        assert_eq!(stroke_of(24), 2);
        assert_eq!(stroke_of(48), 1);
    }

    #[test]
    fn count_mismatch_falls_back_to_drawing_order() {
        let groups = vec![
            TimelineGroup { entries: vec![(s!("a"), 10)] },
            TimelineGroup { entries: vec![(s!("b"), 20)] },
        ];
        // three labels, two blocks
        let labels = vec![(1, 0), (2, 10), (3, 20)];
        assert_eq!(assign_stroke_numbers(&groups, &labels), vec![1, 2]);
    }

    #[test]
    fn far_labels_force_reverse_order() {
        let groups = vec![
            TimelineGroup { entries: vec![(s!("a"), 100)] },
            TimelineGroup { entries: vec![(s!("b"), 200)] },
            TimelineGroup { entries: vec![(s!("c"), 300)] },
        ];
        // labels nowhere near the blocks and not trailing
        let labels = vec![(1, 0), (2, 400), (3, 800)];
        assert_eq!(assign_stroke_numbers(&groups, &labels), vec![3, 2, 1]);
    }
}
