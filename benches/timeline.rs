// benches/timeline.rs
use criterion::{Criterion, black_box, criterion_group, criterion_main};

use zici_scrape::extract::timeline;

/// Synthetic script shaped like the real exports: N strokes of 3 segments
/// each, a guide overlay per stroke, and a matching label chain.
fn synthetic_script(strokes: usize) -> String {
    let mut s = String::new();
    for i in 0..strokes {
        for seg in 0..3 {
            s.push_str(&format!(
                "this.s{i}_{seg}.graphics.f(\"#333333\").s().p(\"AhZAkIBmhCAgkB\");\nthis.s{i}_{seg}.setTransform({}.5,{}.5);\n",
                i * 7 + seg,
                i * 5 + seg,
            ));
        }
        s.push_str(&format!(
            "this.g{i}.graphics.f(\"#CCCCCC\").s().p(\"AhZAkIBmhCAgkB\");\nthis.g{i}.setTransform(0,0);\n",
        ));
    }

    s.push_str("this.label = new cjs.Text(\"1\", \"24px Arial\");\n");
    s.push_str("this.timeline.addTween(cjs.Tween.get(this.label)");
    for n in 2..=strokes {
        s.push_str(&format!(".wait(24).to({{text:\"{n}\"}},0)"));
    }
    s.push_str(".wait(24));\n");

    for i in 0..strokes {
        s.push_str(&format!(
            "this.timeline.addTween(cjs.Tween.get({{}}).wait({}).to({{state:[{{t:this.s{i}_0}}]}},0)\
             .wait(4).to({{state:[{{t:this.s{i}_0}},{{t:this.s{i}_1}}]}},0)\
             .wait(4).to({{state:[{{t:this.s{i}_0}},{{t:this.s{i}_1}},{{t:this.s{i}_2}}]}},0).wait(1));\n",
            i * 24,
        ));
    }
    s
}

fn bench_decode(c: &mut Criterion) {
    let small = synthetic_script(8);
    let large = synthetic_script(30);

    c.bench_function("timeline_decode_8_strokes", |b| {
        b.iter(|| black_box(timeline::decode(black_box(&small))).len())
    });

    c.bench_function("timeline_decode_30_strokes", |b| {
        b.iter(|| black_box(timeline::decode(black_box(&large))).len())
    });
}

criterion_group!(benches, bench_decode);
criterion_main!(benches);
