use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;
use sunburst_core::{ChartConfig, TaxonomyNode};
use sunburst_render::bounds::ArcBounds;
use sunburst_render::config::LabelConfig;
use sunburst_render::labels::fit_segment_label;
use sunburst_render::text::DeterministicTextMeasurer;
use sunburst_render::{LayoutOptions, layout_taxonomy};

const LABEL: &str = "Conduire un briefing départ complet et structuré en tenant compte des menaces";

/// Root with `categories` categories, each holding `groups` groups of `leaves` competencies.
fn build_taxonomy(categories: usize, groups: usize, leaves: usize) -> TaxonomyNode {
    let cats = (0..categories)
        .map(|c| {
            let gs = (0..groups)
                .map(|g| {
                    let ls = (0..leaves)
                        .map(|l| {
                            let mut leaf = TaxonomyNode::new(format!("Compétence {c}.{g}.{l}"));
                            leaf.short_description = Some(LABEL.to_string());
                            leaf
                        })
                        .collect();
                    TaxonomyNode::new(format!("Groupe {c}.{g}")).with_children(ls)
                })
                .collect();
            TaxonomyNode::new(format!("Catégorie {c}")).with_children(gs)
        })
        .collect();
    TaxonomyNode::new("Référentiel").with_children(cats)
}

fn bench_fit_segment_label(c: &mut Criterion) {
    let mut group = c.benchmark_group("label_fit");
    let measurer = DeterministicTextMeasurer::default();
    let cfg = LabelConfig::default();

    let cases = [
        ("wide", ArcBounds { x0: 0.0, x1: 1.2, y0: 150.0, y1: 225.0 }),
        ("narrow", ArcBounds { x0: 3.0, x1: 3.08, y0: 225.0, y1: 300.0 }),
    ];
    for (name, bounds) in cases {
        group.bench_with_input(BenchmarkId::new("fit_segment_label", name), &bounds, |b, bounds| {
            b.iter(|| {
                let label =
                    fit_segment_label(black_box(bounds), LABEL, "bench", 0, &measurer, &cfg);
                black_box(label.map(|l| l.lines.len()).unwrap_or(0));
            })
        });
    }
    group.finish();
}

fn bench_layout_taxonomy(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout_taxonomy");
    group.measurement_time(Duration::from_secs(10));

    let config = ChartConfig::default();
    let options = LayoutOptions::default();
    let cases = [("4x3x5", 4usize, 3usize, 5usize), ("8x6x10", 8, 6, 10)];
    for (name, cats, groups, leaves) in cases {
        let raw = build_taxonomy(cats, groups, leaves);
        group.bench_with_input(BenchmarkId::new("layout", name), &raw, |b, raw| {
            b.iter(|| {
                let layout = layout_taxonomy(black_box(raw), &config, &options);
                black_box(layout.map(|l| l.segments.len()).unwrap_or(0));
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit_segment_label, bench_layout_taxonomy);
criterion_main!(benches);
