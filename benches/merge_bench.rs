//! Surface construction benchmarks over the embedded reference sets.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use jsm::{Mode, ModeConfig, PipelineOptions, build_surface, load_with_references, parse_declaration_set, profile_for};
use jsm_surface::audit::audit_index_types;
use jsm_surface::merge::merge_sets;

const MODES: [(&str, Mode); 2] = [("js", Mode::Js), ("host-native", Mode::HostNative)];

/// Parse and bind each embedded set from source.
fn bench_parse_and_bind(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse_bind");

    for set in jsm_libs::all_sets() {
        group.bench_with_input(BenchmarkId::new("set", set.id), set, |b, set| {
            b.iter(|| black_box(parse_declaration_set(set.file_name, set.content)))
        });
    }

    group.finish();
}

/// Merge base and mode set, without validation.
fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for (id, _) in MODES {
        let sets = load_with_references(id).expect("reference sets load");
        group.bench_with_input(BenchmarkId::new("mode", id), &sets, |b, sets| {
            b.iter(|| {
                let refs: Vec<_> = sets.iter().collect();
                black_box(merge_sets(&refs))
            })
        });
    }

    group.finish();
}

fn bench_index_audit(c: &mut Criterion) {
    let sets = load_with_references("js").expect("reference sets load");
    let refs: Vec<_> = sets.iter().collect();
    let merged = merge_sets(&refs).value;

    c.bench_function("index_audit/js", |b| b.iter(|| black_box(audit_index_types(&merged))));
}

/// The whole pipeline up to a published surface.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for (id, mode) in MODES {
        let sets = load_with_references(id).expect("reference sets load");
        let profile = profile_for(mode);
        group.bench_with_input(BenchmarkId::new("publish", id), &sets, |b, sets| {
            b.iter(|| {
                let surface = build_surface(&ModeConfig::new(mode), sets.clone(), &profile, PipelineOptions::default())
                    .expect("reference surface validates")
                    .publish();
                black_box(surface.fingerprint())
            })
        });
    }

    group.finish();
}

criterion_group!(merge_benches, bench_parse_and_bind, bench_merge, bench_index_audit, bench_full_pipeline);
criterion_main!(merge_benches);
