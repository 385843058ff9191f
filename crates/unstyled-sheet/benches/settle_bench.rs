//! Benchmarks for per-frame sheet work.
//!
//! Measures the hot paths a host hits every frame: target selection on
//! release, a full drag-release-settle cycle, and anchor rebuilds under a
//! resize storm.
//!
//! Run with: cargo bench -p unstyled-sheet --bench settle_bench

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use std::time::Duration;

use unstyled_sheet::{
    AnchorMap, AnimationSpec, Detent, DetentSet, SettleConfig, SheetConfig, SheetState,
    select_target,
};

const FRAME: Duration = Duration::from_millis(16);

fn detents(count: usize) -> Vec<Detent> {
    let mut all = vec![Detent::hidden()];
    for i in 1..count.saturating_sub(1) {
        let fraction = i as f64 / count as f64;
        all.push(Detent::fraction_of_container(format!("d{i}"), fraction));
    }
    all.push(Detent::fully_expanded());
    all
}

fn laid_out(spec: AnimationSpec) -> SheetState {
    let config = SheetConfig::new(detents(3), Detent::hidden()).animation(spec);
    let mut sheet = SheetState::new(config).expect("valid config");
    sheet.report_container_size(800.0);
    sheet.report_content_size(600.0);
    sheet
}

// =============================================================================
// Benchmarks
// =============================================================================

fn bench_select_target(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle/select_target");
    let config = SettleConfig::default();
    for count in [3usize, 8, 32] {
        let set = DetentSet::new(detents(count)).expect("unique detents");
        let anchors = AnchorMap::rebuild(&set, 800.0, 800.0).expect("measured");
        let current = Detent::hidden();
        group.bench_with_input(BenchmarkId::new("fling", count), &anchors, |b, anchors| {
            b.iter(|| {
                black_box(select_target(
                    anchors,
                    &current,
                    black_box(412.0),
                    black_box(-1800.0),
                    &config,
                ))
            })
        });
        group.bench_with_input(BenchmarkId::new("slow", count), &anchors, |b, anchors| {
            b.iter(|| {
                black_box(select_target(
                    anchors,
                    &current,
                    black_box(412.0),
                    black_box(20.0),
                    &config,
                ))
            })
        });
    }
    group.finish();
}

fn bench_drag_cycle(c: &mut Criterion) {
    let mut group = c.benchmark_group("settle/drag_cycle");
    for (name, spec) in [
        ("tween", AnimationSpec::default()),
        ("spring", AnimationSpec::critically_damped(400.0)),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| {
                let mut sheet = laid_out(spec.clone());
                for _ in 0..20 {
                    sheet.on_drag_delta(black_box(-12.0));
                }
                sheet.on_drag_end(black_box(-900.0));
                let mut frames = 0u32;
                while sheet.tick(FRAME) && frames < 600 {
                    frames += 1;
                }
                black_box(sheet.offset())
            })
        });
    }
    group.finish();
}

fn bench_resize_storm(c: &mut Criterion) {
    c.bench_function("settle/resize_storm", |b| {
        let mut sheet = laid_out(AnimationSpec::default());
        sheet
            .animate_to(&Detent::fully_expanded())
            .expect("configured detent");
        let mut size = 400.0;
        b.iter(|| {
            size = if size > 700.0 { 400.0 } else { size + 3.0 };
            sheet.report_content_size(black_box(size));
            sheet.tick(FRAME);
            black_box(sheet.offset())
        })
    });
}

criterion_group!(
    benches,
    bench_select_target,
    bench_drag_cycle,
    bench_resize_storm
);
criterion_main!(benches);
