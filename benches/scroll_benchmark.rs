//! Scroll-path benchmarks for the sticky header engine.
//!
//! Every grid scroll event goes through `StickyHeader::scroll`, so its cost
//! bounds how fast a host can feed offsets. Frame composition runs once per
//! drawn frame.
//!
//! Run with: cargo bench --bench scroll_benchmark

#![allow(missing_docs)] // criterion macros generate undocumented items

use criterion::{black_box, criterion_group, criterion_main, BatchSize, BenchmarkId, Criterion};
use stickylane::integration::replay_lines;
use stickylane::model::{LayoutConstants, LayoutSpec, Timestamp};
use stickylane::StickyHeader;

fn constants() -> LayoutConstants {
    LayoutConstants::new(LayoutSpec::pixels()).expect("valid constants")
}

/// Offsets sweeping down past `enter` and back up past `exit`.
fn sweep(events: usize) -> Vec<f64> {
    (0..events)
        .map(|i| {
            let phase = (i % 400) as f64;
            if phase < 200.0 {
                phase
            } else {
                400.0 - phase
            }
        })
        .collect()
}

/// Scroll events at `interval_ms` spacing through a freshly mounted engine.
fn bench_scroll_events(c: &mut Criterion) {
    let mut group = c.benchmark_group("scroll_events");
    let offsets = sweep(2_000);

    // 5 ms: most events coalesce; 20 ms: every event is evaluated
    for interval_ms in [5u64, 20] {
        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{interval_ms}ms")),
            &interval_ms,
            |b, &interval_ms| {
                b.iter_batched(
                    || StickyHeader::new(constants(), Timestamp::ZERO),
                    |mut engine| {
                        for (i, offset) in offsets.iter().enumerate() {
                            engine.scroll(*offset, Timestamp::from_millis(i as u64 * interval_ms));
                        }
                        black_box(engine.drain_events())
                    },
                    BatchSize::SmallInput,
                );
            },
        );
    }

    group.finish();
}

/// One render frame mid-fade.
fn bench_frame(c: &mut Criterion) {
    let mut engine = StickyHeader::new(constants(), Timestamp::ZERO);
    engine.scroll(500.0, Timestamp::ZERO);
    let mid_fade = Timestamp::from_millis(60);

    c.bench_function("frame_mid_fade", |b| {
        b.iter(|| black_box(engine.frame(black_box(mid_fade))))
    });
}

/// Full trace replay: parse, engine, collect.
fn bench_replay(c: &mut Criterion) {
    let lines: Vec<String> = sweep(5_000)
        .iter()
        .enumerate()
        .map(|(i, offset)| {
            format!(
                r#"{{"at_ms": {}, "event": {{"type": "scroll", "offset_y": {offset}}}}}"#,
                i * 8
            )
        })
        .collect();

    c.bench_function("replay_5000_lines", |b| {
        b.iter_batched(
            || lines.clone(),
            |lines| black_box(replay_lines(lines, constants())),
            BatchSize::LargeInput,
        )
    });
}

criterion_group! {
    name = benches;
    config = Criterion::default()
        // Set measurement time for accurate results
        .measurement_time(std::time::Duration::from_secs(5));
    targets = bench_scroll_events, bench_frame, bench_replay
}

criterion_main!(benches);
