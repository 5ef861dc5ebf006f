// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BatchSize, BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Rect, Vec2};
use understory_crop_motion::{
    Axis, CropFrame, MotionOrchestrator, Progress, ScaleRange, Transform, resolve_axis_correction,
};

const FRAME: f64 = 1.0 / 60.0;

fn frame() -> CropFrame {
    CropFrame::new(
        Rect::new(-400.0, -300.0, 500.0, 400.0),
        Rect::new(0.0, 0.0, 100.0, 100.0),
        ScaleRange::default(),
    )
}

fn run(orch: &mut MotionOrchestrator) -> usize {
    let mut frames = 0;
    while orch.tick(FRAME) == Progress::Continuing {
        frames += 1;
    }
    frames
}

fn bench_resolve(c: &mut Criterion) {
    let frame = frame();
    let transforms: Vec<Transform> = (0..256_i32)
        .map(|i| {
            let t = f64::from(i) * 7.0 - 900.0;
            let s = 0.5 + f64::from(i % 16) * 0.2;
            Transform::new(Vec2::new(t, -t), Vec2::new(s, s))
        })
        .collect();

    c.bench_function("crop_motion/resolve_axis_correction", |b| {
        b.iter(|| {
            let mut hits = 0_usize;
            for transform in &transforms {
                for axis in Axis::ALL {
                    if resolve_axis_correction(black_box(transform), &frame, axis).is_some() {
                        hits += 1;
                    }
                }
            }
            black_box(hits)
        });
    });
}

fn bench_fling(c: &mut Criterion) {
    let mut group = c.benchmark_group("crop_motion/fling_to_rest");
    // Slow flings stay inside the slack; fast ones cross the edge and hand
    // over to a spring.
    for velocity in [500.0, 2_000.0, 8_000.0] {
        group.bench_with_input(
            BenchmarkId::from_parameter(velocity),
            &velocity,
            |b, &velocity| {
                b.iter_batched(
                    || {
                        let mut orch = MotionOrchestrator::default();
                        orch.begin_session(frame(), Transform::IDENTITY);
                        orch.on_fling_velocity(velocity, -velocity);
                        orch
                    },
                    |mut orch| black_box(run(&mut orch)),
                    BatchSize::SmallInput,
                );
            },
        );
    }
    group.finish();
}

fn bench_pinch_release(c: &mut Criterion) {
    c.bench_function("crop_motion/pinch_release_to_rest", |b| {
        b.iter_batched(
            || {
                let mut orch = MotionOrchestrator::default();
                orch.begin_session(frame(), Transform::IDENTITY);
                orch.on_pinch(3.0);
                orch.on_pan_delta(350.0, -250.0);
                orch.on_pan_released(0.0, 0.0);
                orch.on_pinch_released();
                orch
            },
            |mut orch| black_box(run(&mut orch)),
            BatchSize::SmallInput,
        );
    });
}

criterion_group!(benches, bench_resolve, bench_fling, bench_pinch_release);
criterion_main!(benches);
