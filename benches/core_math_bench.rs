use chart_guides::api::{GridBuilder, GridConfig};
use chart_guides::core::{AxisPartitioner, Viewport, partition};
use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

fn bench_viewport_round_trip(c: &mut Criterion) {
    let viewport = Viewport::from_bounds(0.0, 10_000.0, -500.0, 500.0).expect("valid viewport");
    viewport
        .set_device_extents(1920.0, 1080.0)
        .expect("valid extents");

    c.bench_function("viewport_round_trip", |b| {
        b.iter(|| {
            let px = viewport.map_to_device_x(black_box(4_321.123));
            let _ = viewport.map_to_virtual_x(px);
            let py = viewport.map_to_device_y(black_box(-123.5));
            let _ = viewport.map_to_virtual_y(py);
        })
    });
}

fn bench_partition_fresh(c: &mut Criterion) {
    c.bench_function("partition_fresh_1920", |b| {
        b.iter(|| {
            let _ = partition(
                black_box(-1_234.5),
                black_box(9_876.25),
                0.0,
                black_box(1920.0),
                black_box(64.0),
            );
        })
    });
}

fn bench_partition_reused_buffer(c: &mut Criterion) {
    let mut partitioner = AxisPartitioner::new();
    c.bench_function("partition_reused_1920", |b| {
        b.iter(|| {
            let ticks = partitioner.partition_into(
                black_box(-1_234.5),
                black_box(9_876.25),
                0.0,
                black_box(1920.0),
                black_box(64.0),
            );
            black_box(ticks.len());
        })
    });
}

fn bench_grid_frame(c: &mut Criterion) {
    let viewport = Viewport::from_bounds(-50.0, 50.0, -20.0, 20.0).expect("valid viewport");
    viewport
        .set_device_extents(1600.0, 900.0)
        .expect("valid extents");
    let mut builder =
        GridBuilder::new(GridConfig::default().with_min_gap_per_tick(64.0)).expect("builder");

    c.bench_function("grid_frame_1600x900", |b| {
        b.iter(|| {
            let frame = builder.build(black_box(&viewport));
            black_box(frame.lines.len());
        })
    });
}

criterion_group!(
    benches,
    bench_viewport_round_trip,
    bench_partition_fresh,
    bench_partition_reused_buffer,
    bench_grid_frame
);
criterion_main!(benches);
