// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use kurbo::Size;
use understory_windowing::{
    GridGeometry, GridWindow, LinearGeometry, LinearWindow, compute_visible_cells,
    compute_visible_range,
};

fn bench_visible_range(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowing/visible_range");
    let geometry = LinearGeometry::new(48.0, 900.0);

    // The window is computed in constant time, so cost should not grow with
    // the collection length.
    for len in [1_000usize, 1_000_000, 100_000_000] {
        let max = geometry.total_extent(len);
        group.bench_with_input(BenchmarkId::from_parameter(len), &len, |b, &len| {
            let mut scroll = 0.0;
            b.iter(|| {
                scroll = (scroll + 997.0) % max;
                black_box(compute_visible_range(black_box(scroll), &geometry, len));
            });
        });
    }

    group.finish();
}

fn bench_list_render(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowing/list_render");
    let items: Vec<u64> = (0..1_000_000).collect();

    for overscan in [0usize, 5, 20] {
        let geometry = LinearGeometry::new(24.0, 1_080.0).with_overscan(overscan);
        let mut list = LinearWindow::new(geometry);
        list.on_scroll(12_000_000.0, items.len());
        let realized = list.visible_range(items.len()).len();
        group.throughput(Throughput::Elements(realized as u64));
        group.bench_with_input(BenchmarkId::from_parameter(overscan), &items, |b, items| {
            b.iter(|| {
                let rendered = list.render(items, |item, index| item.wrapping_add(index as u64));
                black_box(rendered);
            });
        });
    }

    group.finish();
}

fn bench_visible_cells(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowing/visible_cells");

    for width in [400.0, 1_280.0, 3_840.0] {
        let geometry =
            GridGeometry::new(Size::new(120.0, 120.0), Size::new(width, 2_160.0)).with_gap(8.0);
        let len = 250_000;
        group.bench_with_input(BenchmarkId::from_parameter(width), &geometry, |b, geometry| {
            let mut scroll = 0.0;
            b.iter(|| {
                scroll = (scroll + 1_531.0) % 1_000_000.0;
                black_box(compute_visible_cells(black_box(scroll), geometry, len));
            });
        });
    }

    group.finish();
}

fn bench_grid_resize(c: &mut Criterion) {
    let mut group = c.benchmark_group("windowing/grid_resize");
    let len = 250_000;
    let mut grid = GridWindow::new(
        GridGeometry::new(Size::new(120.0, 120.0), Size::new(1_280.0, 720.0)).with_gap(8.0),
    );
    grid.on_scroll(400_000.0, len);

    group.bench_function("alternate_widths", |b| {
        let mut wide = false;
        b.iter(|| {
            wide = !wide;
            let width = if wide { 1_920.0 } else { 1_280.0 };
            grid.set_container_size(Size::new(width, 720.0), len);
            black_box(grid.visible_cells(len));
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_visible_range,
    bench_list_render,
    bench_visible_cells,
    bench_grid_resize
);
criterion_main!(benches);
