// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for fit computation and affine transforms.

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use geoview_viewport::Transform2D;
use geoview_viewport::fit::fit_bounds;
use kurbo::{Point, Rect};

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit/fit_bounds");
    let display = Rect::new(0.0, 0.0, 1920.0, 1080.0);
    let requested = Rect::new(-10.0, 35.0, 30.0, 70.0);

    for (name, aspect) in [("aspect", true), ("stretch", false)] {
        group.bench_function(name, |b| {
            b.iter(|| black_box(fit_bounds(black_box(display), black_box(requested), aspect)))
        });
    }
    group.bench_function("deferred", |b| {
        let empty = Rect::new(0.0, 0.0, 0.0, 1080.0);
        b.iter(|| black_box(fit_bounds(black_box(empty), black_box(requested), true)))
    });
    group.finish();
}

fn bench_transform(c: &mut Criterion) {
    let mut group = c.benchmark_group("fit/transform");
    let t = Transform2D::new([8.0, 0.0, 0.0, -8.0, 12.5, 500.0]);

    group.bench_function("invert", |b| b.iter(|| black_box(black_box(t).invert())));
    group.bench_function("then", |b| {
        let u = Transform2D::compose(2.0, 2.0, 10.0, -4.0);
        b.iter(|| black_box(black_box(t).then(black_box(u))))
    });
    group.bench_function("apply_rect", |b| {
        let r = Rect::new(-3.0, 2.0, 17.0, 9.0);
        b.iter(|| black_box(t.apply_rect(black_box(r))))
    });

    for n in [1_000_usize, 100_000] {
        let points: Vec<Point> = (0..n)
            .map(|i| {
                let f = i as f64;
                Point::new(f.sin() * 180.0, f.cos() * 85.0)
            })
            .collect();
        group.bench_with_input(BenchmarkId::new("apply_points", n), &points, |b, points| {
            b.iter(|| {
                let mut acc = Point::ZERO;
                for p in points {
                    let q = t.apply_point(*p);
                    acc.x += q.x;
                    acc.y += q.y;
                }
                black_box(acc)
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_fit, bench_transform);
criterion_main!(benches);
