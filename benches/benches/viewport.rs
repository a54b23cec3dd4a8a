// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Benchmarks for viewport mutations and link propagation.

use std::cell::RefCell;
use std::rc::Rc;

use criterion::{BatchSize, Criterion, black_box, criterion_group, criterion_main};
use geoview_crs::{BuiltinCrsService, Crs, CrsService, WorldBounds};
use geoview_viewport::{LinkProperties, MapViewport, ViewportEvents, ViewportLink};
use kurbo::{Point, Vec2};

fn europe() -> WorldBounds {
    WorldBounds::from_coords(-10.0, 35.0, 30.0, 70.0, Crs::wgs84_lon_lat())
}

fn ready(service: &Rc<dyn CrsService>) -> MapViewport {
    let mut vp = MapViewport::new(service.clone());
    vp.resize(1280.0, 800.0);
    vp.show_extent(europe()).expect("lon/lat extent is valid");
    vp
}

fn bench_mutations(c: &mut Criterion) {
    let service: Rc<dyn CrsService> = Rc::new(BuiltinCrsService::new());
    let mut group = c.benchmark_group("viewport/mutate");

    group.bench_function("pan_by_screen", |b| {
        let mut vp = ready(&service);
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            black_box(vp.pan_by_screen(Vec2::new(3.0 * sign, -2.0 * sign)))
        })
    });

    group.bench_function("zoom_about_screen_point", |b| {
        let mut vp = ready(&service);
        let mut factor = 1.25;
        b.iter(|| {
            factor = 1.0 / factor;
            black_box(vp.zoom_about_screen_point(Point::new(300.0, 200.0), factor))
        })
    });

    group.bench_function("resize", |b| {
        let mut vp = ready(&service);
        let mut wide = false;
        b.iter(|| {
            wide = !wide;
            let width = if wide { 1920.0 } else { 1280.0 };
            black_box(vp.resize(width, 800.0))
        })
    });

    group.bench_function("request_fit/reprojected", |b| {
        b.iter_batched(
            || {
                let mut vp = ready(&service);
                vp.set_crs(Crs::web_mercator()).expect("lon/lat to mercator");
                vp
            },
            |mut vp| black_box(vp.request_fit(europe())),
            BatchSize::SmallInput,
        )
    });

    group.bench_function("pan_by_screen/8_listeners", |b| {
        let mut vp = ready(&service);
        for _ in 0..8 {
            vp.subscribe(ViewportEvents::FIT | ViewportEvents::TRANSFORM, |event| {
                black_box(event.scale);
            });
        }
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            black_box(vp.pan_by_screen(Vec2::new(3.0 * sign, 0.0)))
        })
    });
    group.finish();
}

fn bench_link(c: &mut Criterion) {
    let service: Rc<dyn CrsService> = Rc::new(BuiltinCrsService::new());
    let mut group = c.benchmark_group("viewport/link");

    group.bench_function("pan_zoom", |b| {
        let main = Rc::new(RefCell::new(ready(&service)));
        let overview = Rc::new(RefCell::new(ready(&service)));
        overview.borrow_mut().resize(200.0, 150.0);
        let _link = ViewportLink::link(
            &main,
            &overview,
            LinkProperties::PAN | LinkProperties::ZOOM,
        )
        .expect("distinct viewports");
        let mut sign = 1.0;
        b.iter(|| {
            sign = -sign;
            black_box(main.borrow_mut().pan_by_screen(Vec2::new(5.0 * sign, 0.0)))
        })
    });
    group.finish();
}

criterion_group!(benches, bench_mutations, bench_link);
criterion_main!(benches);
