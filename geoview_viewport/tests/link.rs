// Copyright 2025 the Geoview Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Synchronization of linked viewports.

use std::cell::RefCell;
use std::rc::Rc;

use geoview_viewport::{
    BuiltinCrsService, Crs, CrsKind, CrsService, LinkProperties, LinkStats, MapViewport,
    ViewportError, ViewportEvents, ViewportLink, WorldBounds,
};
use kurbo::{Point, Rect, Vec2};

type Shared = Rc<RefCell<MapViewport>>;

fn viewport(service: &Rc<dyn CrsService>, width: f64, height: f64) -> Shared {
    let mut vp = MapViewport::new(service.clone());
    vp.resize(width, height);
    Rc::new(RefCell::new(vp))
}

fn pair(a_size: (f64, f64), b_size: (f64, f64)) -> (Shared, Shared) {
    let service: Rc<dyn CrsService> = Rc::new(BuiltinCrsService::new());
    (
        viewport(&service, a_size.0, a_size.1),
        viewport(&service, b_size.0, b_size.1),
    )
}

fn cartesian(x0: f64, y0: f64, x1: f64, y1: f64) -> WorldBounds {
    WorldBounds::from_coords(x0, y0, x1, y1, Crs::cartesian_2d())
}

fn fit_of(vp: &Shared) -> Rect {
    vp.borrow().requested_fit().unwrap().rect()
}

fn assert_rect_near(a: Rect, b: Rect) {
    let d = (a.x0 - b.x0)
        .abs()
        .max((a.y0 - b.y0).abs())
        .max((a.x1 - b.x1).abs())
        .max((a.y1 - b.y1).abs());
    assert!(d < 1e-6, "{a:?} != {b:?}");
}

#[test]
fn pan_zoom_link_keeps_equal_displays_identical() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    let link = ViewportLink::link(&a, &b, LinkProperties::PAN | LinkProperties::ZOOM).unwrap();
    assert_eq!(link.stats(), LinkStats::default());

    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();
    assert_eq!(link.stats().propagated, 1);
    assert_eq!(
        a.borrow().bounds().unwrap().rect(),
        b.borrow().bounds().unwrap().rect()
    );

    assert!(a.borrow_mut().zoom_by(2.0));
    assert_eq!(link.stats().propagated, 2);
    assert!(b.borrow_mut().pan_by_screen(Vec2::new(10.0, -20.0)));
    assert_eq!(link.stats().propagated, 3);
    assert_eq!(link.stats().suppressed, 3);

    assert_eq!(
        a.borrow().world_to_screen(),
        b.borrow().world_to_screen()
    );
    assert_eq!(fit_of(&a), fit_of(&b));
}

#[test]
fn link_brings_second_viewport_in_line() {
    let (a, b) = pair((400.0, 300.0), (200.0, 100.0));
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();
    b.borrow_mut()
        .show_extent(cartesian(500.0, 500.0, 510.0, 505.0))
        .unwrap();

    let _link = ViewportLink::link(&a, &b, LinkProperties::PAN | LinkProperties::ZOOM).unwrap();
    assert_eq!(fit_of(&b), Rect::new(0.0, 0.0, 40.0, 30.0));
    assert_eq!(fit_of(&a), Rect::new(0.0, 0.0, 40.0, 30.0));
}

#[test]
fn zoom_link_keeps_each_center() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();
    b.borrow_mut()
        .show_extent(cartesian(100.0, 100.0, 140.0, 130.0))
        .unwrap();
    let link = ViewportLink::link(&a, &b, LinkProperties::ZOOM).unwrap();
    assert_eq!(fit_of(&b), Rect::new(100.0, 100.0, 140.0, 130.0));

    assert!(a.borrow_mut().zoom_by(2.0));
    assert_rect_near(fit_of(&b), Rect::new(110.0, 107.5, 130.0, 122.5));

    assert!(a.borrow_mut().pan_to(Point::new(-50.0, -50.0)));
    assert_eq!(fit_of(&b).center(), Point::new(120.0, 115.0));
    assert_eq!(link.stats().propagated, 2);
}

#[test]
fn pan_link_keeps_each_size() {
    let (main, overview) = pair((800.0, 600.0), (200.0, 150.0));
    main.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 80.0, 60.0))
        .unwrap();
    overview
        .borrow_mut()
        .show_extent(cartesian(-400.0, -300.0, 400.0, 300.0))
        .unwrap();
    let _link = ViewportLink::link(&main, &overview, LinkProperties::PAN).unwrap();
    assert_eq!(
        fit_of(&overview),
        Rect::from_center_size(Point::new(40.0, 30.0), (800.0, 600.0))
    );

    assert!(overview.borrow_mut().pan_to(Point::new(0.0, 0.0)));
    assert_eq!(fit_of(&main), Rect::new(-40.0, -30.0, 40.0, 30.0));
}

#[test]
fn crs_link_follows_projection_changes() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(WorldBounds::from_coords(
            -10.0,
            35.0,
            30.0,
            70.0,
            Crs::wgs84_lon_lat(),
        ))
        .unwrap();
    let all = LinkProperties::CRS | LinkProperties::PAN | LinkProperties::ZOOM;
    let _link = ViewportLink::link(&a, &b, all).unwrap();
    assert!(b.borrow().crs().same_instance(a.borrow().crs()));

    let mercator = Crs::web_mercator();
    a.borrow_mut().set_crs(mercator.clone()).unwrap();
    assert!(b.borrow().crs().same_instance(&mercator));
    assert_rect_near(fit_of(&b), fit_of(&a));
    assert!(fit_of(&b).width() > 4_000_000.0);
}

#[test]
fn crs_and_fit_arrive_as_one_change() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(WorldBounds::from_coords(
            -10.0,
            35.0,
            30.0,
            70.0,
            Crs::wgs84_lon_lat(),
        ))
        .unwrap();
    let all = LinkProperties::CRS | LinkProperties::PAN | LinkProperties::ZOOM;
    let _link = ViewportLink::link(&a, &b, all).unwrap();

    let seen = Rc::new(RefCell::new(Vec::new()));
    let log = seen.clone();
    b.borrow_mut()
        .subscribe(ViewportEvents::all(), move |e| log.borrow_mut().push(e.changed));

    a.borrow_mut().set_crs(Crs::web_mercator()).unwrap();
    let seen = seen.borrow();
    assert_eq!(seen.len(), 1);
    assert!(seen[0].contains(ViewportEvents::CRS | ViewportEvents::FIT));
    assert_eq!(fit_of(&b), fit_of(&a));
}

#[test]
fn failed_crs_mirror_leaves_target_untouched() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();
    let _link = ViewportLink::link(&a, &b, LinkProperties::CRS | LinkProperties::PAN).unwrap();
    let crs = b.borrow().crs().clone();
    let fit = fit_of(&b);

    // Keeping b's size needs its cartesian fit in lon/lat, which has no
    // coordinate operation.
    a.borrow_mut()
        .show_extent(WorldBounds::from_coords(
            -10.0,
            35.0,
            30.0,
            70.0,
            Crs::wgs84_lon_lat(),
        ))
        .unwrap();
    assert!(b.borrow().crs().same_instance(&crs));
    assert_eq!(b.borrow().crs().kind(), CrsKind::Engineering);
    assert_eq!(fit_of(&b), fit);
}

#[test]
fn display_link_mirrors_compositing_factors() {
    let (a, b) = pair((400.0, 300.0), (100.0, 100.0));
    let _link = ViewportLink::link(&a, &b, LinkProperties::DISPLAY).unwrap();

    a.borrow_mut().set_display_scale(2.0, 1.5).unwrap();
    assert_eq!(b.borrow().display().scale(), (2.0, 1.5));
    b.borrow_mut().set_display_translate(5.0, -3.0).unwrap();
    assert_eq!(a.borrow().display().translate(), (5.0, -3.0));
    // Sizes are not linked.
    assert_eq!(b.borrow().display().width(), 100.0);
}

#[test]
fn unlinking_and_dropping_remove_listeners() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();

    let link = ViewportLink::link(&a, &b, LinkProperties::PAN).unwrap();
    assert!(link.is_active());
    assert_eq!(a.borrow().listener_count(), 1);
    assert_eq!(b.borrow().listener_count(), 1);
    link.unlink();
    assert_eq!(a.borrow().listener_count(), 0);
    assert_eq!(b.borrow().listener_count(), 0);

    assert!(a.borrow_mut().pan_to(Point::new(100.0, 100.0)));
    assert_eq!(fit_of(&b).center(), Point::new(20.0, 15.0));

    {
        let _link = ViewportLink::link(&a, &b, LinkProperties::PAN).unwrap();
        assert_eq!(b.borrow().listener_count(), 1);
    }
    assert_eq!(a.borrow().listener_count(), 0);
    assert_eq!(b.borrow().listener_count(), 0);
}

#[test]
fn dropped_viewport_ends_propagation() {
    let (a, b) = pair((400.0, 300.0), (400.0, 300.0));
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 40.0, 30.0))
        .unwrap();
    let link = ViewportLink::link(&a, &b, LinkProperties::PAN).unwrap();
    drop(b);

    assert!(a.borrow_mut().pan_to(Point::new(5.0, 5.0)));
    assert_eq!(link.stats().propagated, 0);
    drop(link);
    assert_eq!(a.borrow().listener_count(), 0);
}

#[test]
fn self_link_is_rejected() {
    let (a, _) = pair((10.0, 10.0), (10.0, 10.0));
    let err = ViewportLink::link(&a, &a, LinkProperties::all()).unwrap_err();
    assert_eq!(err, ViewportError::SelfLink);
    assert_eq!(a.borrow().listener_count(), 0);
}

#[test]
fn link_cycles_terminate() {
    let service: Rc<dyn CrsService> = Rc::new(BuiltinCrsService::new());
    let a = viewport(&service, 300.0, 300.0);
    let b = viewport(&service, 300.0, 300.0);
    let c = viewport(&service, 300.0, 300.0);
    a.borrow_mut()
        .show_extent(cartesian(0.0, 0.0, 10.0, 10.0))
        .unwrap();

    let props = LinkProperties::PAN | LinkProperties::ZOOM;
    let _ab = ViewportLink::link(&a, &b, props).unwrap();
    let _bc = ViewportLink::link(&b, &c, props).unwrap();
    let _ca = ViewportLink::link(&c, &a, props).unwrap();

    assert!(a.borrow_mut().pan_to(Point::new(50.0, 50.0)));
    for vp in [&a, &b, &c] {
        assert_eq!(fit_of(vp).center(), Point::new(50.0, 50.0));
    }
    assert!(c.borrow_mut().zoom_by(0.5));
    for vp in [&a, &b] {
        assert_rect_near(fit_of(vp), Rect::new(40.0, 40.0, 60.0, 60.0));
    }
}
