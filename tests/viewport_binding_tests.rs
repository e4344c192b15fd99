use std::cell::RefCell;
use std::rc::Rc;

use chart_guides::core::{Viewport, ViewportEvent};
use chart_guides::error::ChartError;

fn sized(left: f64, right: f64, width: f64) -> Viewport {
    let viewport = Viewport::from_bounds(left, right, left, right).expect("viewport");
    viewport.set_device_extents(width, width).expect("extents");
    viewport
}

#[test]
fn bound_viewport_mirrors_source_mapping() {
    let a = Viewport::new();
    a.set_device_extents(500.0, 300.0).expect("extents");
    a.set_bounds(0.0, 10.0, 0.0, 10.0).expect("bounds");

    let b = sized(-1.0, 1.0, 120.0);
    b.bind(&a).expect("bind");
    assert_eq!(b.map_to_device_x(5.0), a.map_to_device_x(5.0));
    assert_eq!(b.bounds(), a.bounds());
    assert_eq!(b.device_extents(), a.device_extents());

    a.set_horizontal(0.0, 20.0).expect("set");
    assert_eq!(b.map_to_device_x(5.0), a.map_to_device_x(5.0));
    assert_eq!(b.bounds().right, 20.0);
}

#[test]
fn bind_fires_one_window_event() {
    let a = sized(0.0, 4.0, 100.0);
    let b = Viewport::new();
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    b.on_change(move |event, snapshot| sink.borrow_mut().push((event, snapshot.bounds.right)));

    b.bind(&a).expect("bind");
    assert_eq!(
        events.borrow().as_slice(),
        &[(ViewportEvent::WindowChanged, 4.0)]
    );
}

#[test]
fn source_events_are_forwarded_to_mirror_listeners() {
    let a = sized(0.0, 4.0, 100.0);
    let b = Viewport::new();
    b.bind(&a).expect("bind");

    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);
    b.on_vertical_change(move |event, snapshot| sink.borrow_mut().push((event, snapshot.bounds.top)));

    a.set_vertical(-2.0, 2.0).expect("set");
    a.set_horizontal(1.0, 2.0).expect("set");
    assert_eq!(
        events.borrow().as_slice(),
        &[(ViewportEvent::VerticalChanged, 2.0)]
    );
}

#[test]
fn bound_viewport_rejects_direct_mutation() {
    let a = sized(0.0, 4.0, 100.0);
    let b = Viewport::new();
    b.bind(&a).expect("bind");

    assert_eq!(
        b.set_device_extents(10.0, 10.0),
        Err(ChartError::ViewportBound)
    );
    assert_eq!(b.set_horizontal(0.0, 1.0), Err(ChartError::ViewportBound));
    assert_eq!(b.zoom(0.0, 0.0, 0.5), Err(ChartError::ViewportBound));
    assert_eq!(a.bounds().right, 4.0);
}

#[test]
fn binding_to_self_is_rejected() {
    let a = Viewport::new();
    assert_eq!(a.bind(&a), Err(ChartError::SelfBinding));
    assert_eq!(a.bind(&a.clone()), Err(ChartError::SelfBinding));
    assert!(!a.is_bound());
}

#[test]
fn binding_cycles_are_rejected() {
    let a = Viewport::new();
    let b = Viewport::new();
    let c = Viewport::new();
    b.bind(&a).expect("bind b");
    c.bind(&b).expect("bind c");

    assert_eq!(a.bind(&c), Err(ChartError::BindingCycle));
    assert_eq!(a.bind(&b), Err(ChartError::BindingCycle));
    assert!(!a.is_bound());
}

#[test]
fn chained_mirrors_follow_the_root() {
    let a = sized(0.0, 4.0, 100.0);
    let b = Viewport::new();
    let c = Viewport::new();
    b.bind(&a).expect("bind b");
    c.bind(&b).expect("bind c");

    let hits = Rc::new(RefCell::new(0));
    let counter = Rc::clone(&hits);
    c.on_change(move |_, _| *counter.borrow_mut() += 1);

    a.set_horizontal(0.0, 8.0).expect("set");
    assert_eq!(c.bounds().right, 8.0);
    assert_eq!(*hits.borrow(), 1);
}

#[test]
fn unbind_keeps_mirrored_bounds_and_restores_own_extents() {
    let a = sized(0.0, 4.0, 500.0);
    let b = sized(-1.0, 1.0, 120.0);
    b.bind(&a).expect("bind");
    a.set_horizontal(2.0, 6.0).expect("set");

    let change = b.unbind();
    assert!(change.horizontal);
    assert!(change.vertical);
    assert!(!b.is_bound());
    assert_eq!(b.bounds(), a.bounds());
    assert_eq!(b.device_extents().width, 120.0);
    assert_eq!(a.listener_count(), 0);

    b.set_horizontal(-3.0, 3.0).expect("independent again");
    assert_eq!(a.bounds().left, 2.0);
}

#[test]
fn unbind_of_independent_viewport_is_a_no_op() {
    let a = Viewport::new();
    assert!(a.unbind().is_empty());
}
