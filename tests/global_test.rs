/*!
 * Global Events Tests
 * Singleton lifecycle and partitioned dispatch through the process-wide facade
 */

use event_registry::GlobalEvents;
use serial_test::serial;
use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;

#[test]
#[serial]
fn test_instance_is_process_wide() {
    let first = GlobalEvents::instance() as *const GlobalEvents;
    let second = GlobalEvents::instance() as *const GlobalEvents;
    assert_eq!(first, second);
}

#[test]
#[serial]
fn test_concurrent_first_access_yields_one_instance() {
    let handles: Vec<_> = (0..8)
        .map(|_| thread::spawn(|| GlobalEvents::instance() as *const GlobalEvents as usize))
        .collect();

    let addresses: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert!(addresses.windows(2).all(|pair| pair[0] == pair[1]));
}

#[test]
#[serial]
fn test_subscribe_and_emit() {
    let events = GlobalEvents::instance();
    events.clear_all();

    let result = Arc::new(AtomicI32::new(0));
    let sink = Arc::clone(&result);
    let handler = events.subscribe::<(i32,), _>(1, move |value: &i32| {
        sink.store(*value, Ordering::SeqCst);
    });

    assert_eq!(events.emit(1, (5,)), 1);
    assert_eq!(result.load(Ordering::SeqCst), 5);

    events.unsubscribe::<(i32,)>(1, &handler);
    assert_eq!(events.emit(1, (9,)), 0);
    assert_eq!(result.load(Ordering::SeqCst), 5);

    events.clear_all();
}

#[test]
#[serial]
fn test_packs_partition_one_event_id() {
    let events = GlobalEvents::instance();
    events.clear_all();

    let plain_hits = Arc::new(AtomicUsize::new(0));
    let typed_hits = Arc::new(AtomicUsize::new(0));

    let sink = Arc::clone(&plain_hits);
    events.subscribe::<(), _>(7, move || {
        sink.fetch_add(1, Ordering::SeqCst);
    });
    let sink = Arc::clone(&typed_hits);
    events.subscribe::<(i32,), _>(7, move |_: &i32| {
        sink.fetch_add(1, Ordering::SeqCst);
    });

    // Same id, independent buckets
    events.emit(7, ());
    assert_eq!(plain_hits.load(Ordering::SeqCst), 1);
    assert_eq!(typed_hits.load(Ordering::SeqCst), 0);

    events.emit(7, (3,));
    assert_eq!(typed_hits.load(Ordering::SeqCst), 1);

    // Dropping one bucket leaves the other registered
    events.clear_bucket::<(i32,)>(7);
    assert_eq!(events.count::<(i32,)>(7), 0);
    assert_eq!(events.count::<()>(7), 1);

    events.clear_event(7);
    assert_eq!(events.count::<()>(7), 0);

    events.clear_all();
}

#[test]
#[serial]
fn test_clear_all_resets_registrations() {
    let events = GlobalEvents::instance();
    events.clear_all();

    events.subscribe::<(), _>(1, || {});
    events.subscribe::<(), _>(2, || {});
    events.clear_all();

    assert_eq!(events.emit(1, ()), 0);
    assert_eq!(events.emit(2, ()), 0);
    assert_eq!(events.stats().handlers_registered, 0);
}
