use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use rusty_golf_rounds::notifier::Listener;
use rusty_golf_rounds::{RoundDeletionHub, RoundId};

#[test]
fn test2_listeners_run_in_registration_order_with_the_round_id() {
    let hub = RoundDeletionHub::new();
    let calls: Arc<Mutex<Vec<(&'static str, RoundId)>>> = Arc::default();

    for name in ["list", "stats", "badge"] {
        let calls = Arc::clone(&calls);
        hub.subscribe(move |id| calls.lock().unwrap().push((name, id)));
    }

    hub.notify_round_deleted(RoundId(42));
    assert_eq!(
        *calls.lock().unwrap(),
        vec![
            ("list", RoundId(42)),
            ("stats", RoundId(42)),
            ("badge", RoundId(42)),
        ]
    );
}

#[test]
fn test2_same_listener_twice_fires_twice() {
    let hub = RoundDeletionHub::new();
    let count = Arc::new(AtomicUsize::new(0));
    let listener: Listener = {
        let count = Arc::clone(&count);
        Arc::new(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    };

    let first = hub.subscribe_shared(Arc::clone(&listener));
    let second = hub.subscribe_shared(Arc::clone(&listener));
    hub.notify_round_deleted(RoundId(1));
    assert_eq!(count.load(Ordering::SeqCst), 2);

    // each registration goes away on its own
    first.unsubscribe();
    hub.notify_round_deleted(RoundId(2));
    assert_eq!(count.load(Ordering::SeqCst), 3);

    second.unsubscribe();
    hub.notify_round_deleted(RoundId(3));
    assert_eq!(count.load(Ordering::SeqCst), 3);
}

#[test]
fn test2_unsubscribed_listener_is_never_called_again() {
    let hub = RoundDeletionHub::new();
    let kept = Arc::new(AtomicUsize::new(0));
    let removed = Arc::new(AtomicUsize::new(0));

    let kept_clone = Arc::clone(&kept);
    let _kept_sub = hub.subscribe(move |_| {
        kept_clone.fetch_add(1, Ordering::SeqCst);
    });
    let removed_clone = Arc::clone(&removed);
    let removed_sub = hub.subscribe(move |_| {
        removed_clone.fetch_add(1, Ordering::SeqCst);
    });

    removed_sub.unsubscribe();
    removed_sub.unsubscribe();
    hub.notify_round_deleted(RoundId(7));
    hub.notify_round_deleted(RoundId(8));

    assert_eq!(kept.load(Ordering::SeqCst), 2);
    assert_eq!(removed.load(Ordering::SeqCst), 0);
    assert_eq!(hub.listener_count(), 1);
}

#[test]
fn test2_notify_without_listeners_is_a_no_op() {
    let hub = RoundDeletionHub::new();
    hub.notify_round_deleted(RoundId(5));
    assert_eq!(hub.listener_count(), 0);
}

#[test]
fn test2_clones_share_one_registry() {
    let hub = RoundDeletionHub::new();
    let publisher = hub.clone();
    let count = Arc::new(AtomicUsize::new(0));
    let count_clone = Arc::clone(&count);
    hub.subscribe(move |_| {
        count_clone.fetch_add(1, Ordering::SeqCst);
    });

    publisher.notify_round_deleted(RoundId(9));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test2_listener_may_unsubscribe_itself_during_notification() {
    let hub = RoundDeletionHub::new();
    let count = Arc::new(AtomicUsize::new(0));
    let slot: Arc<Mutex<Option<rusty_golf_rounds::Subscription>>> = Arc::default();

    let sub = {
        let count = Arc::clone(&count);
        let slot = Arc::clone(&slot);
        hub.subscribe(move |_| {
            count.fetch_add(1, Ordering::SeqCst);
            if let Some(sub) = slot.lock().unwrap().as_ref() {
                sub.unsubscribe();
            }
        })
    };
    *slot.lock().unwrap() = Some(sub);

    hub.notify_round_deleted(RoundId(1));
    hub.notify_round_deleted(RoundId(2));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test2_unsubscribe_after_hub_dropped_is_harmless() {
    let hub = RoundDeletionHub::new();
    let sub = hub.subscribe(|_| {});
    drop(hub);
    sub.unsubscribe();
}

#[test]
fn test2_concurrent_subscribers_all_registered() {
    let hub = RoundDeletionHub::new();
    let count = Arc::new(AtomicUsize::new(0));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let hub = hub.clone();
            let count = Arc::clone(&count);
            std::thread::spawn(move || {
                hub.subscribe(move |_| {
                    count.fetch_add(1, Ordering::SeqCst);
                });
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    hub.notify_round_deleted(RoundId(1));
    assert_eq!(count.load(Ordering::SeqCst), 8);
}
