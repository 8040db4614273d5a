use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tessera_events::*;
use tessera_model::{ApplyOptions, CustomizationResult};

fn applied(run_id: &str, options: ApplyOptions) -> EngineEvent {
    EngineEvent::CustomizationApplied(Arc::new(CustomizationApplied {
        result: Arc::new(CustomizationResult {
            run_id: run_id.to_owned(),
            source: "color".to_owned(),
            domains: BTreeMap::new(),
            skipped: BTreeMap::new(),
        }),
        options,
    }))
}

fn resolved(n: usize) -> EngineEvent {
    EngineEvent::TokenResolved { token: format!("t{n}"), updates: n, valid: true }
}

#[tokio::test]
async fn test_event_flow() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    assert_eq!(bus.publish(resolved(1)), 1);

    let received = rx.next_event().await.unwrap();
    assert_eq!(*received, resolved(1));
}

#[tokio::test]
async fn test_publish_without_subscribers_is_dropped() {
    let bus = EventBus::new();
    assert_eq!(bus.publish(resolved(1)), 0);
}

#[tokio::test]
async fn test_receiver_lagged_recovery() {
    let capacity = 2;
    let bus = EventBus::with_capacity(capacity).unwrap();
    let mut rx = bus.subscribe();

    let total = 100;
    for i in 0..total {
        bus.publish(resolved(i));
    }

    let first = rx.next_event().await.unwrap();
    let EngineEvent::TokenResolved { updates, .. } = *first else {
        panic!("unexpected event {first:?}");
    };
    assert!(updates >= total - capacity, "expected the fresh tail, got {updates}");

    let second = rx.next_event().await.unwrap();
    assert!(matches!(*second, EngineEvent::TokenResolved { updates: u, .. } if u == updates + 1));
}

#[tokio::test]
async fn test_bus_closure_detection() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();
    drop(bus);
    assert!(rx.next_event().await.is_none(), "receiver should observe bus closure");
}

#[tokio::test]
async fn test_zero_capacity_rejected() {
    let err = EventBus::with_capacity(0).unwrap_err();
    assert_eq!(err.kind(), "invalid-capacity");
}

#[tokio::test]
async fn test_watch_keeps_latest_customization() {
    let bus = EventBus::new();
    assert!(bus.latest_customization().is_none());

    bus.publish(applied("first", ApplyOptions::empty()));
    bus.publish(applied("second", ApplyOptions::SKIP_PERSIST));

    let latest = bus.latest_customization().unwrap();
    assert_eq!(latest.result.run_id, "second");
    assert!(latest.wants_preview());
    assert!(!latest.wants_persist());
}

#[tokio::test]
async fn test_watch_receiver_waits_for_next_result() {
    let bus = EventBus::new();
    let mut rx = bus.watch_customizations();

    let publisher = bus.clone();
    let handle = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(10)).await;
        publisher.publish(resolved(1));
        publisher.publish(applied("late", ApplyOptions::empty()));
    });

    let latest = tokio::time::timeout(Duration::from_secs(1), rx.next_event()).await.unwrap().unwrap();
    assert_eq!(latest.result.run_id, "late");
    handle.await.unwrap();
}

#[tokio::test]
async fn test_ordering_is_preserved() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    for i in 0..50 {
        bus.publish(resolved(i));
    }
    for i in 0..50 {
        let event = rx.next_event().await.unwrap();
        assert_eq!(*event, resolved(i), "events should arrive in order");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_concurrent_publishers() {
    let bus = EventBus::new();
    let mut rx = bus.subscribe();

    let handles: Vec<_> = (0..2)
        .map(|half| {
            let bus = bus.clone();
            tokio::spawn(async move {
                for i in (half * 25)..(half * 25 + 25) {
                    bus.publish(resolved(i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap();
    }

    let mut seen = Vec::new();
    for _ in 0..50 {
        if let EngineEvent::TokenResolved { updates, .. } = *rx.next_event().await.unwrap() {
            seen.push(updates);
        }
    }
    seen.sort_unstable();
    assert_eq!(seen, (0..50).collect::<Vec<_>>());
}

#[test]
fn test_events_serialize_with_tag() {
    let event = EngineEvent::CycleDetected {
        token: "a".to_owned(),
        path: vec!["a".to_owned(), "b".to_owned(), "a".to_owned()],
    };
    let json = serde_json::to_value(&event).unwrap();
    assert_eq!(json["event"], "cycleDetected");
    assert_eq!(json["path"][2], "a");
}
