use folio_core::{FetchOutcome, Work, WorkCache};

fn work(id: u64) -> Work {
    Work {
        id,
        title: format!("work {id}"),
        ..Work::default()
    }
}

#[test]
fn starts_empty() {
    let cache = WorkCache::new();
    assert!(cache.get().is_none());
    assert!(!cache.is_loaded());
}

#[test]
fn current_ticket_fills_slot() {
    let mut cache = WorkCache::new();
    let ticket = cache.begin_fetch();
    let stored = cache.store_if_current(ticket, vec![work(1), work(2)]);
    assert_eq!(stored.map(|works| works.len()), Some(2));
    assert_eq!(cache.get().map(|works| works.len()), Some(2));
}

#[test]
fn older_ticket_is_dropped() {
    let mut cache = WorkCache::new();
    let first = cache.begin_fetch();
    let second = cache.begin_fetch();
    assert!(cache.store_if_current(second, vec![work(2)]).is_some());
    assert!(cache.store_if_current(first, vec![work(1)]).is_none());
    let ids: Vec<_> = cache.get().unwrap().iter().map(|work| work.id).collect();
    assert_eq!(ids, vec![2]);
}

#[test]
fn invalidate_retires_inflight_fetch() {
    let mut cache = WorkCache::new();
    cache.store(vec![work(1)]);
    let ticket = cache.begin_fetch();
    cache.invalidate();
    assert!(cache.get().is_none());
    assert!(cache.store_if_current(ticket, vec![work(1)]).is_none());
    assert!(!cache.is_loaded());
}

#[test]
fn settle_tells_stale_apart_from_empty() {
    let mut cache = WorkCache::new();
    let stale = cache.begin_fetch();
    cache.invalidate();
    let fresh = cache.begin_fetch();
    assert_eq!(cache.settle(stale, vec![work(1)]), FetchOutcome::Superseded);

    match cache.settle(fresh, Vec::new()) {
        FetchOutcome::Stored(works) => assert!(works.is_empty()),
        other => panic!("expected stored, got {other:?}"),
    }

    let late = cache.begin_fetch();
    let newest = cache.begin_fetch();
    assert!(matches!(cache.settle(newest, vec![work(3)]), FetchOutcome::Stored(_)));
    match cache.settle(late, vec![work(2)]) {
        FetchOutcome::Cached(works) => assert_eq!(works[0].id, 3),
        other => panic!("expected cached, got {other:?}"),
    }
}
