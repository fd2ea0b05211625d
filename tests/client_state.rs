mod common;

use auction_client::cache::{EntityCache, Partition, RecentlyViewed};
use auction_client::session::{
    Identity, PageKind, UserAction, ENTRY_PAGE, LAST_ACTION_TIMESTAMP_KEY, RECENTLY_VISITED_KEY,
};
use auction_client::storage::{FileStorage, MemoryStorage, Storage, StorageError};
use chrono::{Duration, Utc};
use common::{closed_auction, init_tracing, open_auction, Harness};
use std::sync::Arc;

fn cache() -> (Arc<MemoryStorage>, EntityCache) {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    let cache = EntityCache::new(storage.clone(), Identity::new("alice"));
    (storage, cache)
}

/// 구획 배타성: 어떤 순서로 쓰더라도 id는 한 구획에만 있다
#[test]
fn test_cache_partition_exclusivity() {
    let (_, cache) = cache();

    cache.put(&[open_auction(1, 5), open_auction(2, 5)]).unwrap();
    cache.put(&[closed_auction(1)]).unwrap();
    // 닫힌 뒤 늦게 도착한 열린 목록은 닫힌 항목을 가리지 않는다
    cache.put(&[open_auction(1, 5), open_auction(3, 5)]).unwrap();
    cache.evict_open(2).unwrap();

    for id in 1..=3 {
        let open = cache.contains(Partition::Open, id);
        let closed = cache.contains(Partition::Closed, id);
        assert!(!(open && closed), "경매 {} 가 두 구획에 모두 있음", id);
    }
    assert!(cache.contains(Partition::Closed, 1));
    assert!(!cache.contains(Partition::Open, 2));
    assert!(cache.contains(Partition::Open, 3));
    assert!(cache.get(1).unwrap().unwrap().closed_by_user);
    assert_eq!(cache.get(2).unwrap(), None);
}

#[test]
fn test_cache_keys_are_namespaced_by_identity() {
    let (storage, cache) = cache();
    cache.put(&[open_auction(9, 1)]).unwrap();
    cache.put(&[closed_auction(10)]).unwrap();

    let mut keys = storage.keys();
    keys.sort();
    assert_eq!(keys, vec!["auction_alice_9", "closedAuction_alice_10"]);

    let other = EntityCache::new(storage.clone(), Identity::new("bob"));
    assert_eq!(other.get(9).unwrap(), None);
}

#[test]
fn test_cache_malformed_entry_is_reported() {
    let (storage, cache) = cache();
    storage.set_item("auction_alice_4", "{not json").unwrap();
    assert!(matches!(
        cache.get(4),
        Err(StorageError::Malformed { .. })
    ));
}

/// 최근 본 경매: 중복 없음, 처음 방문 순서 유지
#[test]
fn test_recently_viewed_dedup_and_order() {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    let identity = Identity::new("alice");
    let recent = RecentlyViewed::new(storage.clone(), &identity);

    assert!(recent.visit(3).unwrap());
    assert!(recent.visit(1).unwrap());
    assert!(!recent.visit(3).unwrap());
    assert!(recent.visit(2).unwrap());
    assert_eq!(recent.ids().unwrap(), vec![3, 1, 2]);

    recent.retain(&[2, 3]).unwrap();
    assert_eq!(recent.ids().unwrap(), vec![3, 2]);

    // 항상 배열로 저장
    assert_eq!(
        storage.get_item(&identity.key(RECENTLY_VISITED_KEY)).unwrap(),
        "[3,2]"
    );
}

#[test]
fn test_recently_viewed_reads_scalar_form() {
    init_tracing();
    let storage = Arc::new(MemoryStorage::new());
    let identity = Identity::new("alice");
    storage
        .set_item(&identity.key(RECENTLY_VISITED_KEY), "42")
        .unwrap();

    let recent = RecentlyViewed::new(storage.clone(), &identity);
    assert_eq!(recent.ids().unwrap(), vec![42]);
    recent.visit(43).unwrap();
    assert_eq!(
        storage.get_item(&identity.key(RECENTLY_VISITED_KEY)).unwrap(),
        "[42,43]"
    );
}

/// 만료 처리: 오래된 상태는 지우고, 빈 저장소에서도 오류 없이 반복 가능
#[test]
fn test_expiry_idempotence() {
    let harness = Harness::logged_in("alice");
    let identity = harness.identity();
    let now = Utc::now();

    harness
        .session
        .record_action(&identity, UserAction::PlaceBid, now - Duration::days(31))
        .unwrap();
    RecentlyViewed::new(harness.session.durable_storage(), &identity)
        .visit(5)
        .unwrap();

    assert!(harness.session.expire_stale_state(&identity, now).unwrap());
    assert!(harness.durable_storage.keys().is_empty());

    // 빈 저장소: 기록이 없으면 가장 오래된 시각으로 보고 다시 지운다
    assert!(harness.session.expire_stale_state(&identity, now).unwrap());
    assert!(harness.durable_storage.keys().is_empty());
}

#[test]
fn test_recent_action_keeps_durable_state() {
    let harness = Harness::logged_in("alice");
    let identity = harness.identity();
    let now = Utc::now();
    harness
        .session
        .record_action(&identity, UserAction::AddAuction, now - Duration::days(3))
        .unwrap();

    assert!(!harness.session.expire_stale_state(&identity, now).unwrap());
    assert_eq!(
        harness.session.last_action(&identity),
        Some(UserAction::AddAuction)
    );
    assert!(harness
        .durable_storage
        .get_item(&identity.key(LAST_ACTION_TIMESTAMP_KEY))
        .is_some());
    assert_eq!(harness.session.resume_page(&identity), PageKind::Sell);
}

#[test]
fn test_invalidate_clears_state_and_redirects() {
    let harness = Harness::logged_in("alice");
    let identity = harness.identity();
    harness
        .session
        .record_action(&identity, UserAction::SearchAuction, Utc::now())
        .unwrap();
    // 다른 사용자의 영구 상태는 남는다
    harness
        .durable_storage
        .set_item("lastAction_bob", "placeBid")
        .unwrap();

    harness.session.invalidate();

    assert!(harness.session.identity().is_none());
    assert!(harness.session_storage.keys().is_empty());
    assert_eq!(harness.durable_storage.keys(), vec!["lastAction_bob"]);
    assert_eq!(harness.navigator.current().as_deref(), Some(ENTRY_PAGE));
}

#[test]
fn test_file_storage_persists_between_opens() {
    init_tracing();
    let path = std::env::temp_dir().join(format!(
        "auction-client-state-{}-{}.json",
        std::process::id(),
        Utc::now().timestamp_nanos_opt().unwrap_or_default()
    ));

    {
        let storage = FileStorage::open(&path).unwrap();
        storage.set_item("lastAction_alice", "addAuction").unwrap();
        storage.set_item("temp", "x").unwrap();
        storage.remove_item("temp").unwrap();
    }

    let reopened = FileStorage::open(&path).unwrap();
    assert_eq!(
        reopened.get_item("lastAction_alice").as_deref(),
        Some("addAuction")
    );
    assert_eq!(reopened.keys(), vec!["lastAction_alice"]);

    reopened.clear().unwrap();
    assert!(FileStorage::open(&path).unwrap().keys().is_empty());
    let _ = std::fs::remove_file(&path);
}
