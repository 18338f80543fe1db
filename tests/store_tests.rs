use futures::future::join_all;
use nskv::ShardedStore;
use std::sync::Arc;

#[tokio::test]
async fn test_set_if_absent_then_get() {
    let store = ShardedStore::new(32);

    assert!(store.set_if_absent("alice.proj1.k", "v1".to_string()).await);
    assert_eq!(store.get("alice.proj1.k").await.as_deref(), Some("v1"));

    // A second insert must not overwrite
    assert!(!store.set_if_absent("alice.proj1.k", "v2".to_string()).await);
    assert_eq!(store.get("alice.proj1.k").await.as_deref(), Some("v1"));
}

#[tokio::test]
async fn test_set_replace_pop_has() {
    let store = ShardedStore::default();

    assert!(!store.replace("k", "x".to_string()).await);
    assert!(!store.has("k").await);

    assert_eq!(store.set("k", "1".to_string()).await, None);
    assert_eq!(store.set("k", "2".to_string()).await.as_deref(), Some("1"));
    assert!(store.replace("k", "3".to_string()).await);
    assert!(store.has("k").await);

    assert_eq!(store.pop("k").await.as_deref(), Some("3"));
    assert_eq!(store.pop("k").await, None);
    assert!(!store.has("k").await);
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_shard_count_rounds_to_power_of_two() {
    assert_eq!(ShardedStore::new(0).shard_count(), 1);
    assert_eq!(ShardedStore::new(5).shard_count(), 8);
    assert_eq!(ShardedStore::new(32).shard_count(), 32);
}

#[tokio::test]
async fn test_keys_spread_over_shards() {
    let store = ShardedStore::new(16);
    for i in 0..2000 {
        store.set(&format!("user.ns.key{}", i), i.to_string()).await;
    }
    let counts = store.shard_key_counts().await;
    assert_eq!(counts.len(), 16);
    assert_eq!(counts.iter().sum::<usize>(), 2000);
    assert!(counts.iter().all(|&c| c > 0), "distribution: {:?}", counts);
    assert_eq!(store.len().await, 2000);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_set_if_absent_single_winner() {
    let store = Arc::new(ShardedStore::new(32));

    let tasks = (0..64).map(|i| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            let value = format!("writer-{}", i);
            let won = store.set_if_absent("alice.proj1.race", value.clone()).await;
            (won, value)
        })
    });

    let results: Vec<(bool, String)> = join_all(tasks)
        .await
        .into_iter()
        .map(|r| r.unwrap())
        .collect();

    let winners: Vec<&String> = results.iter().filter(|(won, _)| *won).map(|(_, v)| v).collect();
    assert_eq!(winners.len(), 1);
    assert_eq!(
        store.get("alice.proj1.race").await.as_ref(),
        Some(winners[0])
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_writers_on_distinct_keys() {
    let store = Arc::new(ShardedStore::new(8));

    let tasks = (0..16).map(|w| {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 0..200 {
                let key = format!("u{}.ns.k{}", w, i);
                assert!(store.set_if_absent(&key, i.to_string()).await);
            }
        })
    });
    for r in join_all(tasks).await {
        r.unwrap();
    }

    assert_eq!(store.len().await, 16 * 200);
}

#[tokio::test]
async fn test_scan_prefix_and_snapshot_sorted() {
    let store = ShardedStore::from_entries(
        4,
        vec![
            ("alice.p1.b".to_string(), "2".to_string()),
            ("alice.p1.a".to_string(), "1".to_string()),
            ("alice.p2.a".to_string(), "3".to_string()),
            ("bob.p1.a".to_string(), "4".to_string()),
        ],
    )
    .await;

    let hits = store.scan_prefix("alice.p1.").await;
    assert_eq!(
        hits,
        vec![
            ("alice.p1.a".to_string(), "1".to_string()),
            ("alice.p1.b".to_string(), "2".to_string()),
        ]
    );

    let all = store.snapshot_all().await;
    let keys: Vec<&str> = all.iter().map(|(k, _)| k.as_str()).collect();
    assert_eq!(keys, vec!["alice.p1.a", "alice.p1.b", "alice.p2.a", "bob.p1.a"]);

    store.clear().await;
    assert!(store.snapshot_all().await.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_snapshot_during_writes_sees_whole_values() {
    let store = Arc::new(ShardedStore::new(8));
    for i in 0..100 {
        store.set(&format!("k{}", i), "old".to_string()).await;
    }

    let writer = {
        let store = Arc::clone(&store);
        tokio::spawn(async move {
            for i in 0..100 {
                store.set(&format!("k{}", i), "new".to_string()).await;
            }
        })
    };
    let snap = store.snapshot_all().await;
    writer.await.unwrap();

    // Either value may appear per key; never anything else.
    assert_eq!(snap.len(), 100);
    assert!(snap.iter().all(|(_, v)| v == "old" || v == "new"));
}
