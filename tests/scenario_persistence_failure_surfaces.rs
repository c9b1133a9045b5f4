mod common;

use common::MemoryStore;
use necessity_reconcile::models::ListScope;
use necessity_reconcile::{ReconcileError, ReconcileService};
use std::sync::atomic::Ordering;

#[tokio::test]
async fn scenario_writer_error_is_returned_without_retry() {
    let scope = ListScope::new("acme", "obra-7", "lista-1");
    let store = MemoryStore::new();
    store.put_item(&scope, "A", 10, 0);
    store.upload(&scope, &[("A", 10)]);
    store.fail_all_writes.store(true, Ordering::SeqCst);

    let service = ReconcileService::new(store);
    let err = service.reconcile(&scope).await.unwrap_err();

    assert!(matches!(err, ReconcileError::Database(_)));
    assert_eq!(service.store().writes(), 1);
    assert_eq!(service.store().row(&scope, "A").committed_qty, 0);
}

#[tokio::test]
async fn scenario_batch_stops_at_first_failing_scope() {
    let first = ListScope::new("acme", "obra-7", "lista-1");
    let failing = ListScope::new("acme", "obra-7", "lista-2");
    let never = ListScope::new("acme", "obra-7", "lista-3");

    let store = MemoryStore::new();
    for s in [&first, &failing, &never] {
        store.put_item(s, "A", 2, 0);
        store.upload(s, &[("A", 2)]);
    }
    store.fail_writes_for(&failing);

    let service = ReconcileService::new(store);
    let result = service
        .reconcile_many(&[first.clone(), failing.clone(), never.clone()])
        .await;

    assert!(result.is_err());
    assert_eq!(service.store().row(&first, "A").committed_qty, 2);
    assert_eq!(service.store().row(&never, "A").committed_qty, 0);
}

#[tokio::test]
async fn scenario_batch_returns_stats_per_scope() {
    let a = ListScope::new("acme", "obra-7", "lista-1");
    let b = ListScope::new("acme", "obra-8", "lista-1");
    let store = MemoryStore::new();
    store.put_item(&a, "X", 4, 0);
    store.upload(&a, &[("X", 1)]);
    store.put_item(&b, "Y", 4, 0);

    let service = ReconcileService::new(store);
    let stats = service.reconcile_many(&[a.clone(), b.clone()]).await.unwrap();

    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].scope.as_ref(), Some(&a));
    assert_eq!(stats[0].updated, 1);
    assert_eq!(stats[1].updated, 0);
}
