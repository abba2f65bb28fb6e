//! Tenant isolation and handle routing behavior.

use std::collections::BTreeMap;
use std::sync::Arc;

use fleet_core::{FleetConfig, RecordValue, TenantId};
use fleet_store::{MemoryBackend, StoreRouter};

fn vehicle(plate: &str, id: i64) -> RecordValue {
    RecordValue::Map(BTreeMap::from([
        ("id".to_string(), RecordValue::Text(format!("veh_{id}"))),
        ("vehicleId".to_string(), RecordValue::BigInt(id)),
        ("plate".to_string(), RecordValue::from(plate)),
    ]))
}

fn router() -> StoreRouter {
    let mut config = FleetConfig::new();
    config.set("find.limit.default", "50");
    config.set("find.limit.max", "100");
    StoreRouter::new(Arc::new(MemoryBackend::new()), config.snapshot())
}

#[tokio::test]
async fn handles_never_cross_tenants() {
    let router = router();
    let a = router.handle(&TenantId::from("org_a"));
    let b = router.handle(&TenantId::from("org_b"));

    a.create("vehicles", vehicle("B-FL 100", 1)).await.unwrap();
    a.create("vehicles", vehicle("B-FL 101", 2)).await.unwrap();
    b.create("vehicles", vehicle("M-XY 900", 3)).await.unwrap();

    let rows_a = a.find("vehicles", None).await.unwrap();
    let rows_b = b.find("vehicles", None).await.unwrap();

    assert_eq!(rows_a.len(), 2);
    assert_eq!(rows_b.len(), 1);

    let plates_a: Vec<&str> = rows_a
        .iter()
        .filter_map(|r| r.get("plate").and_then(|v| v.as_text()))
        .collect();
    assert!(plates_a.contains(&"B-FL 100"));
    assert!(plates_a.contains(&"B-FL 101"));
    assert!(!plates_a.contains(&"M-XY 900"));

    // a row created under tenant A is invisible to B even by id
    assert!(b.get("vehicles", "veh_1").await.unwrap().is_none());
    assert!(a.get("vehicles", "veh_1").await.unwrap().is_some());
}

#[tokio::test]
async fn removal_is_scoped_to_the_owning_tenant() {
    let router = router();
    let a = router.handle(&TenantId::from("org_a"));
    let b = router.handle(&TenantId::from("org_b"));

    a.create("drivers", vehicle("n/a", 7)).await.unwrap();

    // B cannot delete A's row
    assert!(b.remove("drivers", "veh_7").await.unwrap().is_none());
    assert!(a.get("drivers", "veh_7").await.unwrap().is_some());

    assert!(a.remove("drivers", "veh_7").await.unwrap().is_some());
    assert!(a.get("drivers", "veh_7").await.unwrap().is_none());
}

#[tokio::test]
async fn same_tenant_id_reuses_the_same_scoping() {
    let router = router();
    let first = router.handle(&TenantId::from("org_a"));
    let again = router.handle(&TenantId::from("org_a"));

    first.create("vehicles", vehicle("B-FL 100", 1)).await.unwrap();

    // memoized handle sees the same partition
    assert_eq!(again.find("vehicles", None).await.unwrap().len(), 1);
    assert_eq!(again.tenant_id(), first.tenant_id());
}

#[tokio::test]
async fn create_assigns_an_id_when_missing() {
    let router = router();
    let a = router.handle(&TenantId::from("org_a"));

    let row = RecordValue::Map(BTreeMap::from([(
        "plate".to_string(),
        RecordValue::from("B-FL 102"),
    )]));
    let created = a.create("vehicles", row).await.unwrap();

    let id = created.get("id").and_then(|v| v.as_text()).unwrap();
    assert!(!id.is_empty());
    assert!(a.get("vehicles", id).await.unwrap().is_some());
}

#[tokio::test]
async fn duplicate_ids_are_rejected_within_a_tenant() {
    let router = router();
    let a = router.handle(&TenantId::from("org_a"));

    a.create("vehicles", vehicle("B-FL 100", 1)).await.unwrap();
    let dup = a.create("vehicles", vehicle("B-FL 999", 1)).await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn find_respects_configured_limits() {
    let mut config = FleetConfig::new();
    config.set("find.limit.default", "3");
    config.set("find.limit.max", "5");
    let router = StoreRouter::new(Arc::new(MemoryBackend::new()), config.snapshot());
    let a = router.handle(&TenantId::from("org_a"));

    for i in 0..10 {
        a.create("vehicles", vehicle(&format!("P-{i}"), i)).await.unwrap();
    }

    assert_eq!(a.find("vehicles", None).await.unwrap().len(), 3);
    assert_eq!(a.find("vehicles", Some(4)).await.unwrap().len(), 4);
    // requested limits are capped at the configured max
    assert_eq!(a.find("vehicles", Some(50)).await.unwrap().len(), 5);
}
