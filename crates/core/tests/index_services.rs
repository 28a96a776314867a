use hostdiff_core::diff::{index_services, ServiceKey};
use hostdiff_core::model::{Scalar, Service, Snapshot};
use serde_json::json;

#[test]
fn index_skips_services_missing_identity() {
    let snap = Snapshot::from_value(&json!({"services": [
        {"port": 80, "protocol": "HTTP"},
        {"port": 443},
        {"protocol": "SSH"},
        {"port": "not-a-port", "protocol": "FTP"}
    ]}))
    .unwrap();

    let index = index_services(&snap);
    assert_eq!(index.keys().cloned().collect::<Vec<_>>(), vec![ServiceKey::new(80, "HTTP")]);
}

#[test]
fn later_duplicate_overwrites_earlier() {
    let snap = Snapshot::new(vec![
        Service::new(80, "HTTP").with_status(200),
        Service::new(22, "SSH"),
        Service::new(80, "HTTP").with_status(503),
    ]);

    let index = index_services(&snap);
    assert_eq!(index.len(), 2);
    assert_eq!(index[&ServiceKey::new(80, "HTTP")].status, Some(Scalar::Integer(503)));
}

#[test]
fn index_does_not_touch_input() {
    let snap = Snapshot::new(vec![Service::new(80, "HTTP"), Service::new(80, "HTTP")]);
    let before = snap.clone();
    let _ = index_services(&snap);
    assert_eq!(snap, before);
}

#[test]
fn index_of_absent_list_is_empty() {
    assert!(index_services(&Snapshot::default()).is_empty());
}
