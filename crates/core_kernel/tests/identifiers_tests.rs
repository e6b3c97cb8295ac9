//! Tests for the strongly-typed identifiers

use core_kernel::{ClaimId, PolicyId, PlanId, UserId, HospitalId, NotificationId};
use uuid::Uuid;

#[test]
fn test_new_generates_unique_ids() {
    assert_ne!(ClaimId::new(), ClaimId::new());
}

#[test]
fn test_new_v7_generates_time_ordered_ids() {
    let id1 = ClaimId::new_v7();
    std::thread::sleep(std::time::Duration::from_millis(1));
    let id2 = ClaimId::new_v7();
    let uuid1: Uuid = id1.into();
    let uuid2: Uuid = id2.into();
    assert!(uuid1 < uuid2);
}

#[test]
fn test_display_prefixes() {
    assert!(ClaimId::new().to_string().starts_with("CLM-"));
    assert!(PolicyId::new().to_string().starts_with("POL-"));
    assert!(PlanId::new().to_string().starts_with("PLN-"));
    assert!(UserId::new().to_string().starts_with("USR-"));
    assert!(HospitalId::new().to_string().starts_with("HSP-"));
    assert!(NotificationId::new().to_string().starts_with("NTF-"));
}

#[test]
fn test_roundtrip_through_display() {
    let original = HospitalId::new();
    let parsed: HospitalId = original.to_string().parse().unwrap();
    assert_eq!(original, parsed);
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("CLM-not-a-uuid".parse::<ClaimId>().is_err());
}

#[test]
fn test_serde_is_transparent() {
    let uuid = Uuid::new_v4();
    let id = UserId::from_uuid(uuid);
    let json = serde_json::to_string(&id).unwrap();
    assert_eq!(json, format!("\"{}\"", uuid));

    let back: UserId = serde_json::from_str(&json).unwrap();
    assert_eq!(back, id);
}
