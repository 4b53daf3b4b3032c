//! Registry round-trip tests

use domain_party::{Client, Collector, CollectorStatus, PartyError};

#[test]
fn test_client_serializes_with_wire_fields() {
    let client = Client::new("Maria Perez", "001-1234567-8")
        .unwrap()
        .with_phone("809-555-0134")
        .unwrap()
        .with_address("Calle Duarte 12");

    let json = serde_json::to_value(&client).unwrap();
    assert_eq!(json["full_name"], "Maria Perez");
    assert_eq!(json["document_id"], "001-1234567-8");
    assert_eq!(json["active"], true);

    let back: Client = serde_json::from_value(json).unwrap();
    assert_eq!(back, client);
}

#[test]
fn test_collector_status_survives_round_trip() {
    let mut collector = Collector::new("Pedro Gomez").unwrap();
    collector.assign_zone("Villa Consuelo");
    collector.set_status(CollectorStatus::Suspended);

    let json = serde_json::to_string(&collector).unwrap();
    let back: Collector = serde_json::from_str(&json).unwrap();
    assert_eq!(back, collector);
}

#[test]
fn test_validation_errors_name_the_field() {
    let err = Client::new("", "001-1234567-8").unwrap_err();
    match err {
        PartyError::Validation { field, .. } => assert_eq!(field, "full_name"),
        other => panic!("expected validation error, got {other}"),
    }
}
