use super::*;

// =============================================================
// Parsing
// =============================================================

#[test]
fn parse_reads_full_record() {
    let raw = r#"{"version":1,"consent":{"necessary":true,"analytics":true,"marketing":false}}"#;
    let record = ConsentRecord::parse(raw).unwrap();
    assert_eq!(record.version, 1);
    assert!(record.consent.analytics);
    assert!(!record.consent.marketing);
}

#[test]
fn parse_accepts_legacy_shape_with_defaults() {
    let record = ConsentRecord::parse(r#"{"consent":{"analytics":true}}"#).unwrap();
    assert_eq!(record.version, CONSENT_RECORD_VERSION);
    assert!(record.consent.necessary);
    assert!(record.consent.analytics);
    assert!(!record.consent.marketing);
}

#[test]
fn parse_ignores_unknown_fields() {
    let raw = r#"{"consent":{"analytics":false,"functional":true},"updatedAt":"2024-01-01"}"#;
    let record = ConsentRecord::parse(raw).unwrap();
    assert!(!record.consent.analytics);
}

#[test]
fn parse_rejects_malformed_values() {
    for raw in [
        "",
        "true",
        "null",
        "{",
        "{}",
        r#"{"consent":null}"#,
        r#"{"consent":{"analytics":"yes"}}"#,
        r#"{"consent":{"analytics":1}}"#,
        r#"["consent"]"#,
    ] {
        let err = ConsentRecord::parse(raw).unwrap_err();
        assert!(matches!(err, StorageError::Malformed(_)), "{raw:?} gave {err:?}");
    }
}

#[test]
fn to_json_round_trips_through_parse() {
    let raw = ConsentRecord::accepted().to_json().unwrap();
    assert_eq!(
        raw,
        r#"{"version":1,"consent":{"necessary":true,"analytics":true,"marketing":true}}"#
    );
    assert_eq!(ConsentRecord::parse(&raw).unwrap(), ConsentRecord::accepted());
}

// =============================================================
// analytics_allowed
// =============================================================

#[test]
fn analytics_allowed_denies_absent_record() {
    assert!(!analytics_allowed(None));
}

#[test]
fn analytics_allowed_follows_flag() {
    assert!(analytics_allowed(Some(&ConsentRecord::accepted())));
    assert!(!analytics_allowed(Some(&ConsentRecord::revoked())));
}
