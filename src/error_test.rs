use super::*;

#[test]
fn storage_error_messages_name_the_failure() {
    assert_eq!(
        StorageError::Unavailable("localStorage disabled".into()).to_string(),
        "storage unavailable: localStorage disabled"
    );
    assert_eq!(
        StorageError::Malformed("expected value at line 1 column 1".into()).to_string(),
        "malformed consent record: expected value at line 1 column 1"
    );
}

#[test]
fn config_error_messages_include_variable_and_value() {
    let err = ConfigError::Placeholder { var: "GA_MEASUREMENT_ID", value: "G-XXXXXXXXXX".into() };
    assert_eq!(err.to_string(), "GA_MEASUREMENT_ID is still the placeholder value 'G-XXXXXXXXXX'");

    let err = ConfigError::InvalidNumber { var: "CONSENT_BANNER_DELAY_MS", value: "soon".into() };
    assert_eq!(err.to_string(), "CONSENT_BANNER_DELAY_MS is not a valid number: 'soon'");
}
