use super::*;

#[test]
fn script_state_default_is_absent() {
    assert_eq!(ScriptState::default(), ScriptState::Absent);
    assert!(!ScriptState::default().is_present());
}

#[test]
fn script_present_only_when_configured_and_allowed() {
    assert_eq!(script_state(true, true), ScriptState::Present);
    assert_eq!(script_state(true, false), ScriptState::Absent);
    assert_eq!(script_state(false, true), ScriptState::Absent);
    assert_eq!(script_state(false, false), ScriptState::Absent);
}
