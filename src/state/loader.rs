//! Script presence decision for the consent-aware loader.

#[cfg(test)]
#[path = "loader_test.rs"]
mod loader_test;

/// Whether the gated vendor tag is in the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ScriptState {
    #[default]
    Absent,
    Present,
}

impl ScriptState {
    pub fn is_present(self) -> bool {
        self == Self::Present
    }
}

/// Configuration is checked before consent: an unconfigured vendor never
/// loads, whatever the user decided.
pub fn script_state(configured: bool, analytics_allowed: bool) -> ScriptState {
    if configured && analytics_allowed { ScriptState::Present } else { ScriptState::Absent }
}
