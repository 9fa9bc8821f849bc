//! Consent banner state machine.
//!
//! ```text
//! Init ──Mounted{has_record}──> Hidden
//!  │
//!  └──Mounted{no record}──> PendingDisplay ──QuietPeriodElapsed{no record}──> Shown
//!                               │                                             │
//!                               └──Unmount / QuietPeriodElapsed{has_record}──> Hidden <──Accept/Decline/Dismiss/Unmount
//! ```
//!
//! `Hidden` is terminal. The reducer only reports which side effect the
//! caller owes; it never performs one.

#[cfg(test)]
#[path = "banner_test.rs"]
mod banner_test;

/// Where the banner is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BannerPhase {
    #[default]
    Init,
    /// No record found; waiting out the quiet period before prompting.
    PendingDisplay,
    Shown,
    Hidden,
}

/// Banner-local outcome. Never persisted on its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConsentDecision {
    #[default]
    Unknown,
    Shown,
    Accepted,
    Declined,
    Dismissed,
}

/// What happens when the user clicks Decline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DeclinePolicy {
    /// Hide for this session only; the prompt returns on the next visit.
    #[default]
    SessionOnly,
    /// Write a revoked record so the prompt stays away.
    Persist,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerEvent {
    Mounted { has_record: bool },
    /// `has_record` is re-read when the delay ends, since another tab may
    /// have decided in the meantime.
    QuietPeriodElapsed { has_record: bool },
    Accept,
    Decline,
    Dismiss,
    Unmount,
}

/// Side effects the owner of a [`BannerState`] must carry out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BannerEffect {
    ScheduleDisplay,
    CancelDisplay,
    PersistAcceptance,
    PersistDecline,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BannerState {
    pub phase: BannerPhase,
    pub decision: ConsentDecision,
    pub decline_policy: DeclinePolicy,
}

impl BannerState {
    pub fn new(decline_policy: DeclinePolicy) -> Self {
        Self { decline_policy, ..Self::default() }
    }

    pub fn is_visible(&self) -> bool {
        self.phase == BannerPhase::Shown
    }

    /// Advance the machine. Events that make no sense in the current phase
    /// are ignored and return `None`.
    pub fn apply(&mut self, event: BannerEvent) -> Option<BannerEffect> {
        match (self.phase, event) {
            (BannerPhase::Init, BannerEvent::Mounted { has_record: true }) => {
                self.phase = BannerPhase::Hidden;
                None
            }
            (BannerPhase::Init, BannerEvent::Mounted { has_record: false }) => {
                self.phase = BannerPhase::PendingDisplay;
                Some(BannerEffect::ScheduleDisplay)
            }
            (BannerPhase::Init, BannerEvent::Unmount) => {
                self.phase = BannerPhase::Hidden;
                None
            }
            (BannerPhase::PendingDisplay, BannerEvent::QuietPeriodElapsed { has_record: true }) => {
                self.phase = BannerPhase::Hidden;
                None
            }
            (BannerPhase::PendingDisplay, BannerEvent::QuietPeriodElapsed { has_record: false }) => {
                self.phase = BannerPhase::Shown;
                self.decision = ConsentDecision::Shown;
                None
            }
            (BannerPhase::PendingDisplay, BannerEvent::Unmount) => {
                self.phase = BannerPhase::Hidden;
                Some(BannerEffect::CancelDisplay)
            }
            (BannerPhase::Shown, BannerEvent::Accept) => {
                self.phase = BannerPhase::Hidden;
                self.decision = ConsentDecision::Accepted;
                Some(BannerEffect::PersistAcceptance)
            }
            (BannerPhase::Shown, BannerEvent::Decline) => {
                self.phase = BannerPhase::Hidden;
                self.decision = ConsentDecision::Declined;
                match self.decline_policy {
                    DeclinePolicy::SessionOnly => None,
                    DeclinePolicy::Persist => Some(BannerEffect::PersistDecline),
                }
            }
            (BannerPhase::Shown, BannerEvent::Dismiss) => {
                self.phase = BannerPhase::Hidden;
                self.decision = ConsentDecision::Dismissed;
                None
            }
            (BannerPhase::Shown, BannerEvent::Unmount) => {
                self.phase = BannerPhase::Hidden;
                None
            }
            _ => None,
        }
    }
}
