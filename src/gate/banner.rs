//! Consent banner lifecycle.

#[cfg(test)]
#[path = "banner_test.rs"]
mod banner_test;

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use crate::config::BannerOptions;
use crate::state::banner::{BannerEffect, BannerEvent, BannerPhase, BannerState, ConsentDecision};
use crate::state::consent::ConsentRecord;
use crate::storage::ConsentStore;
use crate::util::teardown::Teardown;
use crate::util::timer::Scheduler;

type PhaseObserver = Rc<dyn Fn(BannerPhase)>;

struct BannerInner {
    state: BannerState,
    store: ConsentStore,
    scheduler: Rc<dyn Scheduler>,
    options: BannerOptions,
    pending_display: Option<Teardown>,
    observer: Option<PhaseObserver>,
}

/// Drives one mounted consent banner.
pub struct BannerController {
    inner: Rc<RefCell<BannerInner>>,
}

impl BannerController {
    pub fn new(store: ConsentStore, scheduler: Rc<dyn Scheduler>, options: BannerOptions) -> Self {
        let inner = BannerInner {
            state: BannerState::new(options.decline_policy),
            store,
            scheduler,
            options,
            pending_display: None,
            observer: None,
        };
        Self { inner: Rc::new(RefCell::new(inner)) }
    }

    /// Called with the new phase after every transition.
    pub fn on_change(&self, observer: impl Fn(BannerPhase) + 'static) {
        self.inner.borrow_mut().observer = Some(Rc::new(observer));
    }

    /// Check the store and either hide for good or start the quiet period.
    pub fn mount(&self) {
        let has_record = self.inner.borrow().store.has_record();
        dispatch(&self.inner, BannerEvent::Mounted { has_record });
    }

    pub fn accept(&self) {
        dispatch(&self.inner, BannerEvent::Accept);
    }

    pub fn decline(&self) {
        dispatch(&self.inner, BannerEvent::Decline);
    }

    pub fn dismiss(&self) {
        dispatch(&self.inner, BannerEvent::Dismiss);
    }

    /// Release the pending timer and observer. Safe to call more than once.
    pub fn unmount(&self) {
        dispatch(&self.inner, BannerEvent::Unmount);
        let (timer, observer) = {
            let mut inner = self.inner.borrow_mut();
            (inner.pending_display.take(), inner.observer.take())
        };
        drop(timer);
        drop(observer);
    }

    pub fn phase(&self) -> BannerPhase {
        self.inner.borrow().state.phase
    }

    pub fn decision(&self) -> ConsentDecision {
        self.inner.borrow().state.decision
    }

    pub fn is_visible(&self) -> bool {
        self.inner.borrow().state.is_visible()
    }
}

fn dispatch(inner: &Rc<RefCell<BannerInner>>, event: BannerEvent) {
    let (before, effect) = {
        let mut guard = inner.borrow_mut();
        let before = guard.state.phase;
        (before, guard.state.apply(event))
    };
    if let Some(effect) = effect {
        run_effect(inner, effect);
    }

    let (after, observer) = {
        let guard = inner.borrow();
        (guard.state.phase, guard.observer.clone())
    };
    if after != before {
        if let Some(observer) = observer {
            observer(after);
        }
    }
}

fn run_effect(inner: &Rc<RefCell<BannerInner>>, effect: BannerEffect) {
    match effect {
        BannerEffect::ScheduleDisplay => {
            let (scheduler, delay) = {
                let guard = inner.borrow();
                (Rc::clone(&guard.scheduler), guard.options.quiet_period)
            };
            let weak: Weak<RefCell<BannerInner>> = Rc::downgrade(inner);
            let timer = scheduler.schedule(
                delay,
                Box::new(move || {
                    if let Some(inner) = weak.upgrade() {
                        let has_record = inner.borrow().store.has_record();
                        dispatch(&inner, BannerEvent::QuietPeriodElapsed { has_record });
                    }
                }),
            );
            inner.borrow_mut().pending_display = Some(timer);
        }
        BannerEffect::CancelDisplay => {
            let timer = inner.borrow_mut().pending_display.take();
            if let Some(timer) = timer {
                timer.release();
            }
        }
        BannerEffect::PersistAcceptance => write(inner, &ConsentRecord::accepted()),
        BannerEffect::PersistDecline => write(inner, &ConsentRecord::revoked()),
    }
}

fn write(inner: &Rc<RefCell<BannerInner>>, record: &ConsentRecord) {
    // Cloned out so same-tab listeners may inspect the banner while notified.
    let store = inner.borrow().store.clone();
    store.write(record);
}
