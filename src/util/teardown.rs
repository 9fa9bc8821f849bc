//! Scoped release handle for timers and listeners.

#[cfg(test)]
#[path = "teardown_test.rs"]
mod teardown_test;

use std::fmt;

/// Releases an acquired resource exactly once, either explicitly through
/// [`Teardown::release`] or when dropped.
#[must_use = "dropping a Teardown releases the resource immediately"]
pub struct Teardown {
    release: Option<Box<dyn FnOnce()>>,
}

impl Teardown {
    pub fn new(release: impl FnOnce() + 'static) -> Self {
        Self { release: Some(Box::new(release)) }
    }

    /// Handle for a resource that was never acquired.
    pub fn noop() -> Self {
        Self { release: None }
    }

    pub fn release(mut self) {
        self.run();
    }

    /// Whether dropping this handle still has something to release.
    pub fn is_armed(&self) -> bool {
        self.release.is_some()
    }

    fn run(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

impl Drop for Teardown {
    fn drop(&mut self) {
        self.run();
    }
}

impl fmt::Debug for Teardown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Teardown").field("armed", &self.is_armed()).finish()
    }
}
