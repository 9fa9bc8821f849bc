//! Controllers that run the consent state machines against real resources.
//!
//! SYSTEM CONTEXT
//! ==============
//! Each controller owns the timers and subscriptions for one mounted
//! component. Storage and scheduling are injected, so the same code drives
//! the browser components and the deterministic tests. Dropping or
//! unmounting a controller releases everything it acquired.

pub mod banner;
pub mod loader;

pub use banner::BannerController;
pub use loader::LoaderController;
