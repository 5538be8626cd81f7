//! Applet lifecycle and identity
//!
//! Provides the applet node model, hit-test regions and the registry that
//! assigns identities and notifies placement/removal subscribers.

#[allow(clippy::module_inception)]
mod applet;
mod region;
mod registry;

pub use applet::{Applet, Motion};
pub use region::{AppletRegion, ResizeHandle};
pub use registry::{AppletCallback, AppletRegistry, Placement};
