//! Core type definitions for the applet compositor
//!
//! Identity and kind are the two tags every applet carries across the
//! boundary between the compositor and applet implementations.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Process-unique applet identity
///
/// Assigned once, on first placement, and never changed afterwards. It is the
/// join key between an applet and its entry in the z-order mirror.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AppletId(String);

impl AppletId {
    /// Generate a fresh random identity
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for AppletId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AppletId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for AppletId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Applet discriminator
///
/// Opaque to the compositor: it is carried through snapshots and screen rects
/// but never changes how an applet is moved, resized or stacked.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppletKind {
    Sticky,
    Webview,
    Appview,
    #[default]
    Test,
    /// Any kind the compositor has no name for
    #[serde(untagged)]
    Other(String),
}

impl AppletKind {
    /// Parse from string ID (e.g. "sticky", "webview")
    pub fn from_id(id: &str) -> Self {
        match id {
            "sticky" => AppletKind::Sticky,
            "webview" => AppletKind::Webview,
            "appview" => AppletKind::Appview,
            "test" => AppletKind::Test,
            other => AppletKind::Other(other.to_string()),
        }
    }

    /// Get the string ID for this kind
    pub fn id(&self) -> &str {
        match self {
            AppletKind::Sticky => "sticky",
            AppletKind::Webview => "webview",
            AppletKind::Appview => "appview",
            AppletKind::Test => "test",
            AppletKind::Other(id) => id,
        }
    }
}
