//! Error types for the applet compositor
//!
//! Almost every error here is an integration bug (an identity used before it
//! was placed, a gesture claimed twice) rather than a recoverable runtime
//! fault. They are returned instead of ignored so callers see them early.

use crate::input::GestureKind;
use crate::types::AppletId;

/// Errors that can occur in compositor operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DesktopError {
    /// No live applet has the given identity
    AppletNotFound(AppletId),

    /// The identity has no z-order mirror (never registered, or already removed)
    NotMirrored(AppletId),

    /// The identity is already live; identities are never reused in a session
    DuplicateIdentity(AppletId),

    /// A gesture tried to claim the controller flag while another held it
    GestureAlreadyActive {
        /// The gesture currently holding the flag
        active: GestureKind,
        /// The gesture that tried to claim it
        requested: GestureKind,
    },

    /// An operation was attempted that is not valid in the current state
    InvalidOperation {
        /// The operation that was attempted
        op: &'static str,
        /// Why the operation failed
        reason: &'static str,
    },

    /// JSON serialization or deserialization failed
    SerializationError(String),

    /// A render collaborator (e.g. the wallpaper) failed
    RenderError(String),
}

impl std::fmt::Display for DesktopError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AppletNotFound(id) => write!(f, "applet not found: {}", id),
            Self::NotMirrored(id) => write!(f, "applet has no z-order mirror: {}", id),
            Self::DuplicateIdentity(id) => write!(f, "duplicate applet identity: {}", id),
            Self::GestureAlreadyActive { active, requested } => write!(
                f,
                "cannot start {:?} gesture while {:?} gesture is active",
                requested, active
            ),
            Self::InvalidOperation { op, reason } => {
                write!(f, "invalid operation '{}': {}", op, reason)
            }
            Self::SerializationError(msg) => write!(f, "serialization error: {}", msg),
            Self::RenderError(msg) => write!(f, "render error: {}", msg),
        }
    }
}

impl std::error::Error for DesktopError {}

impl From<serde_json::Error> for DesktopError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}

/// Result type alias for compositor operations
pub type DesktopResult<T> = Result<T, DesktopError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = DesktopError::AppletNotFound(AppletId::from("a1"));
        assert_eq!(err.to_string(), "applet not found: a1");

        let err = DesktopError::NotMirrored(AppletId::from("a2"));
        assert_eq!(err.to_string(), "applet has no z-order mirror: a2");

        let err = DesktopError::GestureAlreadyActive {
            active: GestureKind::Pan,
            requested: GestureKind::Drag,
        };
        assert_eq!(
            err.to_string(),
            "cannot start Drag gesture while Pan gesture is active"
        );

        let err = DesktopError::InvalidOperation {
            op: "lift",
            reason: "applet is being removed",
        };
        assert_eq!(
            err.to_string(),
            "invalid operation 'lift': applet is being removed"
        );
    }

    #[test]
    fn test_serde_error_converts() {
        let err: DesktopError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, DesktopError::SerializationError(_)));
    }
}
