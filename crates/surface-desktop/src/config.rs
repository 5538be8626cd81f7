//! Desktop configuration
//!
//! Tunables for one desktop session. Every field has a default, so a host can
//! pass a partial JSON object (or none at all).

use serde::{Deserialize, Serialize};

use crate::error::{DesktopError, DesktopResult};
use crate::math::Size;

/// Configuration for a [`DesktopEngine`](crate::DesktopEngine)
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DesktopConfig {
    /// Smallest camera scale reachable by wheel or keyboard zoom
    pub min_zoom: f32,
    /// Largest camera scale
    pub max_zoom: f32,
    /// Scale change per keyboard zoom step
    pub zoom_step: f32,
    /// Multiplicative scale change per wheel notch
    pub wheel_zoom_factor: f32,
    /// Size of the surface in surface pixels
    pub content_size: Size,
    /// Initial viewport size in screen pixels
    pub viewport_size: Size,
    /// Minimum applet size used when an applet has no minimum of its own
    pub min_applet_size: Size,
    /// Thickness of the invisible edge/corner resize handles (surface px)
    pub resize_handle_size: f32,
    /// Height of the drag handle strip along an applet's top edge (surface px)
    pub drag_handle_height: f32,
    /// Size given to applets created by `place_at_center` without an explicit size
    pub default_applet_size: Size,
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.1,
            max_zoom: 1.0,
            zoom_step: 0.1,
            wheel_zoom_factor: 1.1,
            content_size: Size::new(10_000.0, 10_000.0),
            viewport_size: Size::new(1920.0, 1080.0),
            min_applet_size: Size::new(100.0, 60.0),
            resize_handle_size: 8.0,
            drag_handle_height: 24.0,
            default_applet_size: Size::new(400.0, 300.0),
        }
    }
}

impl DesktopConfig {
    /// Parse a configuration from JSON, filling missing fields with defaults
    pub fn from_json(json: &str) -> DesktopResult<Self> {
        let config: DesktopConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations the camera and controllers cannot work with
    pub fn validate(&self) -> DesktopResult<()> {
        if !(self.min_zoom.is_finite() && self.min_zoom > 0.0) {
            return Err(invalid("min_zoom must be positive"));
        }
        if !self.max_zoom.is_finite() {
            return Err(invalid("max_zoom must be finite"));
        }
        if self.min_zoom > self.max_zoom {
            return Err(invalid("min_zoom exceeds max_zoom"));
        }
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            return Err(invalid("zoom_step must be positive"));
        }
        if !(self.wheel_zoom_factor.is_finite() && self.wheel_zoom_factor > 1.0) {
            return Err(invalid("wheel_zoom_factor must be greater than 1"));
        }
        if !valid_size(self.content_size) {
            return Err(invalid("content_size must be finite and non-negative"));
        }
        if !valid_size(self.viewport_size) {
            return Err(invalid("viewport_size must be finite and non-negative"));
        }
        if !valid_size(self.min_applet_size) {
            return Err(invalid("min_applet_size must be finite and non-negative"));
        }
        if !valid_size(self.default_applet_size) {
            return Err(invalid("default_applet_size must be finite and non-negative"));
        }
        if !valid_length(self.resize_handle_size) || !valid_length(self.drag_handle_height) {
            return Err(invalid("handle sizes must be finite and non-negative"));
        }
        Ok(())
    }
}

fn invalid(reason: &'static str) -> DesktopError {
    DesktopError::InvalidOperation {
        op: "validate_config",
        reason,
    }
}

fn valid_length(value: f32) -> bool {
    value.is_finite() && value >= 0.0
}

fn valid_size(size: Size) -> bool {
    valid_length(size.width) && valid_length(size.height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_zoom_range() {
        let config = DesktopConfig::default();
        assert!((config.min_zoom - 0.1).abs() < 0.001);
        assert!((config.max_zoom - 1.0).abs() < 0.001);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = DesktopConfig::from_json(r#"{ "max_zoom": 2.0 }"#).unwrap();
        assert!((config.max_zoom - 2.0).abs() < 0.001);
        assert!((config.min_zoom - 0.1).abs() < 0.001);
        assert_eq!(config.min_applet_size, Size::new(100.0, 60.0));
    }

    #[test]
    fn test_inverted_zoom_range_rejected() {
        let err = DesktopConfig::from_json(r#"{ "min_zoom": 2.0, "max_zoom": 1.0 }"#).unwrap_err();
        assert_eq!(
            err,
            DesktopError::InvalidOperation {
                op: "validate_config",
                reason: "min_zoom exceeds max_zoom",
            }
        );
    }

    fn rejection(config: DesktopConfig) -> &'static str {
        match config.validate() {
            Err(DesktopError::InvalidOperation { reason, .. }) => reason,
            other => panic!("expected rejection, got {:?}", other),
        }
    }

    #[test]
    fn test_zero_zoom_step_rejected() {
        let err = DesktopConfig::from_json(r#"{ "zoom_step": 0 }"#).unwrap_err();
        assert_eq!(err, invalid("zoom_step must be positive"));

        let config = DesktopConfig {
            zoom_step: -0.1,
            ..Default::default()
        };
        assert_eq!(rejection(config), "zoom_step must be positive");
    }

    #[test]
    fn test_non_finite_zoom_rejected() {
        let config = DesktopConfig {
            max_zoom: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(rejection(config), "max_zoom must be finite");

        let config = DesktopConfig {
            wheel_zoom_factor: f32::INFINITY,
            ..Default::default()
        };
        assert_eq!(rejection(config), "wheel_zoom_factor must be greater than 1");

        let config = DesktopConfig {
            min_zoom: f32::NAN,
            ..Default::default()
        };
        assert_eq!(rejection(config), "min_zoom must be positive");
    }

    #[test]
    fn test_bad_sizes_rejected() {
        let config = DesktopConfig {
            content_size: Size::new(-1.0, 100.0),
            ..Default::default()
        };
        assert_eq!(rejection(config), "content_size must be finite and non-negative");

        let config = DesktopConfig {
            viewport_size: Size::new(800.0, f32::NAN),
            ..Default::default()
        };
        assert_eq!(rejection(config), "viewport_size must be finite and non-negative");

        let config = DesktopConfig {
            min_applet_size: Size::new(f32::INFINITY, 60.0),
            ..Default::default()
        };
        assert_eq!(rejection(config), "min_applet_size must be finite and non-negative");

        let config = DesktopConfig {
            resize_handle_size: -2.0,
            ..Default::default()
        };
        assert_eq!(rejection(config), "handle sizes must be finite and non-negative");
    }

    #[test]
    fn test_malformed_json_is_serialization_error() {
        let err = DesktopConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, DesktopError::SerializationError(_)));
    }
}
