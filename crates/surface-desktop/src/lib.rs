//! Compositor core for the Surface virtual desktop
//!
//! This crate owns everything about a desktop session except drawing applet
//! content:
//! - Camera pan/zoom over a large fixed-size surface
//! - Applet placement, identity and removal
//! - Z-order with derived, contiguous stacking values
//! - Drag and resize gestures (edge/corner handles and quadrant resize)
//! - A frame loop that applies pending pan once per frame
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                    DesktopEngine                     │
//! │  ┌────────┐ ┌────────────────┐ ┌─────────────────┐   │
//! │  │ Camera │ │ AppletRegistry │ │ ZOrderRegistry  │   │
//! │  └────────┘ └────────────────┘ └─────────────────┘   │
//! │  ┌──────────────────────────┐ ┌──────────────────┐   │
//! │  │ InputRouter (one gesture)│ │    FrameLoop     │   │
//! │  └──────────────────────────┘ └──────────────────┘   │
//! └──────────────────────────────────────────────────────┘
//! ```
//!
//! - [`math`]: `Vec2`, `Size`, `Rect`
//! - [`camera`]: pan/scale state and coordinate conversion
//! - [`applet`]: applet nodes, hit regions and the registry
//! - [`zorder`]: stacking order mirror
//! - [`input`]: pointer/keyboard routing and gesture controllers
//! - [`frame`]: per-frame camera application and wallpaper redraw
//! - [`persistence`]: snapshots handed to the save hook
//!
//! ## Example
//!
//! ```rust
//! use surface_desktop::{Applet, AppletKind, DesktopConfig, DesktopEngine, Rect, Vec2};
//!
//! let mut engine = DesktopEngine::new(DesktopConfig::default()).unwrap();
//! let id = engine
//!     .add_applet(Applet::new(AppletKind::Sticky, Rect::new(100.0, 100.0, 200.0, 150.0)))
//!     .unwrap();
//!
//! engine.start_drag(&id, Vec2::new(0.0, 0.0)).unwrap();
//! engine.handle_pointer_move(Vec2::new(50.0, 0.0));
//! engine.handle_pointer_up();
//!
//! assert_eq!(engine.applet(&id).unwrap().rect().x, 150.0);
//! ```
//!
//! ## Design Principles
//!
//! 1. **Pure Rust Core**: no browser types outside the `wasm` feature
//! 2. **Single Writer**: only the engine mutates applet geometry and order
//! 3. **Derived Order**: stacking values come from the z-order mirror alone

pub mod applet;
pub mod camera;
pub mod config;
pub mod error;
pub mod frame;
pub mod input;
pub mod math;
pub mod persistence;
pub mod types;
pub mod zorder;

mod engine;

// WASM exports (only available with "wasm" feature)
#[cfg(feature = "wasm")]
mod wasm;
#[cfg(feature = "wasm")]
pub use wasm::*;

pub use applet::{Applet, AppletRegion, AppletRegistry, Motion, Placement, ResizeHandle};
pub use camera::Camera;
pub use config::DesktopConfig;
pub use error::{DesktopError, DesktopResult};
pub use frame::{FrameInfo, FrameLoop, SurfaceTransform, Wallpaper};
pub use input::{GestureKind, InputResult, InputRouter, Key, PointerButton, ResizeVariant};
pub use math::{Rect, Size, Vec2};
pub use persistence::{AppletSnapshot, NoopPersistence, Persistence, SaveReason, Snapshot};
pub use types::{AppletId, AppletKind};
pub use zorder::ZOrderRegistry;

pub use engine::{AppletScreenRect, DesktopEngine};
