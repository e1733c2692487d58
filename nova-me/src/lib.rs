//! nova-me: 2D avatar animation controller
//!
//! Provides directive-driven character animation with:
//! - A render driver seam ([`RenderDriver`]) with a headless [`TracingDriver`]
//! - Per-parameter interpolation with cancellation and timed micro-timeline frames
//! - Emotion presets scaled by intensity, gaze locking, lip-sync mouth control
//! - An explicit scheduler and clock, so the controller can be stepped deterministically

pub mod clock;
pub mod config;
pub mod controller;
pub mod driver;
pub mod emotion;
pub mod error;
pub mod gaze;
pub mod scheduler;


pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ControllerConfig, PARAM_MOUTH_OPEN_Y};
pub use controller::AvatarController;
pub use driver::{DriverCommand, RenderDriver, TracingDriver};
pub use emotion::{EmotionPreset, ParamOffset, EMOTION_PARAMS};
pub use error::AvatarError;
pub use gaze::{GazeConfig, GazeConfigUpdate, GazeOffset};
pub use scheduler::{Scheduler, TaskHandle};
