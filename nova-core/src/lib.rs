//! nova-core: shared contract between the directive pipeline and the avatar controller
//!
//! Provides:
//! - The avatar directive wire schema (speech text, emotion, gesture, micro-timeline, TTS hints)
//! - Parsing plus range validation of model output
//! - The fixed fallback directive
//! - Core error type every crate converts into

pub mod directive;
pub mod error;

pub use directive::{
    Directive, DirectiveError, Emotion, Gesture, MotionPriority, ParamFrame, TimelineFrame,
    TtsHints, FALLBACK_SPOKEN_TEXT,
};
pub use error::{Error, Result};
