//! Avatar directive: one instruction for the avatar, produced by the generation
//! pipeline and consumed by the animation controller.
//!
//! The JSON field names are the interoperability contract between both halves,
//! so everything here serializes in camelCase with lowercase enum values.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use thiserror::Error;

/// Spoken line used whenever the model could not produce a usable directive.
pub const FALLBACK_SPOKEN_TEXT: &str =
    "Sorry, I had trouble putting a reply together. Could you say that again?";

const FALLBACK_INTENSITY: f64 = 0.2;

/// Emotion carried by a directive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emotion {
    Neutral,
    Happy,
    Sad,
    Angry,
    Shy,
    Excited,
    Tired,
    Surprised,
}

impl Emotion {
    pub const ALL: [Emotion; 8] = [
        Emotion::Neutral,
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Shy,
        Emotion::Excited,
        Emotion::Tired,
        Emotion::Surprised,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Emotion::Neutral => "neutral",
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Shy => "shy",
            Emotion::Excited => "excited",
            Emotion::Tired => "tired",
            Emotion::Surprised => "surprised",
        }
    }
}

impl fmt::Display for Emotion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Motion priority forwarded to the render driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MotionPriority {
    Idle,
    Normal,
    Force,
}

impl MotionPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            MotionPriority::Idle => "idle",
            MotionPriority::Normal => "normal",
            MotionPriority::Force => "force",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gesture {
    #[serde(deserialize_with = "present_nullable")]
    pub motion: Option<String>,
    pub priority: MotionPriority,
}

/// One parameter target inside a micro-timeline frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamFrame {
    pub id: String,
    pub value: f64,
    /// Seconds; zero means a direct write
    pub fade: f64,
}

/// Parameter targets that fire `t` seconds after the directive is applied
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineFrame {
    pub t: f64,
    pub params: Vec<ParamFrame>,
}

/// Speech-synthesis hints
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TtsHints {
    #[serde(deserialize_with = "present_nullable")]
    pub voice: Option<String>,
    #[serde(deserialize_with = "present_nullable")]
    pub speed: Option<f64>,
    #[serde(deserialize_with = "present_nullable")]
    pub pitch: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Directive {
    pub spoken_text: String,
    pub emotion: Emotion,
    /// Scales emotion preset offsets, in [0, 1]
    pub intensity: f64,
    pub gesture: Gesture,
    /// Explicit expression override; `None` lets the controller derive one from `emotion`
    #[serde(deserialize_with = "present_nullable")]
    pub expression: Option<String>,
    pub micro_timeline: Vec<TimelineFrame>,
    pub tts: TtsHints,
}

/// Why a candidate directive was rejected
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DirectiveError {
    /// Not JSON, or a field is missing or has the wrong type
    #[error("Malformed directive: {0}")]
    Parse(String),

    /// Well-formed but outside the allowed ranges
    #[error("Invalid directive field `{field}`: {reason}")]
    Invalid { field: String, reason: String },
}

impl DirectiveError {
    pub fn is_parse(&self) -> bool {
        matches!(self, DirectiveError::Parse(_))
    }

    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        DirectiveError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

/// Nullable but required: the key has to be present even when its value is `null`.
fn present_nullable<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)
}

impl Directive {
    /// The fixed directive substituted when generation fails
    pub fn fallback() -> Self {
        Self {
            spoken_text: FALLBACK_SPOKEN_TEXT.to_string(),
            emotion: Emotion::Neutral,
            intensity: FALLBACK_INTENSITY,
            gesture: Gesture {
                motion: None,
                priority: MotionPriority::Idle,
            },
            expression: None,
            micro_timeline: Vec::new(),
            tts: TtsHints::default(),
        }
    }

    /// Parse and validate a JSON document
    pub fn from_json_str(text: &str) -> Result<Self, DirectiveError> {
        let directive: Directive =
            serde_json::from_str(text).map_err(|e| DirectiveError::Parse(e.to_string()))?;
        directive.validate()?;
        Ok(directive)
    }

    /// Parse and validate an already-decoded JSON value
    pub fn from_value(value: serde_json::Value) -> Result<Self, DirectiveError> {
        let directive: Directive =
            serde_json::from_value(value).map_err(|e| DirectiveError::Parse(e.to_string()))?;
        directive.validate()?;
        Ok(directive)
    }

    pub fn to_json(&self) -> Result<String, DirectiveError> {
        serde_json::to_string(self).map_err(|e| DirectiveError::Parse(e.to_string()))
    }

    /// Range checks the type system cannot express
    pub fn validate(&self) -> Result<(), DirectiveError> {
        if !self.intensity.is_finite() || !(0.0..=1.0).contains(&self.intensity) {
            return Err(DirectiveError::invalid(
                "intensity",
                format!("must be within [0, 1], got {}", self.intensity),
            ));
        }

        for (i, frame) in self.micro_timeline.iter().enumerate() {
            if !frame.t.is_finite() || frame.t < 0.0 {
                return Err(DirectiveError::invalid(
                    format!("microTimeline[{}].t", i),
                    format!("must be a non-negative number, got {}", frame.t),
                ));
            }
            for (j, param) in frame.params.iter().enumerate() {
                if !param.value.is_finite() {
                    return Err(DirectiveError::invalid(
                        format!("microTimeline[{}].params[{}].value", i, j),
                        "must be finite",
                    ));
                }
                if !param.fade.is_finite() || param.fade < 0.0 {
                    return Err(DirectiveError::invalid(
                        format!("microTimeline[{}].params[{}].fade", i, j),
                        format!("must be a non-negative number, got {}", param.fade),
                    ));
                }
            }
        }

        if let Some(speed) = self.tts.speed {
            if !speed.is_finite() {
                return Err(DirectiveError::invalid("tts.speed", "must be finite"));
            }
        }
        if let Some(pitch) = self.tts.pitch {
            if !pitch.is_finite() {
                return Err(DirectiveError::invalid("tts.pitch", "must be finite"));
            }
        }

        Ok(())
    }
}
