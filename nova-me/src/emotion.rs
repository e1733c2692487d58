//! Emotion presets over standard Cubism face parameters

use nova_core::Emotion;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const PARAM_MOUTH_FORM: &str = "ParamMouthForm";
pub const PARAM_EYE_L_SMILE: &str = "ParamEyeLSmile";
pub const PARAM_EYE_R_SMILE: &str = "ParamEyeRSmile";
pub const PARAM_BROW_L_Y: &str = "ParamBrowLY";
pub const PARAM_BROW_R_Y: &str = "ParamBrowRY";
pub const PARAM_CHEEK: &str = "ParamCheek";
pub const PARAM_EYE_L_OPEN: &str = "ParamEyeLOpen";
pub const PARAM_EYE_R_OPEN: &str = "ParamEyeROpen";

/// Every parameter an emotion preset may touch
pub const EMOTION_PARAMS: [&str; 8] = [
    PARAM_MOUTH_FORM,
    PARAM_EYE_L_SMILE,
    PARAM_EYE_R_SMILE,
    PARAM_BROW_L_Y,
    PARAM_BROW_R_Y,
    PARAM_CHEEK,
    PARAM_EYE_L_OPEN,
    PARAM_EYE_R_OPEN,
];

/// Offset of one parameter from its rest value at full intensity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamOffset {
    pub id: String,
    pub offset: f32,
}

/// Parameters driven by an emotion. Parameters not listed keep whatever value they have.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmotionPreset {
    pub offsets: Vec<ParamOffset>,
}

impl EmotionPreset {
    fn from_pairs(pairs: &[(&str, f32)]) -> Self {
        Self {
            offsets: pairs
                .iter()
                .map(|(id, offset)| ParamOffset {
                    id: id.to_string(),
                    offset: *offset,
                })
                .collect(),
        }
    }

    /// `rest + offset × intensity` for each listed parameter
    pub fn targets<'a>(
        &'a self,
        intensity: f32,
        rest: &'a HashMap<String, f32>,
    ) -> impl Iterator<Item = (&'a str, f32)> + 'a {
        self.offsets.iter().map(move |p| {
            let base = rest.get(&p.id).copied().unwrap_or(0.0);
            (p.id.as_str(), base + p.offset * intensity)
        })
    }
}

/// Rest pose: eyes open, everything else at zero
pub fn default_rest_pose() -> HashMap<String, f32> {
    EMOTION_PARAMS
        .iter()
        .map(|id| {
            let rest = if *id == PARAM_EYE_L_OPEN || *id == PARAM_EYE_R_OPEN { 1.0 } else { 0.0 };
            (id.to_string(), rest)
        })
        .collect()
}

pub fn default_presets() -> HashMap<Emotion, EmotionPreset> {
    let mut presets = HashMap::new();

    presets.insert(
        Emotion::Neutral,
        EmotionPreset::from_pairs(&EMOTION_PARAMS.map(|id| (id, 0.0f32))),
    );
    presets.insert(
        Emotion::Happy,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, 1.0),
            (PARAM_EYE_L_SMILE, 0.8),
            (PARAM_EYE_R_SMILE, 0.8),
            (PARAM_BROW_L_Y, 0.3),
            (PARAM_BROW_R_Y, 0.3),
            (PARAM_CHEEK, 0.4),
        ]),
    );
    presets.insert(
        Emotion::Sad,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, -0.8),
            (PARAM_BROW_L_Y, -0.6),
            (PARAM_BROW_R_Y, -0.6),
            (PARAM_EYE_L_OPEN, -0.3),
            (PARAM_EYE_R_OPEN, -0.3),
        ]),
    );
    presets.insert(
        Emotion::Angry,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, -0.6),
            (PARAM_BROW_L_Y, -1.0),
            (PARAM_BROW_R_Y, -1.0),
            (PARAM_EYE_L_OPEN, -0.2),
            (PARAM_EYE_R_OPEN, -0.2),
        ]),
    );
    presets.insert(
        Emotion::Shy,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, 0.3),
            (PARAM_EYE_L_SMILE, 0.4),
            (PARAM_EYE_R_SMILE, 0.4),
            (PARAM_CHEEK, 1.0),
            (PARAM_EYE_L_OPEN, -0.3),
            (PARAM_EYE_R_OPEN, -0.3),
        ]),
    );
    presets.insert(
        Emotion::Excited,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, 1.0),
            (PARAM_EYE_L_SMILE, 0.5),
            (PARAM_EYE_R_SMILE, 0.5),
            (PARAM_BROW_L_Y, 0.7),
            (PARAM_BROW_R_Y, 0.7),
            (PARAM_CHEEK, 0.5),
            (PARAM_EYE_L_OPEN, 0.2),
            (PARAM_EYE_R_OPEN, 0.2),
        ]),
    );
    presets.insert(
        Emotion::Tired,
        EmotionPreset::from_pairs(&[
            (PARAM_MOUTH_FORM, -0.2),
            (PARAM_BROW_L_Y, -0.3),
            (PARAM_BROW_R_Y, -0.3),
            (PARAM_EYE_L_OPEN, -0.6),
            (PARAM_EYE_R_OPEN, -0.6),
        ]),
    );
    presets.insert(
        Emotion::Surprised,
        EmotionPreset::from_pairs(&[
            (PARAM_BROW_L_Y, 1.0),
            (PARAM_BROW_R_Y, 1.0),
            (PARAM_EYE_L_OPEN, 0.3),
            (PARAM_EYE_R_OPEN, 0.3),
        ]),
    );

    presets
}
