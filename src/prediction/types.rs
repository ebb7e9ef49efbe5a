use serde::{Deserialize, Serialize};

pub const EMPTY_TEXT: &str = "Text must not be empty";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub emotion: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextPrediction {
    pub text: String,
    pub emotion: String,
    pub score: f64,
}

/// One CSV row outcome. Empty cells are reported inline instead of failing
/// the whole upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CsvRowResult {
    Prediction(TextPrediction),
    Failed { text: String, error: String },
}

impl TextPrediction {
    pub fn new(text: impl Into<String>, prediction: Prediction) -> Self {
        Self {
            text: text.into(),
            emotion: prediction.emotion,
            score: prediction.score,
        }
    }
}

impl CsvRowResult {
    pub fn empty_text(text: impl Into<String>) -> Self {
        Self::Failed {
            text: text.into(),
            error: EMPTY_TEXT.to_string(),
        }
    }

    pub fn text(&self) -> &str {
        match self {
            Self::Prediction(p) => &p.text,
            Self::Failed { text, .. } => text,
        }
    }
}
