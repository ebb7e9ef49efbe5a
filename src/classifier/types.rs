use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelScore {
    pub label: String,
    pub score: f64,
}

impl LabelScore {
    pub fn new(label: impl Into<String>, score: f64) -> Self {
        Self {
            label: label.into(),
            score,
        }
    }
}

/// Arg-max over a label distribution. Ties keep the first label seen.
pub fn top_prediction(distribution: &[LabelScore]) -> Option<&LabelScore> {
    distribution.iter().fold(None, |best, candidate| match best {
        Some(current) if current.score.total_cmp(&candidate.score).is_ge() => Some(current),
        _ => Some(candidate),
    })
}

/// Body the classifier endpoint accepts.
#[derive(Debug, Clone, Serialize)]
pub struct ClassifyRequest<'a> {
    pub inputs: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parameters: Option<ClassifyParameters>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassifyParameters {
    pub top_k: usize,
}

/// Pipeline-style responses come back either nested per input or flat.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Batched(Vec<Vec<LabelScore>>),
    Flat(Vec<LabelScore>),
}

impl ClassifyResponse {
    pub fn into_distribution(self) -> Vec<LabelScore> {
        match self {
            Self::Batched(mut batches) => {
                if batches.is_empty() {
                    Vec::new()
                } else {
                    batches.swap_remove(0)
                }
            }
            Self::Flat(scores) => scores,
        }
    }
}
