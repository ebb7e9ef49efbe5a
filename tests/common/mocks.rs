use async_trait::async_trait;
use emotion_api::{
    Error, Result,
    classifier::{Classifier, LabelScore},
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Mock classifier for testing. Records every text it is asked to classify.
#[derive(Debug, Clone)]
pub struct MockClassifier {
    pub calls: Arc<Mutex<Vec<String>>>,
    pub distributions: Arc<Mutex<HashMap<String, Vec<LabelScore>>>>,
    pub default_distribution: Vec<LabelScore>,
    pub error: Option<String>,
}

impl MockClassifier {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            distributions: Arc::new(Mutex::new(HashMap::new())),
            default_distribution: create_distribution(&[
                ("anger", 0.01),
                ("joy", 0.87),
                ("neutral", 0.09),
                ("sadness", 0.03),
            ]),
            error: None,
        }
    }

    pub fn with_distribution(self, text: &str, distribution: Vec<LabelScore>) -> Self {
        self.distributions
            .lock()
            .unwrap()
            .insert(text.to_string(), distribution);
        self
    }

    pub fn with_error(mut self, error: &str) -> Self {
        self.error = Some(error.to_string());
        self
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn get_calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Classifier for MockClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        self.calls.lock().unwrap().push(text.to_string());

        if let Some(ref error) = self.error {
            return Err(Error::classifier(error.clone()));
        }

        let distributions = self.distributions.lock().unwrap();
        Ok(distributions
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.default_distribution.clone()))
    }
}

impl Default for MockClassifier {
    fn default() -> Self {
        Self::new()
    }
}

pub fn create_distribution(scores: &[(&str, f64)]) -> Vec<LabelScore> {
    scores
        .iter()
        .map(|(label, score)| LabelScore::new(*label, *score))
        .collect()
}
