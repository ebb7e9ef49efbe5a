use super::types::*;
use crate::{Error, Result, config::ClassifierConfig};
use async_trait::async_trait;
use std::time::Duration;
use tracing::debug;

/// The pretrained model, seen as an opaque `text -> distribution` function.
#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
}

/// Calls a text-classification inference endpoint over HTTP.
pub struct HttpClassifier {
    client: reqwest::Client,
    url: String,
    api_key: Option<String>,
    top_k: Option<usize>,
}

impl HttpClassifier {
    pub fn new(config: ClassifierConfig) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }

        Ok(Self {
            client: builder.build()?,
            url: config.url,
            api_key: config.api_key.filter(|k| !k.is_empty()),
            top_k: config.top_k,
        })
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, text: &str) -> Result<Vec<LabelScore>> {
        debug!("Classifying text of {} bytes", text.len());

        let body = ClassifyRequest {
            inputs: text,
            parameters: self.top_k.map(|top_k| ClassifyParameters { top_k }),
        };

        let mut request = self.client.post(&self.url).json(&body);
        if let Some(ref key) = self.api_key {
            request = request.bearer_auth(key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(Error::classifier(format!(
                "classifier returned {}: {}",
                status, detail
            )));
        }

        let parsed: ClassifyResponse = response
            .json()
            .await
            .map_err(|e| Error::classifier(format!("unreadable classifier response: {}", e)))?;

        let distribution = parsed.into_distribution();
        debug!("Classifier returned {} labels", distribution.len());

        Ok(distribution)
    }
}
