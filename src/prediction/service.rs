use super::{
    table::CsvTable,
    types::{CsvRowResult, EMPTY_TEXT, Prediction, TextPrediction},
};
use crate::{
    Error, Result,
    classifier::{Classifier, top_prediction},
};
use std::sync::Arc;
use tracing::{debug, info};

/// Maps prediction requests onto one classifier call per text.
pub struct PredictionService {
    classifier: Arc<dyn Classifier>,
}

impl PredictionService {
    pub fn new(classifier: Arc<dyn Classifier>) -> Self {
        Self { classifier }
    }

    async fn classify_top(&self, text: &str) -> Result<Prediction> {
        let distribution = self.classifier.classify(text).await?;

        let best = top_prediction(&distribution)
            .ok_or_else(|| Error::classifier("classifier returned an empty label distribution"))?;

        Ok(Prediction {
            emotion: best.label.clone(),
            score: best.score,
        })
    }

    pub async fn predict_single(&self, text: &str) -> Result<Prediction> {
        if text.trim().is_empty() {
            return Err(Error::bad_request(EMPTY_TEXT));
        }

        self.classify_top(text).await
    }

    pub async fn predict_multiple(&self, texts: &[String]) -> Result<Vec<TextPrediction>> {
        let mut results = Vec::with_capacity(texts.len());

        for text in texts {
            let prediction = self.classify_top(text).await?;
            results.push(TextPrediction::new(text.as_str(), prediction));
        }

        Ok(results)
    }

    /// Classifies every row's `text` cell. Empty cells become inline row
    /// errors; anything else that fails aborts the whole upload.
    pub async fn predict_csv(&self, bytes: &[u8]) -> Result<Vec<CsvRowResult>> {
        let table = CsvTable::parse(bytes)?;
        let cells = table.text_cells()?;
        info!("Processing CSV upload with {} rows", cells.len());

        let mut results = Vec::with_capacity(cells.len());
        for text in cells {
            if text.trim().is_empty() {
                debug!("Skipping empty text cell at row {}", results.len());
                results.push(CsvRowResult::empty_text(text));
                continue;
            }

            let prediction = self.classify_top(&text).await?;
            results.push(CsvRowResult::Prediction(TextPrediction::new(text, prediction)));
        }

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::LabelScore;
    use async_trait::async_trait;
    use mockall::mock;
    use pretty_assertions::assert_eq;

    mock! {
        pub Model {}

        #[async_trait]
        impl Classifier for Model {
            async fn classify(&self, text: &str) -> Result<Vec<LabelScore>>;
        }
    }

    fn joyful() -> Vec<LabelScore> {
        vec![
            LabelScore::new("anger", 0.02),
            LabelScore::new("joy", 0.91),
            LabelScore::new("neutral", 0.07),
        ]
    }

    fn service(model: MockModel) -> PredictionService {
        PredictionService::new(Arc::new(model))
    }

    #[rstest::rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\t")]
    #[tokio::test]
    async fn test_predict_single_rejects_blank_text(#[case] text: &str) {
        let mut model = MockModel::new();
        model.expect_classify().times(0);

        let err = service(model).predict_single(text).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest(ref m) if m == EMPTY_TEXT));
    }

    #[tokio::test]
    async fn test_predict_single_returns_argmax() {
        let mut model = MockModel::new();
        model
            .expect_classify()
            .withf(|text: &str| text == "I am thrilled")
            .times(1)
            .returning(|_| Ok(joyful()));

        let prediction = service(model).predict_single("I am thrilled").await.unwrap();
        assert_eq!(
            prediction,
            Prediction {
                emotion: "joy".to_string(),
                score: 0.91,
            }
        );
    }

    #[tokio::test]
    async fn test_predict_single_empty_distribution_is_classifier_error() {
        let mut model = MockModel::new();
        model.expect_classify().returning(|_| Ok(Vec::new()));

        let err = service(model).predict_single("hello").await.unwrap_err();
        assert!(matches!(err, Error::Classifier(_)));
    }

    #[tokio::test]
    async fn test_predict_multiple_preserves_order() {
        let mut model = MockModel::new();
        model
            .expect_classify()
            .times(2)
            .returning(|text| match text {
                "a" => Ok(vec![LabelScore::new("fear", 0.8), LabelScore::new("joy", 0.2)]),
                _ => Ok(vec![LabelScore::new("fear", 0.1), LabelScore::new("joy", 0.9)]),
            });

        let texts = vec!["a".to_string(), "b".to_string()];
        let results = service(model).predict_multiple(&texts).await.unwrap();

        assert_eq!(
            results,
            vec![
                TextPrediction {
                    text: "a".to_string(),
                    emotion: "fear".to_string(),
                    score: 0.8,
                },
                TextPrediction {
                    text: "b".to_string(),
                    emotion: "joy".to_string(),
                    score: 0.9,
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_predict_multiple_empty_input() {
        let mut model = MockModel::new();
        model.expect_classify().times(0);

        let results = service(model).predict_multiple(&[]).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_predict_csv_reports_empty_rows_inline() {
        let mut model = MockModel::new();
        model
            .expect_classify()
            .withf(|text: &str| text == "hello")
            .times(1)
            .returning(|_| Ok(joyful()));

        let results = service(model)
            .predict_csv(b"text\nhello\n\"\"\n   \n")
            .await
            .unwrap();

        assert_eq!(
            results,
            vec![
                CsvRowResult::Prediction(TextPrediction {
                    text: "hello".to_string(),
                    emotion: "joy".to_string(),
                    score: 0.91,
                }),
                CsvRowResult::empty_text(""),
                CsvRowResult::empty_text("   "),
            ]
        );
    }

    #[tokio::test]
    async fn test_predict_csv_without_text_column_never_classifies() {
        let mut model = MockModel::new();
        model.expect_classify().times(0);

        let err = service(model)
            .predict_csv(b"message\nhello\n")
            .await
            .unwrap_err();
        assert!(matches!(err, Error::BadRequest(_)));
    }

    #[tokio::test]
    async fn test_predict_csv_classifier_failure_aborts() {
        let mut model = MockModel::new();
        model
            .expect_classify()
            .times(1)
            .returning(|_| Err(Error::classifier("model offline")));

        let err = service(model)
            .predict_csv(b"text\nfirst\nsecond\n")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("model offline"));
    }
}
