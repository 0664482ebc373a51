//! Batch creation input and summary.

use crate::domain::entities::{GenerateOptions, GenerationResult};
use serde::{Deserialize, Serialize};

/// One entity of a batch, with its own generation options.
///
/// Options are flattened, so a JSON line looks like
/// `{"entity_type": "product", "entity_id": "42", "idLength": 8}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    #[serde(alias = "entityType", alias = "type")]
    pub entity_type: String,
    #[serde(alias = "entityId", alias = "id")]
    pub entity_id: String,
    #[serde(flatten)]
    pub options: GenerateOptions,
}

impl BatchItem {
    pub fn new(entity_type: impl Into<String>, entity_id: impl Into<String>) -> Self {
        Self {
            entity_type: entity_type.into(),
            entity_id: entity_id.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn with_options(mut self, options: GenerateOptions) -> Self {
        self.options = options;
        self
    }
}

/// Counts over the results of a batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    /// Successful results created without collision protection.
    pub degraded: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[GenerationResult]) -> Self {
        results.iter().fold(Self::default(), |mut summary, result| {
            summary.total += 1;
            if result.success {
                summary.succeeded += 1;
                if result.collision_check_skipped {
                    summary.degraded += 1;
                }
            } else {
                summary.failed += 1;
            }
            summary
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use serde_json::json;

    #[test]
    fn test_batch_item_from_json_line() {
        let item: BatchItem = serde_json::from_str(
            r#"{"entityType": "product", "entityId": "42", "idLength": 8, "customId": "LAMP42"}"#,
        )
        .unwrap();

        assert_eq!(item.entity_type, "product");
        assert_eq!(item.entity_id, "42");
        assert_eq!(item.options.id_length, Some(8));
        assert_eq!(item.options.public_id.as_deref(), Some("LAMP42"));
    }

    #[test]
    fn test_summary_counts() {
        let failed = GenerationResult::failure(
            "product",
            "1",
            AppError::conflict("taken", json!({})),
        );
        let mut ok = failed.clone();
        ok.success = true;
        ok.error = None;
        let mut degraded = ok.clone();
        degraded.collision_check_skipped = true;

        let summary = BatchSummary::from_results(&[ok, degraded, failed]);
        assert_eq!(
            summary,
            BatchSummary {
                total: 3,
                succeeded: 2,
                failed: 1,
                degraded: 1,
            }
        );
    }
}
