use serde::{Deserialize, Serialize};

use crate::matching::similarity::SimilarityConfig;
use crate::matching::weights::ScoringWeights;
use crate::matching::MatchError;

/// Tunables for one ranking run. Every field has a default, so callers may
/// send a partial record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub max_vocabulary_features: usize,
    /// Inclusive (min, max) word count of vocabulary terms.
    pub ngram_span: (usize, usize),
    pub min_document_frequency: usize,
    /// Informational cut-off surfaced on each result, never a filter.
    pub similarity_threshold: f64,
    pub skill_weight: f64,
    pub text_weight: f64,
    pub experience_weight: f64,
    pub education_weight: f64,
    pub top_n_default: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            max_vocabulary_features: 8000,
            ngram_span: (1, 3),
            min_document_frequency: 2,
            similarity_threshold: 0.1,
            skill_weight: 0.35,
            text_weight: 0.30,
            experience_weight: 0.20,
            education_weight: 0.15,
            top_n_default: 10,
        }
    }
}

impl MatchingConfig {
    pub fn validate(&self) -> Result<(), MatchError> {
        if self.max_vocabulary_features == 0 {
            return Err(MatchError::InvalidConfig(
                "max_vocabulary_features must be positive".to_string(),
            ));
        }
        let (min_n, max_n) = self.ngram_span;
        if min_n == 0 || min_n > max_n {
            return Err(MatchError::InvalidConfig(format!(
                "ngram_span ({min_n}, {max_n}) must satisfy 1 <= min <= max"
            )));
        }
        if self.min_document_frequency == 0 {
            return Err(MatchError::InvalidConfig(
                "min_document_frequency must be at least 1".to_string(),
            ));
        }
        if !self.similarity_threshold.is_finite() {
            return Err(MatchError::InvalidConfig(
                "similarity_threshold must be finite".to_string(),
            ));
        }

        let weights = [
            ("skill_weight", self.skill_weight),
            ("text_weight", self.text_weight),
            ("experience_weight", self.experience_weight),
            ("education_weight", self.education_weight),
        ];
        for (name, value) in weights {
            if !value.is_finite() || value < 0.0 {
                return Err(MatchError::InvalidConfig(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        if weights.iter().map(|(_, v)| v).sum::<f64>() <= 0.0 {
            return Err(MatchError::InvalidConfig(
                "at least one scoring weight must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn similarity(&self) -> SimilarityConfig {
        SimilarityConfig {
            max_features: self.max_vocabulary_features,
            ngram_range: self.ngram_span,
            min_df: self.min_document_frequency,
        }
    }

    pub fn base_weights(&self) -> ScoringWeights {
        ScoringWeights {
            text: self.text_weight,
            skills: self.skill_weight,
            experience: self.experience_weight,
            education: self.education_weight,
        }
    }
}

/// Per-request adjustments. Fields left out keep the server's value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MatchingConfigOverride {
    pub max_vocabulary_features: Option<usize>,
    pub ngram_span: Option<(usize, usize)>,
    pub min_document_frequency: Option<usize>,
    pub similarity_threshold: Option<f64>,
    pub skill_weight: Option<f64>,
    pub text_weight: Option<f64>,
    pub experience_weight: Option<f64>,
    pub education_weight: Option<f64>,
    pub top_n_default: Option<usize>,
}

impl MatchingConfigOverride {
    pub fn apply_to(self, base: &MatchingConfig) -> MatchingConfig {
        MatchingConfig {
            max_vocabulary_features: self
                .max_vocabulary_features
                .unwrap_or(base.max_vocabulary_features),
            ngram_span: self.ngram_span.unwrap_or(base.ngram_span),
            min_document_frequency: self
                .min_document_frequency
                .unwrap_or(base.min_document_frequency),
            similarity_threshold: self.similarity_threshold.unwrap_or(base.similarity_threshold),
            skill_weight: self.skill_weight.unwrap_or(base.skill_weight),
            text_weight: self.text_weight.unwrap_or(base.text_weight),
            experience_weight: self.experience_weight.unwrap_or(base.experience_weight),
            education_weight: self.education_weight.unwrap_or(base.education_weight),
            top_n_default: self.top_n_default.unwrap_or(base.top_n_default),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = MatchingConfig::default();
        assert!(config.validate().is_ok());
        assert!((config.base_weights().sum() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_partial_record_fills_defaults() {
        let config: MatchingConfig =
            serde_json::from_str(r#"{"skill_weight": 0.5, "ngram_span": [1, 2]}"#).unwrap();
        assert_eq!(config.skill_weight, 0.5);
        assert_eq!(config.ngram_span, (1, 2));
        assert_eq!(config.max_vocabulary_features, 8000);
    }

    #[test]
    fn test_rejects_inverted_ngram_span() {
        let config = MatchingConfig {
            ngram_span: (3, 1),
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(MatchError::InvalidConfig(_))));
    }

    #[test]
    fn test_rejects_negative_or_all_zero_weights() {
        let negative = MatchingConfig {
            text_weight: -0.1,
            ..Default::default()
        };
        assert!(negative.validate().is_err());

        let zero = MatchingConfig {
            skill_weight: 0.0,
            text_weight: 0.0,
            experience_weight: 0.0,
            education_weight: 0.0,
            ..Default::default()
        };
        assert!(zero.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_min_df_and_vocabulary() {
        let min_df = MatchingConfig {
            min_document_frequency: 0,
            ..Default::default()
        };
        assert!(min_df.validate().is_err());

        let vocab = MatchingConfig {
            max_vocabulary_features: 0,
            ..Default::default()
        };
        assert!(vocab.validate().is_err());
    }

    #[test]
    fn test_override_keeps_unset_fields_from_base() {
        let base = MatchingConfig {
            min_document_frequency: 1,
            top_n_default: 3,
            ..Default::default()
        };
        let patch: MatchingConfigOverride =
            serde_json::from_str(r#"{"skill_weight": 0.5}"#).unwrap();
        let merged = patch.apply_to(&base);
        assert_eq!(merged.skill_weight, 0.5);
        assert_eq!(merged.min_document_frequency, 1);
        assert_eq!(merged.top_n_default, 3);
        assert_eq!(MatchingConfigOverride::default().apply_to(&base), base);
    }
}
