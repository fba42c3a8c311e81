//! End-to-end ranking run: requirement analysis, candidate extraction, batch
//! similarity, weighting and ordering.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use crate::matching::config::MatchingConfig;
use crate::matching::models::{
    CandidateDocument, CandidateProfile, DroppedCandidate, RequirementProfile, ScoreBreakdown,
};
use crate::matching::normalizer;
use crate::matching::requirements;
use crate::matching::scoring;
use crate::matching::similarity::{TextSimilarity, TfIdfSimilarity};
use crate::matching::taxonomy::SkillTaxonomy;
use crate::matching::weights::ScoringWeights;
use crate::matching::MatchError;

/// Result of one ranking invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankingRun {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub requirement: RequirementProfile,
    pub weights: ScoringWeights,
    /// Best match first.
    pub results: Vec<ScoreBreakdown>,
    pub dropped: Vec<DroppedCandidate>,
    pub total_submitted: usize,
}

pub struct Ranker {
    taxonomy: Arc<SkillTaxonomy>,
    config: MatchingConfig,
    similarity: Arc<dyn TextSimilarity>,
}

impl Ranker {
    /// Uses TF-IDF similarity configured from `config`.
    pub fn new(taxonomy: Arc<SkillTaxonomy>, config: MatchingConfig) -> Self {
        let similarity = Arc::new(TfIdfSimilarity::new(config.similarity()));
        Self {
            taxonomy,
            config,
            similarity,
        }
    }

    #[cfg(test)]
    pub fn with_similarity(mut self, similarity: Arc<dyn TextSimilarity>) -> Self {
        self.similarity = similarity;
        self
    }

    pub fn analyze(&self, job_text: &str) -> Result<RequirementProfile, MatchError> {
        requirements::analyze(job_text, &self.taxonomy)
    }

    pub fn rank(
        &self,
        job_text: &str,
        documents: Vec<CandidateDocument>,
    ) -> Result<RankingRun, MatchError> {
        self.config.validate()?;
        let run_id = Uuid::new_v4();
        let total_submitted = documents.len();
        info!(%run_id, candidates = total_submitted, "ranking run started");

        let requirement = self.analyze(job_text)?;
        let job_normalized = normalizer::clean_text(job_text);
        // A job naming no skills still reports every skill a candidate has.
        let restricted;
        let candidate_taxonomy: &SkillTaxonomy = if requirement.skills_required.is_empty() {
            self.taxonomy.as_ref()
        } else {
            restricted = self.taxonomy.restrict(&requirement.skills_required);
            &restricted
        };

        let mut dropped = Vec::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut profiles = Vec::with_capacity(documents.len());
        for document in &documents {
            let profile = if seen.insert(document.identifier.clone()) {
                CandidateProfile::from_document(document, candidate_taxonomy)
            } else {
                Err(MatchError::extraction(
                    &document.identifier,
                    "duplicate identifier in batch",
                ))
            };
            match profile {
                Ok(profile) => profiles.push(profile),
                Err(e) => {
                    warn!(%run_id, identifier = %document.identifier, error = %e, "candidate dropped");
                    dropped.push(DroppedCandidate {
                        identifier: document.identifier.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        let texts: Vec<&str> = profiles.iter().map(|p| p.normalized_text.as_str()).collect();
        let similarities = self.similarity.similarity(&job_normalized, &texts);

        let weights = self.config.base_weights().adapt(
            requirement.total_required_skills(),
            requirement.experience_required,
        );
        let (results, scoring_dropped) = scoring::rank(
            &requirement,
            &profiles,
            &similarities,
            &weights,
            self.config.similarity_threshold,
        );
        dropped.extend(scoring_dropped);

        info!(
            %run_id,
            ranked = results.len(),
            dropped = dropped.len(),
            sector = %requirement.sector_detected,
            "ranking run finished"
        );

        Ok(RankingRun {
            run_id,
            generated_at: Utc::now(),
            requirement,
            weights,
            results,
            dropped,
            total_submitted,
        })
    }

    /// Ranks one document on its own. A document that cannot be scored is an
    /// [`MatchError::ExtractionFailure`].
    pub fn rank_single(
        &self,
        job_text: &str,
        identifier: &str,
        text: &str,
    ) -> Result<(RequirementProfile, ScoreBreakdown), MatchError> {
        let document = CandidateDocument::new(identifier, None, text);
        let mut run = self.rank(job_text, vec![document])?;
        if let Some(dropped) = run.dropped.pop() {
            return Err(MatchError::ExtractionFailure {
                identifier: dropped.identifier,
                reason: dropped.reason,
            });
        }
        let result = run.results.pop().ok_or_else(|| {
            MatchError::extraction(identifier, "candidate produced no result")
        })?;
        Ok((run.requirement, result))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::taxonomy::Sector;

    const JOB: &str = "Growth Lead. Must know PPC, A/B testing and conversion optimization. \
        4 years of experience and a bachelor's degree required.";

    fn ranker() -> Ranker {
        Ranker::new(Arc::new(SkillTaxonomy::builtin()), MatchingConfig::default())
    }

    struct FixedSimilarity(f64);

    impl TextSimilarity for FixedSimilarity {
        fn similarity(&self, _requirement: &str, candidates: &[&str]) -> Vec<f64> {
            vec![self.0; candidates.len()]
        }
    }

    #[test]
    fn test_empty_batch_yields_empty_run() {
        let run = ranker().rank(JOB, Vec::new()).unwrap();
        assert!(run.results.is_empty());
        assert!(run.dropped.is_empty());
        assert_eq!(run.total_submitted, 0);
        assert_eq!(run.requirement.total_required_skills(), 3);
    }

    #[test]
    fn test_empty_job_is_fatal() {
        let err = ranker()
            .rank("   ", vec![CandidateDocument::new("a", None, "PPC")])
            .unwrap_err();
        assert!(matches!(err, MatchError::Input(_)));
    }

    #[test]
    fn test_invalid_config_is_fatal() {
        let config = MatchingConfig {
            ngram_span: (2, 1),
            ..Default::default()
        };
        let ranker = Ranker::new(Arc::new(SkillTaxonomy::builtin()), config);
        assert!(matches!(
            ranker.rank(JOB, Vec::new()),
            Err(MatchError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_ranks_and_drops_with_reasons() {
        let docs = vec![
            CandidateDocument::new("weak", None, "Some PPC work. 1 year of experience."),
            CandidateDocument::new(
                "strong",
                Some("MARKETING".to_string()),
                "PPC, A/B testing and conversion optimization. 5 years of experience. MBA.",
            ),
            CandidateDocument::new("blank", None, "  "),
            CandidateDocument::new("weak", None, "duplicate entry"),
        ];
        let run = ranker().rank(JOB, docs).unwrap();

        assert_eq!(run.total_submitted, 4);
        let order: Vec<&str> = run.results.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(order, vec!["strong", "weak"]);
        assert_eq!(run.dropped.len(), 2);
        assert_eq!(run.dropped[0].identifier, "blank");
        assert!(run.dropped[1].reason.contains("duplicate"));
        assert!((run.weights.sum() - 1.0).abs() < 1e-9);

        // candidate skills are limited to what the job asks for
        let strong = &run.results[0];
        assert_eq!(strong.skills_found.len(), 1);
        assert_eq!(strong.skill_score, 1.0);
        assert!(strong.text_similarity > 0.0);
    }

    #[test]
    fn test_job_without_skills_reports_all_candidate_skills() {
        let run = ranker()
            .rank(
                "We are hiring a person. 3 years of experience.",
                vec![CandidateDocument::new(
                    "cv",
                    None,
                    "SEO, PPC and bookkeeping, 4 years of experience",
                )],
            )
            .unwrap();
        assert_eq!(run.requirement.total_required_skills(), 0);

        let result = &run.results[0];
        assert_eq!(result.skill_score, 0.0);
        assert!(result.gap_detail.is_empty());
        assert_eq!(result.skills_found[&Sector::Marketing], vec!["seo", "ppc"]);
        assert!(result.skills_found.contains_key(&Sector::DigitalMedia));
        assert_eq!(result.skills_found[&Sector::Accountant], vec!["bookkeeping"]);
    }

    #[test]
    fn test_custom_similarity_backend() {
        let ranker = ranker().with_similarity(Arc::new(FixedSimilarity(0.5)));
        let run = ranker
            .rank(JOB, vec![CandidateDocument::new("a", None, "PPC")])
            .unwrap();
        assert_eq!(run.results[0].text_similarity, 0.5);
        assert!(run.results[0].meets_similarity_threshold);
    }

    #[test]
    fn test_non_finite_similarity_drops_candidate() {
        let ranker = ranker().with_similarity(Arc::new(FixedSimilarity(f64::NAN)));
        let run = ranker
            .rank(JOB, vec![CandidateDocument::new("a", None, "PPC")])
            .unwrap();
        assert!(run.results.is_empty());
        assert_eq!(run.dropped.len(), 1);
    }

    #[test]
    fn test_rank_single() {
        let (requirement, result) = ranker()
            .rank_single(JOB, "cv.pdf", "PPC and A/B testing, 4 years of experience")
            .unwrap();
        assert_eq!(requirement.experience_required, 4);
        assert_eq!(result.identifier, "cv.pdf");
        assert_eq!(result.sector, scoring::UNKNOWN_SECTOR);
        assert_eq!(result.experience_score, 1.0);
    }

    #[test]
    fn test_rank_single_empty_resume_is_extraction_failure() {
        let err = ranker().rank_single(JOB, "cv.pdf", "").unwrap_err();
        assert!(matches!(err, MatchError::ExtractionFailure { .. }));
    }
}
