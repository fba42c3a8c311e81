//! Per-candidate component scores, the weighted combination and ranking.

use std::collections::BTreeMap;

use tracing::warn;

use crate::matching::models::{
    CandidateProfile, DroppedCandidate, RequirementProfile, ScoreBreakdown, SectorGap,
};
use crate::matching::recommendations;
use crate::matching::taxonomy::{Sector, SkillMap};
use crate::matching::weights::ScoringWeights;
use crate::matching::MatchError;

/// Sector label used when the caller supplied no hint.
pub const UNKNOWN_SECTOR: &str = "UNKNOWN";

/// Fraction of required phrases the candidate has, with per-sector detail.
/// Nothing required scores 0.
pub fn skill_score(required: &SkillMap, found: &SkillMap) -> (f64, BTreeMap<Sector, SectorGap>) {
    let mut detail = BTreeMap::new();
    let mut total = 0usize;
    let mut matched_total = 0usize;

    for (sector, phrases) in required {
        let have = found.get(sector);
        let (matched, missing): (Vec<String>, Vec<String>) = phrases
            .iter()
            .cloned()
            .partition(|p| have.is_some_and(|h| h.contains(p)));
        total += phrases.len();
        matched_total += matched.len();
        detail.insert(
            *sector,
            SectorGap {
                required: phrases.len(),
                matched: matched.len(),
                matched_phrases: matched,
                missing_phrases: missing,
            },
        );
    }

    if total == 0 {
        return (0.0, detail);
    }
    (matched_total as f64 / total as f64, detail)
}

/// Under-qualification scales linearly; over-qualification loses 0.1 per
/// extra multiple of the requirement, at most 0.3.
pub fn experience_score(candidate_years: u32, required_years: u32) -> f64 {
    let years = f64::from(candidate_years);
    if required_years == 0 {
        return (years / 5.0).min(1.0);
    }
    let ratio = years / f64::from(required_years);
    if ratio <= 1.0 {
        ratio
    } else {
        1.0 - ((ratio - 1.0) * 0.1).min(0.3)
    }
}

/// Bachelor's is the floor of the denominator.
pub fn education_score(candidate_level: u8, required_level: u8) -> f64 {
    (f64::from(candidate_level) / f64::from(required_level.max(3))).min(1.0)
}

/// Scores one candidate. `weights` must already be adapted to `requirement`.
pub fn score_candidate(
    requirement: &RequirementProfile,
    candidate: &CandidateProfile,
    text_similarity: f64,
    weights: &ScoringWeights,
    similarity_threshold: f64,
) -> Result<ScoreBreakdown, MatchError> {
    if !text_similarity.is_finite() {
        return Err(MatchError::extraction(
            &candidate.identifier,
            format!("text similarity is not a finite number ({text_similarity})"),
        ));
    }
    let text_similarity = text_similarity.clamp(0.0, 1.0);

    let (skill, gap_detail) = skill_score(&requirement.skills_required, &candidate.skills_found);
    let experience = experience_score(candidate.experience_years, requirement.experience_required);
    let education = education_score(
        candidate.education_level.value(),
        requirement.education_required.value(),
    );
    let combined = weights.combine(text_similarity, skill, experience, education);

    let experience_gap = requirement
        .experience_required
        .saturating_sub(candidate.experience_years);
    let education_gap = requirement
        .education_required
        .value()
        .saturating_sub(candidate.education_level.value());

    Ok(ScoreBreakdown {
        identifier: candidate.identifier.clone(),
        sector: candidate
            .sector_hint
            .clone()
            .unwrap_or_else(|| UNKNOWN_SECTOR.to_string()),
        text_similarity,
        skill_score: skill,
        experience_score: experience,
        education_score: education,
        combined_score: combined,
        match_percentage: combined * 100.0,
        experience_years: candidate.experience_years,
        education_level: candidate.education_level,
        skills_found: candidate.skills_found.clone(),
        recommendations: recommendations::recommend(&gap_detail, experience_gap, education_gap),
        gap_detail,
        experience_gap,
        education_gap,
        meets_similarity_threshold: text_similarity >= similarity_threshold,
    })
}

/// Scores every candidate and orders them by combined score, best first.
/// Equal scores keep their input order. Candidates that cannot be scored are
/// returned separately instead of failing the batch.
pub fn rank(
    requirement: &RequirementProfile,
    candidates: &[CandidateProfile],
    similarities: &[f64],
    weights: &ScoringWeights,
    similarity_threshold: f64,
) -> (Vec<ScoreBreakdown>, Vec<DroppedCandidate>) {
    let mut results = Vec::with_capacity(candidates.len());
    let mut dropped = Vec::new();

    for (idx, candidate) in candidates.iter().enumerate() {
        let scored = match similarities.get(idx) {
            Some(&sim) => {
                score_candidate(requirement, candidate, sim, weights, similarity_threshold)
            }
            None => Err(MatchError::extraction(
                &candidate.identifier,
                "no text similarity computed",
            )),
        };
        match scored {
            Ok(breakdown) => results.push(breakdown),
            Err(e) => {
                warn!(identifier = %candidate.identifier, error = %e, "dropping candidate");
                dropped.push(DroppedCandidate {
                    identifier: candidate.identifier.clone(),
                    reason: e.to_string(),
                });
            }
        }
    }

    results.sort_by(|a, b| b.combined_score.total_cmp(&a.combined_score));
    (results, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::education::EducationLevel;
    use crate::matching::models::CandidateDocument;
    use crate::matching::requirements;
    use crate::matching::taxonomy::SkillTaxonomy;

    const JOB: &str = "Growth Lead. Must know PPC, A/B testing and conversion optimization. \
        4 years of experience and a bachelor's degree required.";

    fn profile(id: &str, text: &str, taxonomy: &SkillTaxonomy) -> CandidateProfile {
        let doc = CandidateDocument::new(id, Some("MARKETING".to_string()), text);
        CandidateProfile::from_document(&doc, taxonomy).unwrap()
    }

    #[test]
    fn test_experience_score_branches() {
        assert_eq!(experience_score(2, 4), 0.5);
        assert_eq!(experience_score(4, 4), 1.0);
        assert!((experience_score(5, 4) - 0.975).abs() < 1e-9);
        // penalty floors at 0.7
        assert!((experience_score(50, 1) - 0.7).abs() < 1e-9);
        assert_eq!(experience_score(3, 0), 0.6);
        assert_eq!(experience_score(10, 0), 1.0);
    }

    #[test]
    fn test_education_score_uses_bachelors_floor() {
        assert_eq!(education_score(4, 3), 1.0);
        assert!((education_score(2, 1) - 2.0 / 3.0).abs() < 1e-9);
        assert_eq!(education_score(4, 5), 0.8);
    }

    #[test]
    fn test_skill_score_and_gap_detail() {
        let mut required = SkillMap::new();
        required.insert(Sector::Marketing, vec!["seo".into(), "ppc".into(), "sem".into()]);
        required.insert(Sector::Sales, vec!["cold calling".into()]);
        let mut found = SkillMap::new();
        found.insert(Sector::Marketing, vec!["ppc".into(), "seo".into()]);

        let (score, detail) = skill_score(&required, &found);
        assert_eq!(score, 0.5);
        let marketing = &detail[&Sector::Marketing];
        assert_eq!(marketing.matched, 2);
        assert_eq!(marketing.matched_phrases, vec!["seo", "ppc"]);
        assert_eq!(marketing.missing_phrases, vec!["sem"]);
        assert_eq!(detail[&Sector::Sales].missing_phrases, vec!["cold calling"]);
    }

    #[test]
    fn test_zero_required_skills() {
        let (score, detail) = skill_score(&SkillMap::new(), &SkillMap::new());
        assert_eq!(score, 0.0);
        assert!(detail.is_empty());
    }

    #[test]
    fn test_marketing_scenario() {
        let taxonomy = SkillTaxonomy::builtin();
        let requirement = requirements::analyze(JOB, &taxonomy).unwrap();
        assert_eq!(requirement.experience_required, 4);
        assert_eq!(requirement.education_required, EducationLevel::BACHELORS);
        assert_eq!(requirement.total_required_skills(), 3);
        assert_eq!(requirement.sector_detected, Sector::Marketing);

        let narrowed = taxonomy.restrict(&requirement.skills_required);
        let strong = profile(
            "strong",
            "PPC, A/B testing and conversion optimization specialist. 5 years of experience. \
             Master's in marketing.",
            &narrowed,
        );
        let weak = profile("weak", "Some PPC work. 1 year of experience.", &narrowed);

        let weights = ScoringWeights::default().adapt(3, 4);
        let (ranked, dropped) = rank(&requirement, &[weak, strong], &[0.2, 0.2], &weights, 0.1);
        assert!(dropped.is_empty());
        assert_eq!(ranked[0].identifier, "strong");

        let top = &ranked[0];
        assert_eq!(top.skill_score, 1.0);
        assert!((top.experience_score - 0.975).abs() < 1e-9);
        assert_eq!(top.education_score, 1.0);
        assert!(top.combined_score > ranked[1].combined_score);
        assert!(top.recommendations.is_empty());

        let weak = &ranked[1];
        assert_eq!(weak.experience_gap, 3);
        assert!(weak.recommendations[0].starts_with("Consider developing skills in: "));
        assert!(weak
            .recommendations
            .contains(&"Gain 3 more years of relevant experience".to_string()));
    }

    #[test]
    fn test_rank_is_stable_and_descending() {
        let taxonomy = SkillTaxonomy::builtin();
        let requirement = requirements::analyze(JOB, &taxonomy).unwrap();
        let same = "SEO specialist";
        let candidates = vec![
            profile("a", same, &taxonomy),
            profile("b", "SEO and PPC, 4 years of experience", &taxonomy),
            profile("c", same, &taxonomy),
        ];
        let (ranked, _) = rank(
            &requirement,
            &candidates,
            &[0.1, 0.1, 0.1],
            &ScoringWeights::default(),
            0.1,
        );
        let order: Vec<&str> = ranked.iter().map(|r| r.identifier.as_str()).collect();
        assert_eq!(order, vec!["b", "a", "c"]);
        assert!(ranked
            .windows(2)
            .all(|w| w[0].combined_score >= w[1].combined_score));
        assert!(ranked
            .iter()
            .all(|r| (0.0..=1.0).contains(&r.combined_score)));
    }

    #[test]
    fn test_unscorable_candidates_are_dropped() {
        let taxonomy = SkillTaxonomy::builtin();
        let requirement = requirements::analyze(JOB, &taxonomy).unwrap();
        let candidates = vec![
            profile("ok", "SEO", &taxonomy),
            profile("nan", "PPC", &taxonomy),
            profile("missing", "SEO", &taxonomy),
        ];
        let (ranked, dropped) = rank(
            &requirement,
            &candidates,
            &[0.5, f64::NAN],
            &ScoringWeights::default(),
            0.1,
        );
        assert_eq!(ranked.len(), 1);
        let ids: Vec<&str> = dropped.iter().map(|d| d.identifier.as_str()).collect();
        assert_eq!(ids, vec!["nan", "missing"]);
    }

    #[test]
    fn test_threshold_flag_is_informational() {
        let taxonomy = SkillTaxonomy::builtin();
        let requirement = requirements::analyze(JOB, &taxonomy).unwrap();
        let candidate = profile("low", "SEO", &taxonomy);
        let result =
            score_candidate(&requirement, &candidate, 0.05, &ScoringWeights::default(), 0.1)
                .unwrap();
        assert!(!result.meets_similarity_threshold);
        assert_eq!(result.sector, "MARKETING");
    }
}
