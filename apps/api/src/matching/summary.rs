//! Batch statistics and display-oriented views over ranked results.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::matching::education::EducationLevel;
use crate::matching::models::ScoreBreakdown;
use crate::matching::taxonomy::Sector;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryStatistics {
    pub total_candidates: usize,
    pub average_score: f64,
    pub median_score: f64,
    pub std_score: f64,
    pub min_score: f64,
    pub max_score: f64,
    pub average_match_percentage: f64,
    pub top_10_percent_threshold: f64,
    pub sectors_represented: usize,
    pub sector_distribution: BTreeMap<String, usize>,
}

/// `None` for an empty result list.
pub fn summarize(results: &[ScoreBreakdown]) -> Option<SummaryStatistics> {
    if results.is_empty() {
        return None;
    }

    let mut scores: Vec<f64> = results.iter().map(|r| r.combined_score).collect();
    scores.sort_by(f64::total_cmp);
    let n = scores.len() as f64;

    let mean = scores.iter().sum::<f64>() / n;
    let variance = scores.iter().map(|s| (s - mean).powi(2)).sum::<f64>() / n;
    let average_match_percentage = results.iter().map(|r| r.match_percentage).sum::<f64>() / n;

    let mut sector_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for result in results {
        *sector_distribution.entry(result.sector.clone()).or_default() += 1;
    }

    Some(SummaryStatistics {
        total_candidates: results.len(),
        average_score: mean,
        median_score: percentile(&scores, 50.0),
        std_score: variance.sqrt(),
        min_score: scores[0],
        max_score: scores[scores.len() - 1],
        average_match_percentage,
        top_10_percent_threshold: percentile(&scores, 90.0),
        sectors_represented: sector_distribution.len(),
        sector_distribution,
    })
}

/// Linear interpolation between closest ranks. `sorted` must be ascending and
/// non-empty.
fn percentile(sorted: &[f64], q: f64) -> f64 {
    let rank = q / 100.0 * (sorted.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (rank - lo as f64)
}

pub fn identify_strengths(result: &ScoreBreakdown) -> Vec<String> {
    let checks = [
        (result.skill_score > 0.7, "Strong skill match"),
        (result.experience_score > 0.8, "Excellent experience level"),
        (result.education_score > 0.8, "Strong educational background"),
        (result.text_similarity > 0.6, "High content relevance"),
        (result.match_percentage > 85.0, "Exceptional overall match"),
    ];
    checks
        .into_iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| label.to_string())
        .collect()
}

const TOP_SKILLS: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopCandidate {
    pub rank: usize,
    pub identifier: String,
    pub sector: String,
    pub match_percentage: f64,
    pub overall_score: f64,
    pub experience_years: u32,
    pub education_level: EducationLevel,
    pub top_skills: Vec<String>,
    pub skill_sectors: Vec<Sector>,
    pub recommendations_count: usize,
    pub strengths: Vec<String>,
}

/// First `n` results, already ranked, reshaped for display.
pub fn top_candidates(results: &[ScoreBreakdown], n: usize) -> Vec<TopCandidate> {
    results
        .iter()
        .take(n)
        .enumerate()
        .map(|(idx, result)| TopCandidate {
            rank: idx + 1,
            identifier: result.identifier.clone(),
            sector: result.sector.clone(),
            match_percentage: round_to(result.match_percentage, 1),
            overall_score: round_to(result.combined_score, 3),
            experience_years: result.experience_years,
            education_level: result.education_level,
            top_skills: result
                .skills_found
                .values()
                .flatten()
                .take(TOP_SKILLS)
                .cloned()
                .collect(),
            skill_sectors: result.skills_found.keys().copied().collect(),
            recommendations_count: result.recommendations.len(),
            strengths: identify_strengths(result),
        })
        .collect()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10_f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matching::taxonomy::SkillMap;

    fn breakdown(id: &str, sector: &str, combined: f64) -> ScoreBreakdown {
        ScoreBreakdown {
            identifier: id.to_string(),
            sector: sector.to_string(),
            text_similarity: 0.0,
            skill_score: 0.0,
            experience_score: 0.0,
            education_score: 0.0,
            combined_score: combined,
            match_percentage: combined * 100.0,
            experience_years: 0,
            education_level: EducationLevel::UNSPECIFIED,
            skills_found: SkillMap::new(),
            gap_detail: BTreeMap::new(),
            experience_gap: 0,
            education_gap: 0,
            meets_similarity_threshold: false,
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn test_empty_results_have_no_summary() {
        assert!(summarize(&[]).is_none());
    }

    #[test]
    fn test_summary_statistics() {
        let results = vec![
            breakdown("a", "MARKETING", 0.8),
            breakdown("b", "MARKETING", 0.6),
            breakdown("c", "SALES", 0.4),
            breakdown("d", "UNKNOWN", 0.2),
        ];
        let stats = summarize(&results).unwrap();
        assert_eq!(stats.total_candidates, 4);
        assert!((stats.average_score - 0.5).abs() < 1e-9);
        assert!((stats.median_score - 0.5).abs() < 1e-9);
        assert!((stats.std_score - 0.05_f64.sqrt()).abs() < 1e-9);
        assert_eq!(stats.min_score, 0.2);
        assert_eq!(stats.max_score, 0.8);
        assert!((stats.average_match_percentage - 50.0).abs() < 1e-9);
        // rank 0.9 * 3 = 2.7 -> 0.6 + 0.7 * 0.2
        assert!((stats.top_10_percent_threshold - 0.74).abs() < 1e-9);
        assert_eq!(stats.sectors_represented, 3);
        assert_eq!(stats.sector_distribution["MARKETING"], 2);
    }

    #[test]
    fn test_single_result_percentiles() {
        let stats = summarize(&[breakdown("a", "HR", 0.3)]).unwrap();
        assert_eq!(stats.median_score, 0.3);
        assert_eq!(stats.top_10_percent_threshold, 0.3);
        assert_eq!(stats.std_score, 0.0);
    }

    #[test]
    fn test_strength_thresholds_are_strict() {
        let mut result = breakdown("a", "HR", 0.9);
        result.skill_score = 0.7;
        result.experience_score = 0.81;
        result.education_score = 1.0;
        result.text_similarity = 0.61;
        assert_eq!(
            identify_strengths(&result),
            vec![
                "Excellent experience level",
                "Strong educational background",
                "High content relevance",
                "Exceptional overall match",
            ]
        );
    }

    #[test]
    fn test_top_candidates_ranks_and_rounds() {
        let mut first = breakdown("a", "MARKETING", 0.87654);
        let skills: Vec<String> = (0..12).map(|i| format!("skill {i}")).collect();
        first.skills_found.insert(Sector::Marketing, skills);
        first.recommendations = vec!["Gain 1 more years of relevant experience".to_string()];
        let results = vec![first, breakdown("b", "SALES", 0.5), breakdown("c", "HR", 0.1)];

        let top = top_candidates(&results, 2);
        assert_eq!(top.len(), 2);
        assert_eq!(top[0].rank, 1);
        assert_eq!(top[0].overall_score, 0.877);
        assert_eq!(top[0].match_percentage, 87.7);
        assert_eq!(top[0].top_skills.len(), 10);
        assert_eq!(top[0].skill_sectors, vec![Sector::Marketing]);
        assert_eq!(top[0].recommendations_count, 1);
        assert_eq!(top[1].identifier, "b");
        assert_eq!(top[1].rank, 2);
    }
}
