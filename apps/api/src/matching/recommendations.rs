use std::collections::BTreeMap;

use crate::matching::models::SectorGap;
use crate::matching::taxonomy::Sector;

const MISSING_PER_SECTOR: usize = 3;
const MISSING_OVERALL: usize = 5;

/// Templated gap statements for one candidate. Pure and total.
pub fn recommend(
    gap_detail: &BTreeMap<Sector, SectorGap>,
    experience_gap: u32,
    education_gap: u8,
) -> Vec<String> {
    let mut recommendations = Vec::new();

    let missing: Vec<&str> = gap_detail
        .values()
        .flat_map(|gap| gap.missing_phrases.iter().take(MISSING_PER_SECTOR))
        .take(MISSING_OVERALL)
        .map(String::as_str)
        .collect();
    if !missing.is_empty() {
        recommendations.push(format!(
            "Consider developing skills in: {}",
            missing.join(", ")
        ));
    }

    if experience_gap > 0 {
        recommendations.push(format!(
            "Gain {experience_gap} more years of relevant experience"
        ));
    }
    if education_gap > 0 {
        recommendations.push("Consider pursuing higher education qualifications".to_string());
    }
    recommendations
}
