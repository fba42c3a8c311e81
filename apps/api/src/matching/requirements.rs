//! Requirement analysis: turns a job posting into a [`RequirementProfile`].

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::matching::education;
use crate::matching::experience;
use crate::matching::models::RequirementProfile;
use crate::matching::skills;
use crate::matching::taxonomy::{Sector, SkillMap, SkillTaxonomy};
use crate::matching::MatchError;

const MAX_KEY_REQUIREMENTS: usize = 10;

/// Cue phrases for requirement snippets, applied in this order.
static REQUIREMENT_CUES: Lazy<Vec<Regex>> = Lazy::new(|| {
    [
        r"(?is)(?:required|must have|essential).*?(?:\n|\.)",
        r"(?is)(?:minimum|at least).*?(?:\n|\.)",
        r"(?is)(?:preferred|desired).*?(?:\n|\.)",
    ]
    .into_iter()
    .filter_map(|p| Regex::new(p).ok())
    .collect()
});

pub fn analyze(job_text: &str, taxonomy: &SkillTaxonomy) -> Result<RequirementProfile, MatchError> {
    if job_text.trim().is_empty() {
        return Err(MatchError::Input(
            "job description must not be empty".to_string(),
        ));
    }

    let skills_required = skills::extract_skills(job_text, taxonomy);
    let experience_required = experience::extract_years(job_text);
    let education_required = education::extract_level(job_text);
    let sector_detected = detect_sector(job_text, taxonomy);
    let key_requirements = key_requirements(job_text);
    let complexity_score = complexity(
        &skills_required,
        experience_required,
        education_required.value(),
    );

    debug!(
        sector = %sector_detected,
        skills = skills::count_skills(&skills_required),
        experience_required,
        education = %education_required,
        "analyzed requirement"
    );

    Ok(RequirementProfile {
        skills_required,
        experience_required,
        education_required,
        sector_detected,
        key_requirements,
        complexity_score,
    })
}

/// Sector with the most literal phrase hits. Ties go to the earlier sector;
/// soft skills never win. `General` when nothing hits.
pub fn detect_sector(text: &str, taxonomy: &SkillTaxonomy) -> Sector {
    let text_lower = text.to_lowercase();
    let mut best: Option<(Sector, usize)> = None;
    for (sector, phrases) in taxonomy.iter() {
        if sector.is_pseudo_sector() {
            continue;
        }
        let hits = phrases
            .iter()
            .filter(|p| text_lower.contains(p.phrase.as_str()))
            .count();
        if hits > 0 && best.map_or(true, |(_, top)| hits > top) {
            best = Some((sector, hits));
        }
    }
    best.map(|(sector, _)| sector).unwrap_or(Sector::General)
}

pub fn key_requirements(text: &str) -> Vec<String> {
    REQUIREMENT_CUES
        .iter()
        .flat_map(|re| re.find_iter(text).map(|m| m.as_str().trim().to_string()))
        .take(MAX_KEY_REQUIREMENTS)
        .collect()
}

/// `min((skills*0.4 + years*0.4 + education*0.2) / 20, 1)`
pub fn complexity(skills_required: &SkillMap, years: u32, education: u8) -> f64 {
    let skill_count = skills::count_skills(skills_required) as f64;
    let raw = (skill_count * 0.4 + f64::from(years) * 0.4 + f64::from(education) * 0.2) / 20.0;
    raw.min(1.0)
}
