//! Skill extraction: matches taxonomy phrases against a text body.

use crate::matching::taxonomy::{SkillMap, SkillPhrase, SkillTaxonomy};

/// Returns every taxonomy phrase found in `text`, grouped by sector.
///
/// A phrase counts when the lower-cased text contains it literally or its
/// word-boundary pattern matches. Sectors with no hits are omitted and phrase
/// order inside a sector follows the taxonomy.
pub fn extract_skills(text: &str, taxonomy: &SkillTaxonomy) -> SkillMap {
    let mut found = SkillMap::new();
    if text.trim().is_empty() {
        return found;
    }

    let text_lower = text.to_lowercase();
    for (sector, phrases) in taxonomy.iter() {
        let hits: Vec<String> = phrases
            .iter()
            .filter(|p| phrase_matches(p, &text_lower))
            .map(|p| p.phrase.clone())
            .collect();
        if !hits.is_empty() {
            found.insert(sector, hits);
        }
    }
    found
}

fn phrase_matches(phrase: &SkillPhrase, text_lower: &str) -> bool {
    text_lower.contains(phrase.phrase.as_str()) || phrase.boundary.is_match(text_lower)
}

/// Total phrase count across all sectors.
pub fn count_skills(skills: &SkillMap) -> usize {
    skills.values().map(Vec::len).sum()
}
