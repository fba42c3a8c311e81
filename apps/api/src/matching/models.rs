//! Data model shared across the matching pipeline.
//!
//! Every value here is created for one ranking run and never mutated after
//! construction.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::matching::education::{self, EducationLevel};
use crate::matching::experience;
use crate::matching::normalizer::{self, ContactHints};
use crate::matching::skills;
use crate::matching::taxonomy::{Sector, SkillMap, SkillTaxonomy};
use crate::matching::MatchError;

// ────────────────────────────────────────────────────────────────────────────
// Inputs
// ────────────────────────────────────────────────────────────────────────────

/// Already-extracted candidate text handed in by the upload/extraction layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateDocument {
    pub identifier: String,
    pub sector_hint: Option<String>,
    pub raw_text: String,
    pub normalized_text: String,
    pub byte_size: usize,
    pub extracted_at: DateTime<Utc>,
}

impl CandidateDocument {
    pub fn new(
        identifier: impl Into<String>,
        sector_hint: Option<String>,
        raw_text: impl Into<String>,
    ) -> Self {
        let raw_text = raw_text.into();
        Self {
            identifier: identifier.into(),
            sector_hint,
            normalized_text: normalizer::clean_text(&raw_text),
            byte_size: raw_text.len(),
            raw_text,
            extracted_at: Utc::now(),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Profiles
// ────────────────────────────────────────────────────────────────────────────

/// Structured view of a job posting, derived once per ranking run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequirementProfile {
    pub skills_required: SkillMap,
    pub experience_required: u32,
    pub education_required: EducationLevel,
    pub sector_detected: Sector,
    pub key_requirements: Vec<String>,
    pub complexity_score: f64,
}

impl RequirementProfile {
    pub fn total_required_skills(&self) -> usize {
        skills::count_skills(&self.skills_required)
    }
}

/// Structured view of one candidate document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub identifier: String,
    pub sector_hint: Option<String>,
    pub normalized_text: String,
    pub skills_found: SkillMap,
    pub experience_years: u32,
    pub education_level: EducationLevel,
    pub contact: ContactHints,
    pub word_count: usize,
    pub character_count: usize,
}

impl CandidateProfile {
    /// Runs the extractors over `document`. `taxonomy` is normally the
    /// requirement's restricted taxonomy so only job-relevant skills surface.
    pub fn from_document(
        document: &CandidateDocument,
        taxonomy: &SkillTaxonomy,
    ) -> Result<Self, MatchError> {
        let raw = document.raw_text.as_str();
        if raw.trim().is_empty() {
            return Err(MatchError::extraction(
                &document.identifier,
                "candidate text is empty",
            ));
        }

        Ok(Self {
            identifier: document.identifier.clone(),
            sector_hint: document.sector_hint.clone(),
            normalized_text: document.normalized_text.clone(),
            skills_found: skills::extract_skills(raw, taxonomy),
            experience_years: experience::extract_years(raw),
            education_level: education::extract_level(raw),
            contact: normalizer::extract_contact_hints(raw),
            word_count: raw.split_whitespace().count(),
            character_count: raw.chars().count(),
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Outputs
// ────────────────────────────────────────────────────────────────────────────

/// Per-sector coverage of the required skills.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectorGap {
    pub required: usize,
    pub matched: usize,
    pub matched_phrases: Vec<String>,
    pub missing_phrases: Vec<String>,
}

/// Interpretable score for one candidate in one ranking run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub identifier: String,
    pub sector: String,
    pub text_similarity: f64,
    pub skill_score: f64,
    pub experience_score: f64,
    pub education_score: f64,
    pub combined_score: f64,
    pub match_percentage: f64,
    pub experience_years: u32,
    pub education_level: EducationLevel,
    pub skills_found: SkillMap,
    pub gap_detail: BTreeMap<Sector, SectorGap>,
    pub experience_gap: u32,
    pub education_gap: u8,
    /// Informational only; ranking never filters on it.
    pub meets_similarity_threshold: bool,
    pub recommendations: Vec<String>,
}

/// A candidate excluded from a run, with the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DroppedCandidate {
    pub identifier: String,
    pub reason: String,
}
