use serde::{Deserialize, Serialize};

/// Weights of the four score components. After [`ScoringWeights::adapt`] they
/// always sum to 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub text: f64,
    pub skills: f64,
    pub experience: f64,
    pub education: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            text: 0.30,
            skills: 0.35,
            experience: 0.20,
            education: 0.15,
        }
    }
}

/// More required phrases than this shifts weight toward skills.
const SKILL_HEAVY_THRESHOLD: usize = 15;
/// More required years than this shifts weight toward experience.
const EXPERIENCE_HEAVY_THRESHOLD: u32 = 7;

impl ScoringWeights {
    pub fn sum(&self) -> f64 {
        self.text + self.skills + self.experience + self.education
    }

    /// Adjusts the weights to the shape of the requirement, then renormalizes.
    pub fn adapt(self, total_required_skills: usize, required_years: u32) -> Self {
        let mut w = self;
        if total_required_skills > SKILL_HEAVY_THRESHOLD {
            w.skills += 0.10;
            w.text -= 0.05;
            w.experience -= 0.05;
        }
        if required_years > EXPERIENCE_HEAVY_THRESHOLD {
            w.experience += 0.10;
            w.education -= 0.05;
            w.text -= 0.05;
        }
        w.normalized()
    }

    /// Clamps each weight at zero and scales the set to sum to 1. An all-zero
    /// set falls back to the defaults.
    pub fn normalized(self) -> Self {
        let clamped = Self {
            text: self.text.max(0.0),
            skills: self.skills.max(0.0),
            experience: self.experience.max(0.0),
            education: self.education.max(0.0),
        };
        let total = clamped.sum();
        if !total.is_finite() || total <= 0.0 {
            return Self::default();
        }
        Self {
            text: clamped.text / total,
            skills: clamped.skills / total,
            experience: clamped.experience / total,
            education: clamped.education / total,
        }
    }

    /// Weighted sum of the component scores, clamped to `[0, 1]`.
    pub fn combine(&self, text: f64, skills: f64, experience: f64, education: f64) -> f64 {
        (self.text * text
            + self.skills * skills
            + self.experience * experience
            + self.education * education)
            .clamp(0.0, 1.0)
    }
}
