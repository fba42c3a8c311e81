//! Maps education keyword tiers to an ordinal level.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Ordinal education level, always within `1..=5`.
///
/// 5 doctorate, 4 masters, 3 bachelors, 2 diploma/certificate, 1 unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct EducationLevel(u8);

impl EducationLevel {
    pub const UNSPECIFIED: Self = Self(1);
    pub const DIPLOMA: Self = Self(2);
    pub const BACHELORS: Self = Self(3);
    pub const MASTERS: Self = Self(4);
    pub const DOCTORATE: Self = Self(5);

    pub fn new(level: u8) -> Option<Self> {
        (1..=5).contains(&level).then_some(Self(level))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for EducationLevel {
    fn default() -> Self {
        Self::UNSPECIFIED
    }
}

impl TryFrom<u8> for EducationLevel {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("education level {value} is outside 1..=5"))
    }
}

impl From<EducationLevel> for u8 {
    fn from(level: EducationLevel) -> Self {
        level.0
    }
}

impl fmt::Display for EducationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

const TIERS: &[(EducationLevel, &[&str])] = &[
    (EducationLevel::DOCTORATE, &["phd", "ph.d", "doctorate", "doctoral"]),
    (
        EducationLevel::MASTERS,
        &["masters", "master", "mba", "ms", "ma", "msc", "mtech", "meng"],
    ),
    (
        EducationLevel::BACHELORS,
        &["bachelors", "bachelor", "bs", "ba", "bsc", "btech", "beng", "degree"],
    ),
    (EducationLevel::DIPLOMA, &["diploma", "certificate", "associate"]),
];

/// One alternation per tier, highest tier first. Keywords are patterns, so
/// the dot in `ph.d` also accepts "ph d" and "ph-d".
static TIER_PATTERNS: Lazy<Vec<(EducationLevel, Regex)>> = Lazy::new(|| {
    TIERS
        .iter()
        .filter_map(|(level, keywords)| {
            let alternation = keywords.join("|");
            Regex::new(&format!(r"(?i)\b(?:{alternation})\b"))
                .ok()
                .map(|re| (*level, re))
        })
        .collect()
});

/// Returns the highest education tier mentioned in `text`, or level 1.
pub fn extract_level(text: &str) -> EducationLevel {
    TIER_PATTERNS
        .iter()
        .filter(|(_, re)| re.is_match(text))
        .map(|(level, _)| *level)
        .max()
        .unwrap_or_default()
}
