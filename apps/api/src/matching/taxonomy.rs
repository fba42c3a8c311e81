//! The fixed sector to canonical skill phrase table.
//!
//! Built once at startup and shared read-only behind an `Arc`. Word-boundary
//! patterns for every phrase are compiled here so extraction never compiles a
//! regex on the hot path.

use std::collections::BTreeMap;
use std::fmt;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Occupational sector. Declaration order is taxonomy order, so a
/// `BTreeMap<Sector, _>` iterates the same way the table is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum Sector {
    Accountant,
    Advocate,
    Agriculture,
    Apparel,
    Arts,
    Automobile,
    Aviation,
    Banking,
    Bpo,
    BusinessDevelopment,
    Chef,
    Construction,
    Consultant,
    Designer,
    DigitalMedia,
    Engineering,
    Finance,
    Fitness,
    Healthcare,
    Hr,
    InformationTechnology,
    Legal,
    Marketing,
    Medical,
    Ngo,
    Pharmaceutical,
    Research,
    Retail,
    PublicRelations,
    Sales,
    Teacher,
    TechnicalSupport,
    Tourism,
    Transportation,
    SoftSkills,
    /// Fallback when no sector can be detected. Carries no phrases.
    General,
}

impl Sector {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Accountant => "ACCOUNTANT",
            Self::Advocate => "ADVOCATE",
            Self::Agriculture => "AGRICULTURE",
            Self::Apparel => "APPAREL",
            Self::Arts => "ARTS",
            Self::Automobile => "AUTOMOBILE",
            Self::Aviation => "AVIATION",
            Self::Banking => "BANKING",
            Self::Bpo => "BPO",
            Self::BusinessDevelopment => "BUSINESS-DEVELOPMENT",
            Self::Chef => "CHEF",
            Self::Construction => "CONSTRUCTION",
            Self::Consultant => "CONSULTANT",
            Self::Designer => "DESIGNER",
            Self::DigitalMedia => "DIGITAL-MEDIA",
            Self::Engineering => "ENGINEERING",
            Self::Finance => "FINANCE",
            Self::Fitness => "FITNESS",
            Self::Healthcare => "HEALTHCARE",
            Self::Hr => "HR",
            Self::InformationTechnology => "INFORMATION-TECHNOLOGY",
            Self::Legal => "LEGAL",
            Self::Marketing => "MARKETING",
            Self::Medical => "MEDICAL",
            Self::Ngo => "NGO",
            Self::Pharmaceutical => "PHARMACEUTICAL",
            Self::Research => "RESEARCH",
            Self::Retail => "RETAIL",
            Self::PublicRelations => "PUBLIC-RELATIONS",
            Self::Sales => "SALES",
            Self::Teacher => "TEACHER",
            Self::TechnicalSupport => "TECHNICAL-SUPPORT",
            Self::Tourism => "TOURISM",
            Self::Transportation => "TRANSPORTATION",
            Self::SoftSkills => "SOFT-SKILLS",
            Self::General => "GENERAL",
        }
    }

    /// Soft skills are matched like any sector but never win sector detection.
    pub fn is_pseudo_sector(&self) -> bool {
        matches!(self, Self::SoftSkills | Self::General)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sector → list of matched phrases, iterated in taxonomy order.
pub type SkillMap = BTreeMap<Sector, Vec<String>>;

const BUILTIN_SKILLS: &[(Sector, &[&str])] = &[
    (Sector::Accountant, &["financial analysis", "tax preparation", "auditing", "budgeting", "bookkeeping", "payroll", "gaap", "ifrs", "quickbooks", "sap", "excel", "financial reporting"]),
    (Sector::Advocate, &["legal research", "litigation", "contract law", "negotiation", "courtroom experience", "client counseling", "legal writing", "case management", "appellate practice"]),
    (Sector::Agriculture, &["crop management", "soil science", "irrigation", "pest control", "farm management", "agricultural economics", "sustainability", "organic farming", "precision agriculture"]),
    (Sector::Apparel, &["fashion design", "textile knowledge", "pattern making", "sewing", "merchandising", "retail management", "brand development", "trend analysis", "supply chain"]),
    (Sector::Arts, &["graphic design", "illustration", "photography", "art history", "creative writing", "performing arts", "visual arts", "art education", "digital art"]),
    (Sector::Automobile, &["mechanical engineering", "auto repair", "diagnostics", "electrical systems", "engine tuning", "transmission", "brake systems", "automotive technology", "cad"]),
    (Sector::Aviation, &["piloting", "aircraft maintenance", "air traffic control", "aviation safety", "flight planning", "navigation", "aerodynamics", "regulatory compliance", "airport operations"]),
    (Sector::Banking, &["financial services", "credit analysis", "risk management", "investment banking", "loan processing", "customer service", "compliance", "fraud detection", "treasury"]),
    (Sector::Bpo, &["customer support", "data entry", "call center operations", "process improvement", "quality assurance", "telemarketing", "outsourcing", "client management", "crm"]),
    (Sector::BusinessDevelopment, &["sales", "market research", "strategic planning", "lead generation", "client acquisition", "partnership development", "negotiation", "crm", "business intelligence"]),
    (Sector::Chef, &["culinary arts", "menu planning", "food safety", "kitchen management", "recipe development", "catering", "baking", "pastry", "cost control"]),
    (Sector::Construction, &["project management", "blueprint reading", "safety regulations", "heavy machinery operation", "carpentry", "plumbing", "electrical work", "masonry", "estimating"]),
    (Sector::Consultant, &["strategic consulting", "problem-solving", "data analysis", "client relations", "project management", "industry expertise", "report writing", "presentation skills", "change management"]),
    (Sector::Designer, &["graphic design", "ui/ux design", "web design", "branding", "typography", "adobe creative suite", "prototyping", "user research", "wireframing"]),
    (Sector::DigitalMedia, &["social media management", "content creation", "seo", "sem", "video editing", "photography", "copywriting", "analytics", "influencer marketing"]),
    (Sector::Engineering, &["mechanical engineering", "electrical engineering", "civil engineering", "software engineering", "cad", "matlab", "project management", "quality control", "lean manufacturing"]),
    (Sector::Finance, &["financial modeling", "investment analysis", "portfolio management", "risk assessment", "financial reporting", "budgeting", "forecasting", "bloomberg", "derivatives"]),
    (Sector::Fitness, &["personal training", "group fitness instruction", "nutrition", "exercise physiology", "client assessment", "program design", "motivation", "safety", "rehabilitation"]),
    (Sector::Healthcare, &["patient care", "medical terminology", "emr", "clinical skills", "nursing", "pharmacy", "radiology", "surgery", "infection control"]),
    (Sector::Hr, &["recruitment", "employee relations", "performance management", "training", "compensation", "benefits", "labor laws", "hris", "talent acquisition"]),
    (Sector::InformationTechnology, &["programming", "network administration", "cybersecurity", "database management", "cloud computing", "it support", "software development", "systems analysis", "devops"]),
    (Sector::Legal, &["legal research", "contract law", "litigation", "negotiation", "compliance", "case management", "legal writing", "client counseling", "regulatory affairs"]),
    (Sector::Marketing, &["digital marketing", "content marketing", "social media marketing", "seo", "sem", "ppc", "google analytics", "brand management", "market research", "campaign management", "copywriting", "a/b testing", "conversion optimization"]),
    (Sector::Medical, &["patient care", "medical terminology", "clinical skills", "diagnosis", "treatment planning", "emergency care", "pharmacology", "healthcare regulations", "medical records"]),
    (Sector::Ngo, &["project management", "fundraising", "community outreach", "grant writing", "advocacy", "program evaluation", "stakeholder engagement", "volunteer management", "impact measurement"]),
    (Sector::Pharmaceutical, &["drug development", "clinical trials", "regulatory affairs", "pharmacology", "quality assurance", "sales", "marketing", "research and development", "gmp"]),
    (Sector::Research, &["data analysis", "statistical methods", "literature review", "experimental design", "report writing", "research methodologies", "fieldwork", "academic publishing", "peer review"]),
    (Sector::Retail, &["customer service", "inventory management", "sales", "merchandising", "visual display", "point of sale systems", "product knowledge", "store operations", "loss prevention"]),
    (Sector::PublicRelations, &["media relations", "press releases", "event planning", "crisis management", "social media", "content creation", "brand management", "stakeholder engagement", "reputation management"]),
    (Sector::Sales, &["lead generation", "customer relationship management", "sales strategy", "negotiation", "product knowledge", "closing deals", "market analysis", "cold calling", "account management"]),
    (Sector::Teacher, &["curriculum development", "classroom management", "lesson planning", "student assessment", "educational technology", "special education", "counseling", "pedagogy", "differentiated instruction"]),
    (Sector::TechnicalSupport, &["troubleshooting", "customer service", "hardware support", "software installation", "network troubleshooting", "remote support", "ticketing systems", "technical documentation", "escalation management"]),
    (Sector::Tourism, &["customer service", "itinerary planning", "travel booking", "cultural knowledge", "event management", "tour guiding", "hospitality", "sustainability", "destination marketing"]),
    (Sector::Transportation, &["logistics", "supply chain management", "fleet management", "route planning", "safety regulations", "customer service", "inventory management", "transportation planning", "warehouse management"]),
    (Sector::SoftSkills, &["communication", "teamwork", "problem-solving", "time management", "adaptability", "creativity", "work ethic", "interpersonal skills", "leadership", "attention to detail", "critical thinking"]),
];

/// A canonical phrase plus its precompiled word-boundary pattern.
#[derive(Debug, Clone)]
pub struct SkillPhrase {
    pub phrase: String,
    pub boundary: Regex,
}

impl SkillPhrase {
    fn new(phrase: &str) -> Option<Self> {
        let phrase = phrase.trim().to_lowercase();
        if phrase.is_empty() {
            return None;
        }
        match Regex::new(&format!(r"\b{}\b", regex::escape(&phrase))) {
            Ok(boundary) => Some(Self { phrase, boundary }),
            Err(e) => {
                warn!(%phrase, error = %e, "skipping skill phrase with no usable pattern");
                None
            }
        }
    }
}

/// Immutable, ordered sector → phrase table.
#[derive(Debug, Clone)]
pub struct SkillTaxonomy {
    sectors: Vec<(Sector, Vec<SkillPhrase>)>,
}

impl SkillTaxonomy {
    /// The built-in table covering 35 sectors plus soft skills.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_SKILLS
                .iter()
                .map(|(sector, phrases)| (*sector, phrases.iter().copied())),
        )
    }

    /// Builds a taxonomy from arbitrary entries. Repeated sectors are merged and
    /// duplicate phrases within a sector are kept once, first occurrence wins.
    pub fn from_entries<I, P, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (Sector, P)>,
        P: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut sectors: Vec<(Sector, Vec<SkillPhrase>)> = Vec::new();
        for (sector, phrases) in entries {
            let idx = match sectors.iter().position(|(s, _)| *s == sector) {
                Some(idx) => idx,
                None => {
                    sectors.push((sector, Vec::new()));
                    sectors.len() - 1
                }
            };
            let bucket = &mut sectors[idx].1;
            for phrase in phrases {
                let Some(phrase) = SkillPhrase::new(phrase.as_ref()) else {
                    continue;
                };
                if !bucket.iter().any(|p| p.phrase == phrase.phrase) {
                    bucket.push(phrase);
                }
            }
        }
        Self { sectors }
    }

    /// Narrows the taxonomy to the phrases present in `skills`, keeping the
    /// existing phrase order. Phrases not in this taxonomy are ignored.
    pub fn restrict(&self, skills: &SkillMap) -> Self {
        let sectors = self
            .sectors
            .iter()
            .filter_map(|(sector, phrases)| {
                let wanted = skills.get(sector)?;
                let kept: Vec<SkillPhrase> = phrases
                    .iter()
                    .filter(|p| wanted.iter().any(|w| *w == p.phrase))
                    .cloned()
                    .collect();
                (!kept.is_empty()).then_some((*sector, kept))
            })
            .collect();
        Self { sectors }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Sector, &[SkillPhrase])> {
        self.sectors.iter().map(|(s, p)| (*s, p.as_slice()))
    }

    #[cfg(test)]
    pub fn phrases(&self, sector: Sector) -> Option<&[SkillPhrase]> {
        self.sectors
            .iter()
            .find(|(s, _)| *s == sector)
            .map(|(_, p)| p.as_slice())
    }

    #[cfg(test)]
    pub fn contains(&self, sector: Sector, phrase: &str) -> bool {
        self.phrases(sector)
            .map(|ps| ps.iter().any(|p| p.phrase == phrase))
            .unwrap_or(false)
    }

    pub fn sector_count(&self) -> usize {
        self.sectors.len()
    }
}
