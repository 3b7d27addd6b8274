use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::ingest::fields::{Fields, Rejection, Vocabulary};
use crate::ingest::kind::{CandidateRecord, RecordKind};
use crate::ingest::score::Score;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobLevel {
    Junior,
    #[default]
    Mid,
    Senior,
}

impl Vocabulary for JobLevel {
    const VARIANTS: &'static [Self] = &[JobLevel::Junior, JobLevel::Mid, JobLevel::Senior];

    fn label(self) -> &'static str {
        match self {
            JobLevel::Junior => "junior",
            JobLevel::Mid => "mid",
            JobLevel::Senior => "senior",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            JobLevel::Junior => &["entry", "entrylevel", "graduate"],
            JobLevel::Mid => &["midlevel", "intermediate"],
            JobLevel::Senior => &["lead", "staff", "principal"],
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkMode {
    Remote,
    #[default]
    Hybrid,
    Onsite,
}

impl Vocabulary for WorkMode {
    const VARIANTS: &'static [Self] = &[WorkMode::Remote, WorkMode::Hybrid, WorkMode::Onsite];

    fn label(self) -> &'static str {
        match self {
            WorkMode::Remote => "remote",
            WorkMode::Hybrid => "hybrid",
            WorkMode::Onsite => "onsite",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            WorkMode::Remote => &["wfh", "fullyremote"],
            WorkMode::Hybrid => &[],
            WorkMode::Onsite => &["office", "inoffice", "inperson"],
        }
    }
}

/// Structured requirements extracted from a job description; drives candidate search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateQuery {
    pub required_skills: Vec<String>,
    pub preferred_skills: Vec<String>,
    pub experience: String,
    pub education: String,
    pub keywords: Vec<String>,
    pub job_level: JobLevel,
    pub industry: String,
    pub work_type: WorkMode,
}

impl CandidateQuery {
    /// Required and preferred skills, lower-cased and deduplicated.
    pub fn wanted_skills(&self) -> Vec<String> {
        let mut skills: Vec<String> = self
            .required_skills
            .iter()
            .chain(&self.preferred_skills)
            .map(|s| s.to_lowercase())
            .collect();
        skills.sort();
        skills.dedup();
        skills
    }
}

impl CandidateRecord for CandidateQuery {
    const KIND: RecordKind = RecordKind::CandidateQuery;

    fn from_fields(fields: &Fields<'_>) -> Result<Self, Rejection> {
        Ok(Self {
            required_skills: fields.list("requiredSkills"),
            preferred_skills: fields.list("preferredSkills"),
            experience: fields.text_or("experience", "Not specified"),
            education: fields.text_or("education", "Not specified"),
            keywords: fields.list("keywords"),
            job_level: fields.choice("jobLevel"),
            industry: fields.text_or("industry", "general"),
            work_type: fields.choice("workType"),
        })
    }

    fn fallback() -> Vec<Self> {
        vec![CandidateQuery {
            required_skills: vec![
                "Communication".to_string(),
                "Problem Solving".to_string(),
                "Teamwork".to_string(),
            ],
            preferred_skills: Vec::new(),
            experience: "Not specified".to_string(),
            education: "Not specified".to_string(),
            keywords: Vec::new(),
            job_level: JobLevel::Mid,
            industry: "general".to_string(),
            work_type: WorkMode::Hybrid,
        }]
    }
}

/// A stored candidate profile matched against a search, with its scores.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateSearchHit {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub image_url: Option<String>,
    pub industry: Option<String>,
    pub bio: Option<String>,
    pub skills: Vec<String>,
    pub experience_years: Option<i32>,
    pub match_score: Score,
    pub match_score_estimated: bool,
    pub ats_score: Score,
    pub ats_score_estimated: bool,
    pub matched_skills: Vec<String>,
}
