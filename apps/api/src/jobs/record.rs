use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ingest::fields::{Fields, Rejection, Vocabulary};
use crate::ingest::identity::{derive, derive_composite, DerivedId};
use crate::ingest::kind::{CandidateRecord, RecordKind};
use crate::ingest::reconcile::{IngestContext, Reconcile};
use crate::ingest::score::{AssociationKind, Recommendation};
use crate::models::job::JobRow;
use crate::store::{CareerStore, StoreError};

const DEFAULT_REASON: &str = "AI match based on profile";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobType {
    #[default]
    #[serde(rename = "Full-time")]
    FullTime,
    #[serde(rename = "Part-time")]
    PartTime,
    Contract,
    Freelance,
    Internship,
}

impl JobType {
    pub fn as_str(self) -> &'static str {
        self.label()
    }
}

impl Vocabulary for JobType {
    const VARIANTS: &'static [Self] = &[
        JobType::FullTime,
        JobType::PartTime,
        JobType::Contract,
        JobType::Freelance,
        JobType::Internship,
    ];

    fn label(self) -> &'static str {
        match self {
            JobType::FullTime => "Full-time",
            JobType::PartTime => "Part-time",
            JobType::Contract => "Contract",
            JobType::Freelance => "Freelance",
            JobType::Internship => "Internship",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            JobType::FullTime => &["permanent", "fte"],
            JobType::Contract => &["contractor", "temporary", "temp"],
            JobType::Internship => &["intern"],
            JobType::PartTime | JobType::Freelance => &[],
        }
    }
}

/// A job opportunity as produced by the model, after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JobRecord {
    pub title: String,
    pub company: String,
    pub location: String,
    #[serde(rename = "type")]
    pub job_type: JobType,
    pub salary: String,
    pub salary_min: i64,
    pub salary_max: i64,
    pub remote: bool,
    pub posted_date: String,
    pub skills: Vec<String>,
    pub description: String,
    pub requirements: Vec<String>,
    pub benefits: Vec<String>,
    pub external_url: String,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

impl CandidateRecord for JobRecord {
    const KIND: RecordKind = RecordKind::Job;

    fn from_fields(fields: &Fields<'_>) -> Result<Self, Rejection> {
        let title = fields.require_str("title")?;
        if derive(&title).is_empty() {
            return Err(Rejection::Invalid { field: "title" });
        }
        let salary_min = fields.i64_or("salaryMin", 0).max(0);
        let salary_max = fields.i64_or("salaryMax", 0).max(0);
        let (salary_min, salary_max) = if salary_max != 0 && salary_min > salary_max {
            (salary_max, salary_min)
        } else {
            (salary_min, salary_max)
        };

        Ok(Self {
            title,
            company: fields.require_str("company")?,
            location: fields.text_or("location", "Not specified"),
            job_type: fields.choice("type"),
            salary: fields.text_or("salary", "Not disclosed"),
            salary_min,
            salary_max,
            remote: fields.bool_or("remote", false),
            posted_date: fields.text_or("postedDate", "Recently"),
            skills: fields.list("skills"),
            description: fields.require_str("description")?,
            requirements: fields.list("requirements"),
            benefits: fields.list("benefits"),
            external_url: fields.text_or("externalUrl", "#"),
            reasons: fields.list_or("reasons", &[DEFAULT_REASON]),
            match_score: fields.opt_f64("matchScore"),
        })
    }

    fn fallback() -> Vec<Self> {
        vec![
            JobSeed {
                title: "Software Developer",
                company: "TechCorp",
                location: "Remote",
                job_type: JobType::FullTime,
                salary: "$80k - $120k",
                range: (80_000, 120_000),
                remote: true,
                posted: "1 day ago",
                score: 85.0,
                skills: &["JavaScript", "React", "Node.js"],
                description: "Join our dynamic development team to build cutting-edge web applications using modern technologies.",
                requirements: &["3+ years experience", "JavaScript proficiency", "React experience"],
                url: "https://example.com/job/1",
            },
            JobSeed {
                title: "Frontend Developer",
                company: "InnovateLab",
                location: "New York, NY",
                job_type: JobType::FullTime,
                salary: "$70k - $100k",
                range: (70_000, 100_000),
                remote: false,
                posted: "3 days ago",
                score: 78.0,
                skills: &["React", "TypeScript", "CSS"],
                description: "Build beautiful user interfaces for our next-generation platform.",
                requirements: &["2+ years frontend experience", "React expertise", "Design skills"],
                url: "https://example.com/job/2",
            },
            JobSeed {
                title: "Full Stack Engineer",
                company: "SaaS Solutions",
                location: "San Francisco, CA",
                job_type: JobType::FullTime,
                salary: "$100k - $140k",
                range: (100_000, 140_000),
                remote: true,
                posted: "1 week ago",
                score: 92.0,
                skills: &["React", "Node.js", "PostgreSQL", "AWS"],
                description: "Lead development of our enterprise SaaS platform serving millions of users.",
                requirements: &["5+ years experience", "Full-stack expertise", "Cloud experience"],
                url: "https://example.com/job/3",
            },
            JobSeed {
                title: "Backend Developer",
                company: "FinTech Pro",
                location: "Austin, TX",
                job_type: JobType::Contract,
                salary: "$60/hour",
                range: (120_000, 125_000),
                remote: true,
                posted: "5 days ago",
                score: 88.0,
                skills: &["Python", "Django", "PostgreSQL", "Redis"],
                description: "Build scalable backend systems for financial applications.",
                requirements: &["4+ years backend experience", "Python expertise", "Financial domain knowledge"],
                url: "https://example.com/job/4",
            },
            JobSeed {
                title: "Mobile Developer",
                company: "HealthTech Inc",
                location: "Boston, MA",
                job_type: JobType::FullTime,
                salary: "$85k - $115k",
                range: (85_000, 115_000),
                remote: false,
                posted: "2 days ago",
                score: 75.0,
                skills: &["React Native", "iOS", "Android", "JavaScript"],
                description: "Develop mobile applications that improve healthcare outcomes.",
                requirements: &["3+ years mobile development", "React Native experience", "Healthcare interest"],
                url: "https://example.com/job/5",
            },
            JobSeed {
                title: "DevOps Engineer",
                company: "CloudFirst",
                location: "Seattle, WA",
                job_type: JobType::FullTime,
                salary: "$95k - $125k",
                range: (95_000, 125_000),
                remote: true,
                posted: "4 days ago",
                score: 82.0,
                skills: &["AWS", "Docker", "Kubernetes", "Terraform"],
                description: "Manage cloud infrastructure and deployment pipelines for high-traffic applications.",
                requirements: &["4+ years DevOps experience", "AWS certification preferred", "Container orchestration"],
                url: "https://example.com/job/6",
            },
        ]
        .into_iter()
        .map(JobSeed::into_record)
        .collect()
    }
}

#[async_trait]
impl Reconcile for JobRecord {
    type Entity = JobRow;

    /// The same title at two companies is two postings.
    fn natural_key(&self, _ctx: &IngestContext) -> DerivedId {
        derive_composite(&[&self.title, &self.company])
    }

    fn label(&self) -> &str {
        &self.title
    }

    async fn upsert(
        &self,
        store: &dyn CareerStore,
        _ctx: &IngestContext,
        key: &DerivedId,
    ) -> Result<JobRow, StoreError> {
        store.upsert_job(key, self).await
    }

    fn association(&self) -> Option<(AssociationKind, Recommendation)> {
        Some((
            AssociationKind::Job,
            Recommendation::new(self.match_score, self.reasons.clone()),
        ))
    }
}

struct JobSeed {
    title: &'static str,
    company: &'static str,
    location: &'static str,
    job_type: JobType,
    salary: &'static str,
    range: (i64, i64),
    remote: bool,
    posted: &'static str,
    score: f64,
    skills: &'static [&'static str],
    description: &'static str,
    requirements: &'static [&'static str],
    url: &'static str,
}

impl JobSeed {
    fn into_record(self) -> JobRecord {
        let owned = |items: &[&str]| items.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        JobRecord {
            title: self.title.to_string(),
            company: self.company.to_string(),
            location: self.location.to_string(),
            job_type: self.job_type,
            salary: self.salary.to_string(),
            salary_min: self.range.0,
            salary_max: self.range.1,
            remote: self.remote,
            posted_date: self.posted.to_string(),
            skills: owned(self.skills),
            description: self.description.to_string(),
            requirements: owned(self.requirements),
            benefits: Vec::new(),
            external_url: self.url.to_string(),
            reasons: vec![DEFAULT_REASON.to_string()],
            match_score: Some(self.score),
        }
    }
}
