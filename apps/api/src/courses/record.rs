use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::ingest::fields::{Fields, Rejection, Vocabulary};
use crate::ingest::identity::{derive, DerivedId};
use crate::ingest::kind::{CandidateRecord, RecordKind};
use crate::ingest::reconcile::{IngestContext, Reconcile};
use crate::ingest::score::{AssociationKind, Recommendation};
use crate::models::course::CourseRow;
use crate::store::{CareerStore, StoreError};

const DEFAULT_REASON: &str = "AI recommendation based on profile";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CourseLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl CourseLevel {
    pub fn as_str(self) -> &'static str {
        self.label()
    }
}

impl Vocabulary for CourseLevel {
    const VARIANTS: &'static [Self] = &[
        CourseLevel::Beginner,
        CourseLevel::Intermediate,
        CourseLevel::Advanced,
    ];

    fn label(self) -> &'static str {
        match self {
            CourseLevel::Beginner => "Beginner",
            CourseLevel::Intermediate => "Intermediate",
            CourseLevel::Advanced => "Advanced",
        }
    }

    fn aliases(self) -> &'static [&'static str] {
        match self {
            CourseLevel::Beginner => &["introductory", "entry", "basic"],
            CourseLevel::Intermediate => &["medium"],
            CourseLevel::Advanced => &["expert"],
        }
    }
}

/// A course recommendation as produced by the model, after coercion.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseRecord {
    pub title: String,
    pub provider: String,
    pub rating: f64,
    pub students: i64,
    pub duration: String,
    pub level: CourseLevel,
    pub price: String,
    pub skills: Vec<String>,
    pub description: String,
    pub category: String,
    pub external_url: String,
    pub reasons: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
}

impl CandidateRecord for CourseRecord {
    const KIND: RecordKind = RecordKind::Course;

    fn from_fields(fields: &Fields<'_>) -> Result<Self, Rejection> {
        let title = fields.require_str("title")?;
        if derive(&title).is_empty() {
            return Err(Rejection::Invalid { field: "title" });
        }

        Ok(Self {
            title,
            provider: fields.require_str("provider")?,
            rating: fields.f64_or("rating", 4.5).clamp(0.0, 5.0),
            students: fields.i64_or("students", 1000).max(0),
            duration: fields.text_or("duration", "4 weeks"),
            level: fields.choice("level"),
            price: fields.text_or("price", "Free"),
            skills: fields.list("skills"),
            description: fields.require_str("description")?,
            category: fields.require_str("category")?,
            external_url: fields.text_or("externalUrl", "#"),
            reasons: fields.list_or("reasons", &[DEFAULT_REASON]),
            match_score: fields.opt_f64("matchScore"),
        })
    }

    fn fallback() -> Vec<Self> {
        vec![
            course(
                "Complete Web Development Bootcamp",
                "Udemy",
                4.6,
                45_000,
                "12 weeks",
                CourseLevel::Beginner,
                "$79",
                &["HTML", "CSS", "JavaScript", "React"],
                "Learn web development from scratch with hands-on projects",
                "Programming",
                "https://udemy.com/course/web-development",
            ),
            course(
                "Data Science with Python",
                "Coursera",
                4.8,
                32_000,
                "10 weeks",
                CourseLevel::Intermediate,
                "$99",
                &["Python", "Pandas", "Machine Learning"],
                "Master data science fundamentals and machine learning",
                "Data Science",
                "https://coursera.org/course/data-science-python",
            ),
            course(
                "UI/UX Design Fundamentals",
                "Udemy",
                4.7,
                28_000,
                "8 weeks",
                CourseLevel::Beginner,
                "$65",
                &["Figma", "Design Thinking", "Prototyping"],
                "Learn modern UI/UX design principles and tools",
                "Design",
                "https://udemy.com/course/ui-ux-design",
            ),
            course(
                "Digital Marketing Strategy",
                "Coursera",
                4.5,
                22_000,
                "6 weeks",
                CourseLevel::Intermediate,
                "$89",
                &["SEO", "Social Media", "Analytics"],
                "Master digital marketing and grow your online presence",
                "Marketing",
                "https://coursera.org/course/digital-marketing",
            ),
            course(
                "Business Analytics with Excel",
                "edX",
                4.4,
                18_000,
                "8 weeks",
                CourseLevel::Advanced,
                "$129",
                &["Excel", "SQL", "Tableau"],
                "Learn business intelligence and data analytics",
                "Business",
                "https://edx.org/course/business-analytics",
            ),
            course(
                "Cloud Computing Fundamentals",
                "AWS",
                4.3,
                25_000,
                "4 weeks",
                CourseLevel::Intermediate,
                "Free",
                &["AWS", "Cloud Architecture", "DevOps"],
                "Learn cloud computing basics with AWS",
                "Programming",
                "https://aws.amazon.com/training/",
            ),
        ]
    }
}

#[async_trait]
impl Reconcile for CourseRecord {
    type Entity = CourseRow;

    fn natural_key(&self, _ctx: &IngestContext) -> DerivedId {
        derive(&self.title)
    }

    fn label(&self) -> &str {
        &self.title
    }

    async fn upsert(
        &self,
        store: &dyn CareerStore,
        _ctx: &IngestContext,
        key: &DerivedId,
    ) -> Result<CourseRow, StoreError> {
        store.upsert_course(key, self).await
    }

    fn association(&self) -> Option<(AssociationKind, Recommendation)> {
        Some((
            AssociationKind::Course,
            Recommendation::new(self.match_score, self.reasons.clone()),
        ))
    }
}

#[allow(clippy::too_many_arguments)]
fn course(
    title: &str,
    provider: &str,
    rating: f64,
    students: i64,
    duration: &str,
    level: CourseLevel,
    price: &str,
    skills: &[&str],
    description: &str,
    category: &str,
    external_url: &str,
) -> CourseRecord {
    CourseRecord {
        title: title.to_string(),
        provider: provider.to_string(),
        rating,
        students,
        duration: duration.to_string(),
        level,
        price: price.to_string(),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        description: description.to_string(),
        category: category.to_string(),
        external_url: external_url.to_string(),
        reasons: vec![DEFAULT_REASON.to_string()],
        match_score: None,
    }
}
