//! In-memory `CareerStore` for tests, with hooks to inject store failures.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use crate::ats::record::AnalysisRecord;
use crate::courses::record::CourseRecord;
use crate::ingest::identity::DerivedId;
use crate::ingest::score::{AssociationKind, Recommendation};
use crate::jobs::record::{JobRecord, JobType};
use crate::models::analysis::AnalysisRow;
use crate::models::association::AssociationRow;
use crate::models::course::{CourseFilter, CourseRow, RecommendedCourse};
use crate::models::job::{JobRow, MatchedJob};
use crate::models::profile::UserProfile;
use crate::store::{CareerStore, StoreError};

#[derive(Default)]
struct Tables {
    profiles: HashMap<Uuid, UserProfile>,
    courses: HashMap<String, CourseRow>,
    jobs: HashMap<String, JobRow>,
    analyses: HashMap<(Uuid, String), AnalysisRow>,
    associations: HashMap<(AssociationKind, Uuid, String), AssociationRow>,
}

#[derive(Default)]
struct Faults {
    rejected: HashSet<String>,
    conflict_once: HashSet<String>,
    unavailable: bool,
}

#[derive(Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
    faults: Mutex<Faults>,
    writes: Mutex<usize>,
}

impl InMemoryStore {
    /// Upserts keyed by `id` fail with a constraint violation.
    pub fn rejecting(self, id: &str) -> Self {
        self.faults.lock().unwrap().rejected.insert(id.to_string());
        self
    }

    /// The first upsert keyed by `id` reports a duplicate-key race.
    pub fn conflicting_once(self, id: &str) -> Self {
        self.faults.lock().unwrap().conflict_once.insert(id.to_string());
        self
    }

    /// Every call fails as if the database were down.
    pub fn unavailable(self) -> Self {
        self.faults.lock().unwrap().unavailable = true;
        self
    }

    pub fn insert_profile(&self, profile: UserProfile) {
        self.tables
            .lock()
            .unwrap()
            .profiles
            .insert(profile.id, profile);
    }

    pub fn course_count(&self) -> usize {
        self.tables.lock().unwrap().courses.len()
    }

    pub fn job_count(&self) -> usize {
        self.tables.lock().unwrap().jobs.len()
    }

    pub fn analysis_count(&self) -> usize {
        self.tables.lock().unwrap().analyses.len()
    }

    pub fn association_count(&self, kind: AssociationKind) -> usize {
        self.tables
            .lock()
            .unwrap()
            .associations
            .keys()
            .filter(|(k, _, _)| *k == kind)
            .count()
    }

    pub fn course(&self, id: &str) -> Option<CourseRow> {
        self.tables.lock().unwrap().courses.get(id).cloned()
    }

    /// Number of write attempts, including failed ones.
    pub fn write_attempts(&self) -> usize {
        *self.writes.lock().unwrap()
    }

    fn check_available(&self) -> Result<(), StoreError> {
        if self.faults.lock().unwrap().unavailable {
            return Err(StoreError::Unavailable("connection refused".to_string()));
        }
        Ok(())
    }

    fn check_write(&self, key: &str) -> Result<(), StoreError> {
        *self.writes.lock().unwrap() += 1;
        self.check_available()?;
        let mut faults = self.faults.lock().unwrap();
        if faults.rejected.contains(key) {
            return Err(StoreError::Constraint(format!("check violation on {key}")));
        }
        if faults.conflict_once.remove(key) {
            return Err(StoreError::Conflict(format!("duplicate key {key}")));
        }
        if key.is_empty() {
            return Err(StoreError::Constraint("empty key".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl CareerStore for InMemoryStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        self.check_available()?;
        Ok(self.tables.lock().unwrap().profiles.get(&user_id).cloned())
    }

    async fn search_profiles(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserProfile>, StoreError> {
        self.check_available()?;
        let needle = query.to_lowercase();
        let contains = |field: &Option<String>| {
            field
                .as_deref()
                .is_some_and(|value| value.to_lowercase().contains(&needle))
        };
        let mut hits: Vec<UserProfile> = self
            .tables
            .lock()
            .unwrap()
            .profiles
            .values()
            .filter(|p| contains(&p.bio) || contains(&p.industry))
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        hits.truncate(limit.max(0) as usize);
        Ok(hits)
    }

    async fn upsert_course(
        &self,
        id: &DerivedId,
        course: &CourseRecord,
    ) -> Result<CourseRow, StoreError> {
        self.check_write(id.as_str())?;
        let now = Utc::now();
        let mut tables = self.tables.lock().unwrap();
        let created_at = tables.courses.get(id.as_str()).map_or(now, |c| c.created_at);
        let row = CourseRow {
            id: id.as_str().to_string(),
            title: course.title.clone(),
            provider: course.provider.clone(),
            rating: course.rating,
            students: course.students,
            duration: course.duration.clone(),
            level: course.level.as_str().to_string(),
            price: course.price.clone(),
            skills: course.skills.clone(),
            description: course.description.clone(),
            category: course.category.clone(),
            external_url: course.external_url.clone(),
            created_at,
            updated_at: now,
        };
        tables.courses.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn upsert_job(&self, id: &DerivedId, job: &JobRecord) -> Result<JobRow, StoreError> {
        self.check_write(id.as_str())?;
        let now = Utc::now();
        let mut tables = self.tables.lock().unwrap();
        let created_at = tables.jobs.get(id.as_str()).map_or(now, |j| j.created_at);
        let row = JobRow {
            id: id.as_str().to_string(),
            title: job.title.clone(),
            company: job.company.clone(),
            location: job.location.clone(),
            job_type: job.job_type.as_str().to_string(),
            salary: job.salary.clone(),
            salary_min: job.salary_min,
            salary_max: job.salary_max,
            remote: job.remote,
            posted_date: job.posted_date.clone(),
            skills: job.skills.clone(),
            description: job.description.clone(),
            requirements: job.requirements.clone(),
            benefits: job.benefits.clone(),
            external_url: job.external_url.clone(),
            created_at,
            updated_at: now,
        };
        tables.jobs.insert(row.id.clone(), row.clone());
        Ok(row)
    }

    async fn upsert_analysis(
        &self,
        user_id: Uuid,
        file_key: &DerivedId,
        file_name: &str,
        analysis: &AnalysisRecord,
    ) -> Result<AnalysisRow, StoreError> {
        self.check_write(file_key.as_str())?;
        let issues = serde_json::to_value(&analysis.issues)
            .map_err(|e| StoreError::Constraint(e.to_string()))?;
        let now = Utc::now();
        let key = (user_id, file_key.as_str().to_string());
        let mut tables = self.tables.lock().unwrap();
        let (id, created_at) = tables
            .analyses
            .get(&key)
            .map_or((Uuid::new_v4(), now), |a| (a.id, a.created_at));
        let row = AnalysisRow {
            id,
            user_id,
            file_key: key.1.clone(),
            file_name: file_name.to_string(),
            score: i16::from(analysis.score.value()),
            issues,
            suggestions: analysis.suggestions.clone(),
            created_at,
            updated_at: now,
        };
        tables.analyses.insert(key, row.clone());
        Ok(row)
    }

    async fn upsert_association(
        &self,
        kind: AssociationKind,
        user_id: Uuid,
        entity_id: &str,
        recommendation: &Recommendation,
    ) -> Result<AssociationRow, StoreError> {
        self.check_available()?;
        let row = AssociationRow {
            user_id,
            entity_id: entity_id.to_string(),
            score: i16::from(recommendation.score.value()),
            score_estimated: recommendation.estimated,
            reasons: recommendation.reasons.clone(),
            updated_at: Utc::now(),
        };
        self.tables
            .lock()
            .unwrap()
            .associations
            .insert((kind, user_id, entity_id.to_string()), row.clone());
        Ok(row)
    }

    async fn course_recommendations(
        &self,
        user_id: Uuid,
        filter: &CourseFilter,
    ) -> Result<Vec<RecommendedCourse>, StoreError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<RecommendedCourse> = tables
            .associations
            .iter()
            .filter(|((kind, user, _), _)| *kind == AssociationKind::Course && *user == user_id)
            .filter_map(|((_, _, entity), assoc)| {
                let course = tables.courses.get(entity)?;
                course_matches(filter, course).then(|| RecommendedCourse {
                    course: course.clone(),
                    recommendation_score: assoc.score,
                    score_estimated: assoc.score_estimated,
                    reasons: assoc.reasons.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.recommendation_score.cmp(&a.recommendation_score));
        Ok(rows)
    }

    async fn job_matches(
        &self,
        user_id: Uuid,
        job_type: Option<JobType>,
    ) -> Result<Vec<MatchedJob>, StoreError> {
        self.check_available()?;
        let tables = self.tables.lock().unwrap();
        let mut rows: Vec<MatchedJob> = tables
            .associations
            .iter()
            .filter(|((kind, user, _), _)| *kind == AssociationKind::Job && *user == user_id)
            .filter_map(|((_, _, entity), assoc)| {
                let job = tables.jobs.get(entity)?;
                let wanted = job_type.map_or(true, |t| job.job_type == t.as_str());
                wanted.then(|| MatchedJob {
                    job: job.clone(),
                    match_score: assoc.score,
                    score_estimated: assoc.score_estimated,
                    reasons: assoc.reasons.clone(),
                })
            })
            .collect();
        rows.sort_by(|a, b| b.match_score.cmp(&a.match_score));
        Ok(rows)
    }

    async fn analyses_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalysisRow>, StoreError> {
        self.check_available()?;
        let mut rows: Vec<AnalysisRow> = self
            .tables
            .lock()
            .unwrap()
            .analyses
            .values()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        rows.truncate(limit.max(0) as usize);
        Ok(rows)
    }
}

fn course_matches(filter: &CourseFilter, course: &CourseRow) -> bool {
    filter.level.map_or(true, |level| course.level == level.as_str())
        && filter
            .category
            .as_deref()
            .map_or(true, |category| course.category.eq_ignore_ascii_case(category))
}

pub fn profile(name: &str, industry: &str, bio: &str, skills: &[&str]) -> UserProfile {
    UserProfile {
        id: Uuid::new_v4(),
        name: Some(name.to_string()),
        email: Some(format!("{}@example.com", name.to_lowercase().replace(' ', "."))),
        image_url: None,
        industry: Some(industry.to_string()),
        bio: Some(bio.to_string()),
        skills: skills.iter().map(|s| s.to_string()).collect(),
        experience_years: Some(4),
        created_at: Utc::now(),
    }
}
