use async_trait::async_trait;
use sqlx::PgPool;
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

/// PostgreSQL-backed store. Every write is a single `INSERT … ON CONFLICT … DO UPDATE`.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn association_table(kind: AssociationKind) -> &'static str {
    match kind {
        AssociationKind::Course => "user_course_recommendations",
        AssociationKind::Job => "user_job_matches",
    }
}

/// Escapes LIKE wildcards so the query matches literally.
fn like_pattern(query: &str) -> String {
    let escaped = query
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[async_trait]
impl CareerStore for PgStore {
    async fn find_profile(&self, user_id: Uuid) -> Result<Option<UserProfile>, StoreError> {
        Ok(
            sqlx::query_as::<_, UserProfile>("SELECT * FROM user_profiles WHERE id = $1")
                .bind(user_id)
                .fetch_optional(&self.pool)
                .await?,
        )
    }

    async fn search_profiles(
        &self,
        query: &str,
        limit: i64,
    ) -> Result<Vec<UserProfile>, StoreError> {
        Ok(sqlx::query_as::<_, UserProfile>(
            r#"
            SELECT * FROM user_profiles
            WHERE bio ILIKE $1 OR industry ILIKE $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(like_pattern(query))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }

    async fn upsert_course(
        &self,
        id: &DerivedId,
        course: &CourseRecord,
    ) -> Result<CourseRow, StoreError> {
        Ok(sqlx::query_as::<_, CourseRow>(
            r#"
            INSERT INTO courses
                (id, title, provider, rating, students, duration, level, price,
                 skills, description, category, external_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                provider = EXCLUDED.provider,
                rating = EXCLUDED.rating,
                students = EXCLUDED.students,
                duration = EXCLUDED.duration,
                level = EXCLUDED.level,
                price = EXCLUDED.price,
                skills = EXCLUDED.skills,
                description = EXCLUDED.description,
                category = EXCLUDED.category,
                external_url = EXCLUDED.external_url,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(id.as_str())
        .bind(&course.title)
        .bind(&course.provider)
        .bind(course.rating)
        .bind(course.students)
        .bind(&course.duration)
        .bind(course.level.as_str())
        .bind(&course.price)
        .bind(&course.skills)
        .bind(&course.description)
        .bind(&course.category)
        .bind(&course.external_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn upsert_job(&self, id: &DerivedId, job: &JobRecord) -> Result<JobRow, StoreError> {
        Ok(sqlx::query_as::<_, JobRow>(
            r#"
            INSERT INTO job_postings
                (id, title, company, location, job_type, salary, salary_min, salary_max,
                 remote, posted_date, skills, description, requirements, benefits, external_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            ON CONFLICT (id) DO UPDATE SET
                title = EXCLUDED.title,
                company = EXCLUDED.company,
                location = EXCLUDED.location,
                job_type = EXCLUDED.job_type,
                salary = EXCLUDED.salary,
                salary_min = EXCLUDED.salary_min,
                salary_max = EXCLUDED.salary_max,
                remote = EXCLUDED.remote,
                posted_date = EXCLUDED.posted_date,
                skills = EXCLUDED.skills,
                description = EXCLUDED.description,
                requirements = EXCLUDED.requirements,
                benefits = EXCLUDED.benefits,
                external_url = EXCLUDED.external_url,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(id.as_str())
        .bind(&job.title)
        .bind(&job.company)
        .bind(&job.location)
        .bind(job.job_type.as_str())
        .bind(&job.salary)
        .bind(job.salary_min)
        .bind(job.salary_max)
        .bind(job.remote)
        .bind(&job.posted_date)
        .bind(&job.skills)
        .bind(&job.description)
        .bind(&job.requirements)
        .bind(&job.benefits)
        .bind(&job.external_url)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn upsert_analysis(
        &self,
        user_id: Uuid,
        file_key: &DerivedId,
        file_name: &str,
        analysis: &AnalysisRecord,
    ) -> Result<AnalysisRow, StoreError> {
        let issues = serde_json::to_value(&analysis.issues)
            .map_err(|e| StoreError::Constraint(format!("unserializable issues: {e}")))?;

        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            INSERT INTO ats_analyses (user_id, file_key, file_name, score, issues, suggestions)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (user_id, file_key) DO UPDATE SET
                file_name = EXCLUDED.file_name,
                score = EXCLUDED.score,
                issues = EXCLUDED.issues,
                suggestions = EXCLUDED.suggestions,
                updated_at = now()
            RETURNING *
            "#,
        )
        .bind(user_id)
        .bind(file_key.as_str())
        .bind(file_name)
        .bind(i16::from(analysis.score.value()))
        .bind(issues)
        .bind(&analysis.suggestions)
        .fetch_one(&self.pool)
        .await?)
    }

    async fn upsert_association(
        &self,
        kind: AssociationKind,
        user_id: Uuid,
        entity_id: &str,
        recommendation: &Recommendation,
    ) -> Result<AssociationRow, StoreError> {
        let sql = format!(
            r#"
            INSERT INTO {table} (user_id, entity_id, score, score_estimated, reasons)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (user_id, entity_id) DO UPDATE SET
                score = EXCLUDED.score,
                score_estimated = EXCLUDED.score_estimated,
                reasons = EXCLUDED.reasons,
                updated_at = now()
            RETURNING *
            "#,
            table = association_table(kind)
        );

        Ok(sqlx::query_as::<_, AssociationRow>(&sql)
            .bind(user_id)
            .bind(entity_id)
            .bind(i16::from(recommendation.score.value()))
            .bind(recommendation.estimated)
            .bind(&recommendation.reasons)
            .fetch_one(&self.pool)
            .await?)
    }

    async fn course_recommendations(
        &self,
        user_id: Uuid,
        filter: &CourseFilter,
    ) -> Result<Vec<RecommendedCourse>, StoreError> {
        Ok(sqlx::query_as::<_, RecommendedCourse>(
            r#"
            SELECT c.*,
                   r.score AS recommendation_score,
                   r.score_estimated,
                   r.reasons
            FROM user_course_recommendations r
            JOIN courses c ON c.id = r.entity_id
            WHERE r.user_id = $1
              AND ($2::text IS NULL OR c.level = $2)
              AND ($3::text IS NULL OR lower(c.category) = lower($3))
            ORDER BY r.score DESC, r.updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(filter.level.map(|level| level.as_str()))
        .bind(filter.category.as_deref())
        .fetch_all(&self.pool)
        .await?)
    }

    async fn job_matches(
        &self,
        user_id: Uuid,
        job_type: Option<JobType>,
    ) -> Result<Vec<MatchedJob>, StoreError> {
        Ok(sqlx::query_as::<_, MatchedJob>(
            r#"
            SELECT j.*,
                   m.score AS match_score,
                   m.score_estimated,
                   m.reasons
            FROM user_job_matches m
            JOIN job_postings j ON j.id = m.entity_id
            WHERE m.user_id = $1
              AND ($2::text IS NULL OR j.job_type = $2)
            ORDER BY m.score DESC, m.updated_at DESC
            "#,
        )
        .bind(user_id)
        .bind(job_type.map(|t| t.as_str()))
        .fetch_all(&self.pool)
        .await?)
    }

    async fn analyses_for_user(
        &self,
        user_id: Uuid,
        limit: i64,
    ) -> Result<Vec<AnalysisRow>, StoreError> {
        Ok(sqlx::query_as::<_, AnalysisRow>(
            r#"
            SELECT * FROM ats_analyses
            WHERE user_id = $1
            ORDER BY updated_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?)
    }
}
