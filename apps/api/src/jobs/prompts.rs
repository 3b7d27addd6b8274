use crate::ingest::kind::MAX_RECORDS;
use crate::jobs::service::JobPreferences;
use crate::llm_client::prompts::profile_block;
use crate::models::profile::UserProfile;

const JOB_SCHEMA: &str = r#"[
  {
    "title": "Job Title",
    "company": "Company Name",
    "location": "City, State",
    "type": "Full-time|Part-time|Contract|Freelance|Internship",
    "salary": "$80k - $120k",
    "salaryMin": 80000,
    "salaryMax": 120000,
    "remote": true,
    "postedDate": "2 days ago",
    "matchScore": 85,
    "skills": ["skill1", "skill2"],
    "description": "Job description...",
    "requirements": ["requirement1", "requirement2"],
    "benefits": ["benefit1", "benefit2"],
    "externalUrl": "https://company.com/job",
    "reasons": ["why this role fits the profile"]
  }
]"#;

pub fn match_prompt(profile: &UserProfile, preferences: &JobPreferences) -> String {
    let location = preferences.location.as_deref().unwrap_or("Any");
    let remote = match preferences.remote {
        Some(true) => "Remote only",
        Some(false) => "On-site or hybrid",
        None => "Any",
    };
    let salary = preferences
        .salary_min
        .map(|min| format!("${min}"))
        .unwrap_or_else(|| "Not specified".to_string());
    let job_type = preferences.job_type.map_or("Any", |t| t.as_str());

    format!(
        "Generate job recommendations for this user profile.\n\n\
         {profile}\n\n\
         USER PREFERENCES:\n\
         - Location: {location}\n\
         - Remote: {remote}\n\
         - Minimum Salary: {salary}\n\
         - Job Type: {job_type}\n\n\
         Generate exactly {count} diverse job opportunities. \
         matchScore is how well the role fits the profile and preferences, from 0 to 100.\n\n\
         Respond ONLY with a JSON array in this format:\n{JOB_SCHEMA}",
        profile = profile_block(profile),
        count = MAX_RECORDS,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::jobs::record::JobType;
    use crate::store::memory::profile;

    #[test]
    fn test_preferences_are_rendered() {
        let preferences = JobPreferences {
            location: Some("Berlin".to_string()),
            remote: Some(true),
            salary_min: Some(90_000),
            job_type: Some(JobType::Contract),
        };
        let prompt = match_prompt(&profile("Ada", "Fintech", "", &[]), &preferences);
        assert!(prompt.contains("- Location: Berlin"));
        assert!(prompt.contains("- Remote: Remote only"));
        assert!(prompt.contains("- Minimum Salary: $90000"));
        assert!(prompt.contains("- Job Type: Contract"));
    }

    #[test]
    fn test_missing_preferences_read_as_any() {
        let prompt = match_prompt(&profile("Ada", "Fintech", "", &[]), &JobPreferences::default());
        assert!(prompt.contains("- Location: Any"));
        assert!(prompt.contains("- Minimum Salary: Not specified"));
    }
}
