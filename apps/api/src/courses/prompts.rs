use crate::ingest::kind::MAX_RECORDS;
use crate::llm_client::prompts::profile_block;
use crate::models::profile::UserProfile;

const COURSE_SCHEMA: &str = r#"[
  {
    "title": "Course Name",
    "provider": "Platform Name",
    "rating": 4.5,
    "students": 15000,
    "duration": "6 weeks",
    "level": "Beginner|Intermediate|Advanced",
    "price": "$49",
    "skills": ["skill1", "skill2"],
    "description": "Brief course description",
    "category": "Programming",
    "externalUrl": "https://example.com/course",
    "matchScore": 85,
    "reasons": ["why this course fits the profile"]
  }
]"#;

pub fn recommendation_prompt(profile: &UserProfile) -> String {
    format!(
        "Based on this user profile, recommend relevant online courses.\n\n\
         {profile}\n\n\
         Generate exactly {count} diverse course recommendations. \
         Focus on skills gap analysis and career progression. \
         matchScore is how well the course fits the profile, from 0 to 100.\n\n\
         Respond ONLY with a JSON array in this format:\n{COURSE_SCHEMA}",
        profile = profile_block(profile),
        count = MAX_RECORDS,
    )
}
