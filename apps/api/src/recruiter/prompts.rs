/// Job descriptions beyond this many characters are cut before prompting.
pub const MAX_DESCRIPTION_CHARS: usize = 12_000;

const QUERY_SCHEMA: &str = r#"{
  "requiredSkills": ["skill1", "skill2"],
  "preferredSkills": ["skill3", "skill4"],
  "experience": "3-5 years",
  "education": "Bachelor's degree",
  "keywords": ["keyword1", "keyword2"],
  "jobLevel": "junior|mid|senior",
  "industry": "tech|finance|healthcare|etc",
  "workType": "remote|hybrid|onsite"
}"#;

pub fn job_analysis_prompt(job_description: &str) -> String {
    let description: String = job_description.chars().take(MAX_DESCRIPTION_CHARS).collect();
    format!(
        "Analyze this job description and extract its key requirements.\n\n\
         JOB DESCRIPTION:\n{description}\n\n\
         Respond ONLY with a JSON object in this format:\n{QUERY_SCHEMA}"
    )
}
