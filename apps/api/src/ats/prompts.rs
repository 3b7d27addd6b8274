/// Resume text beyond this many characters is cut before prompting.
pub const MAX_RESUME_CHARS: usize = 20_000;

const ANALYSIS_SCHEMA: &str = r#"{
  "score": 0-100,
  "issues": [
    {"type": "error|warning|success", "message": "specific issue"}
  ],
  "suggestions": ["specific suggestion 1", "specific suggestion 2"]
}"#;

pub fn analysis_prompt(resume_text: &str) -> String {
    let resume: String = resume_text.chars().take(MAX_RESUME_CHARS).collect();
    format!(
        "Analyze this resume for ATS (Applicant Tracking System) compatibility. \
         Provide a score out of 100 and detailed feedback.\n\n\
         RESUME TEXT:\n{resume}\n\n\
         Consider these ATS factors:\n\
         - Proper section headings (Experience, Education, Skills)\n\
         - Contact information completeness\n\
         - Keywords and industry terms\n\
         - Font and formatting simplicity\n\
         - Quantifiable achievements\n\
         - Relevant skills matching\n\n\
         Respond ONLY with a JSON object in this format:\n{ANALYSIS_SCHEMA}"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_resume_is_cut() {
        let resume = "x".repeat(MAX_RESUME_CHARS + 500);
        let prompt = analysis_prompt(&resume);
        assert!(!prompt.contains(&"x".repeat(MAX_RESUME_CHARS + 1)));
        assert!(prompt.contains(&"x".repeat(MAX_RESUME_CHARS)));
    }
}
