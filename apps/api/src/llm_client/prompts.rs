// Cross-cutting prompt fragments. Each feature keeps its own prompts.rs next to its service.

use crate::models::profile::UserProfile;

/// System prompt that asks for bare JSON. Output is sanitized regardless.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured career assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON value. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Renders the profile fields the prompts rely on. Missing values read as "Not specified".
pub fn profile_block(profile: &UserProfile) -> String {
    let or_unspecified = |value: &Option<String>| {
        value
            .as_deref()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or("Not specified")
            .to_string()
    };
    let skills = if profile.skills.is_empty() {
        "Not specified".to_string()
    } else {
        profile.skills.join(", ")
    };
    let experience = profile
        .experience_years
        .map(|years| format!("{years} years"))
        .unwrap_or_else(|| "Not specified".to_string());

    format!(
        "USER PROFILE:\n\
         - Industry: {}\n\
         - Skills: {}\n\
         - Experience: {}\n\
         - Bio: {}",
        or_unspecified(&profile.industry),
        skills,
        experience,
        or_unspecified(&profile.bio),
    )
}
