use serde::{Deserialize, Serialize};

/// Maximum length of a derived identifier, in characters.
pub const MAX_ID_LEN: usize = 50;

/// Human-readable reconciliation key computed from a record title.
///
/// Two titles that differ only in case, punctuation or spacing map to the same id.
/// Distinct titles may still collide after normalization; the later write wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DerivedId(String);

impl DerivedId {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl std::fmt::Display for DerivedId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for DerivedId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lower-cases, drops everything but alphanumerics and whitespace, joins words with `-`
/// and bounds the result to [`MAX_ID_LEN`] characters.
pub fn derive(title: &str) -> DerivedId {
    let cleaned: String = title
        .chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric() || c.is_whitespace())
        .collect();
    let joined = cleaned.split_whitespace().collect::<Vec<_>>().join("-");
    let bounded: String = joined.chars().take(MAX_ID_LEN).collect();
    DerivedId(bounded.trim_end_matches('-').to_string())
}

/// Key for records identified by more than one natural field, e.g. a job title at a company.
pub fn derive_composite(parts: &[&str]) -> DerivedId {
    derive(&parts.join(" "))
}
