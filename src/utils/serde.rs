use serde::{Deserialize, Serialize};

/// A JSON field that upstream APIs send either as one string or as a list.
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum StringOrVec {
    #[default]
    None,
    Single(String),
    Multiple(Vec<String>),
}

impl StringOrVec {
    /// Entries that are non-empty after trimming, trimmed.
    pub fn non_blank(&self) -> Vec<&str> {
        let values: &[String] = match self {
            Self::None => &[],
            Self::Single(value) => std::slice::from_ref(value),
            Self::Multiple(values) => values,
        };
        values
            .iter()
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
            .collect()
    }
}
