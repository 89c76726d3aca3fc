use serde::Serialize;

use crate::error::MedLookupError;

pub fn to_pretty<T: Serialize>(value: &T) -> Result<String, MedLookupError> {
    Ok(serde_json::to_string_pretty(value)?)
}
