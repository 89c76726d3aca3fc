use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::MedLookupError;
use crate::sources::openfda::{
    LABEL_CANDIDATE_LIMIT, LabelRecord, LabelSearchField, OpenFdaClient,
};
use crate::transform;
use crate::transform::medicine::{FALLBACK_ICON_URL, NOT_FOUND};

/// Display record for one medicine lookup.
///
/// The four text fields hold either `"; "`-joined label text or
/// [`NOT_FOUND`]. `image` is always a usable URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MedicineInfo {
    pub purpose: String,
    pub dosage: String,
    pub side_effects: String,
    pub precautions: String,
    pub image: String,
}

impl MedicineInfo {
    pub fn has_label_data(&self) -> bool {
        [
            &self.purpose,
            &self.dosage,
            &self.side_effects,
            &self.precautions,
        ]
        .into_iter()
        .any(|field| field != NOT_FOUND)
    }
}

/// Outcome of a label lookup, before it is collapsed for display.
#[derive(Debug)]
pub enum LabelLookup {
    /// A candidate label had at least one usable section.
    Found(MedicineInfo),
    /// Labels matched but none had usable sections; carries the last
    /// candidate examined, paired with the fallback icon.
    Empty(MedicineInfo),
    /// Neither search key matched anything.
    NotFound,
    /// No label was retrieved and at least one search failed.
    Failed(MedLookupError),
}

impl LabelLookup {
    pub fn into_info(self, name: &str) -> MedicineInfo {
        match self {
            Self::Found(info) | Self::Empty(info) => info,
            Self::NotFound | Self::Failed(_) => {
                transform::medicine::not_found(transform::medicine::image_search_url(name))
            }
        }
    }

    pub fn status(&self) -> &'static str {
        match self {
            Self::Found(_) => "found",
            Self::Empty(_) => "empty",
            Self::NotFound => "not_found",
            Self::Failed(_) => "failed",
        }
    }
}

/// Anything that can answer an exact-match label search.
#[async_trait]
pub trait LabelSource: Send + Sync {
    async fn search_labels(
        &self,
        field: LabelSearchField,
        name: &str,
    ) -> Result<Vec<LabelRecord>, MedLookupError>;
}

#[async_trait]
impl LabelSource for OpenFdaClient {
    async fn search_labels(
        &self,
        field: LabelSearchField,
        name: &str,
    ) -> Result<Vec<LabelRecord>, MedLookupError> {
        self.label_search(field, name, LABEL_CANDIDATE_LIMIT).await
    }
}

const SEARCH_ORDER: [LabelSearchField; 2] =
    [LabelSearchField::GenericName, LabelSearchField::BrandName];

/// Looks `name` up by generic name, then brand name, and picks the first
/// candidate label with any usable section.
pub async fn lookup_with(source: &dyn LabelSource, name: &str) -> LabelLookup {
    let name = name.trim();
    if name.is_empty() {
        return LabelLookup::Failed(MedLookupError::InvalidArgument(
            "Medicine name is required.".into(),
        ));
    }

    let mut last_error = None;
    let mut candidates = Vec::new();
    for field in SEARCH_ORDER {
        match source.search_labels(field, name).await {
            Ok(records) if !records.is_empty() => {
                candidates = records;
                break;
            }
            Ok(_) => debug!(field = field.as_str(), name, "No labels matched"),
            Err(err) => {
                warn!(field = field.as_str(), name, error = %err, "Label search failed");
                last_error = Some(err);
            }
        }
    }

    let Some(last) = candidates.last() else {
        return match last_error {
            Some(err) => LabelLookup::Failed(err),
            None => LabelLookup::NotFound,
        };
    };

    let image = transform::medicine::image_search_url(name);
    for record in &candidates {
        let info = transform::medicine::from_label(record, image.clone());
        if info.has_label_data() {
            debug!(name, label_id = ?record.id, "Selected label");
            return LabelLookup::Found(info);
        }
    }

    LabelLookup::Empty(transform::medicine::from_label(
        last,
        FALLBACK_ICON_URL.to_string(),
    ))
}

/// Looks `name` up against openFDA.
pub async fn lookup(name: &str) -> LabelLookup {
    match OpenFdaClient::new() {
        Ok(client) => lookup_with(&client, name).await,
        Err(err) => LabelLookup::Failed(err),
    }
}

/// Resolves `name` against openFDA into display fields; failures become
/// placeholders.
pub async fn resolve(name: &str) -> MedicineInfo {
    match OpenFdaClient::new() {
        Ok(client) => resolve_with(&client, name).await,
        Err(err) => LabelLookup::Failed(err).into_info(name),
    }
}

/// Resolves `name` into display fields; failures become placeholders.
pub async fn resolve_with(source: &dyn LabelSource, name: &str) -> MedicineInfo {
    lookup_with(source, name).await.into_info(name)
}
