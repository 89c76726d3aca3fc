use std::borrow::Cow;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::error::MedLookupError;
use crate::utils::query::{encode_component, quote_phrase};
use crate::utils::serde::StringOrVec;

pub(crate) const OPENFDA_BASE: &str = "https://api.fda.gov";
pub(crate) const OPENFDA_BASE_ENV: &str = "MEDLOOKUP_OPENFDA_BASE";
const OPENFDA_API: &str = "openfda";
const LABEL_PATH: &str = "drug/label.json";

/// Number of label records requested per search.
pub(crate) const LABEL_CANDIDATE_LIMIT: usize = 3;

/// Label fields a medicine name can be matched against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelSearchField {
    GenericName,
    BrandName,
}

impl LabelSearchField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::GenericName => "openfda.generic_name",
            Self::BrandName => "openfda.brand_name",
        }
    }
}

pub struct OpenFdaClient {
    client: reqwest::Client,
    base: Cow<'static, str>,
    api_key: Option<String>,
}

impl OpenFdaClient {
    pub fn new() -> Result<Self, MedLookupError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: crate::sources::env_base(OPENFDA_BASE, OPENFDA_BASE_ENV),
            api_key: crate::sources::openfda_api_key(),
        })
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(base: String, api_key: Option<String>) -> Result<Self, MedLookupError> {
        Ok(Self {
            client: crate::sources::shared_client()?,
            base: Cow::Owned(base),
            api_key: api_key
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty()),
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base.as_ref().trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// Builds the label search URL by hand so the phrase is percent-encoded
    /// (`%20`, `%22`) rather than form-encoded (`+`), which openFDA would read
    /// as a term separator.
    fn label_search_url(&self, field: LabelSearchField, name: &str, limit: usize) -> String {
        let term = encode_component(&quote_phrase(name));
        format!(
            "{}?search={}:{term}&limit={limit}",
            self.endpoint(LABEL_PATH),
            field.as_str()
        )
    }

    pub(crate) fn label_endpoint(&self) -> String {
        self.endpoint(LABEL_PATH)
    }

    async fn get_json_optional<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<Option<T>, MedLookupError> {
        let resp = req.send().await?;
        let status = resp.status();
        let content_type = resp.headers().get(reqwest::header::CONTENT_TYPE).cloned();
        let bytes = crate::sources::read_limited_body(resp, OPENFDA_API).await?;

        // openFDA answers a search with zero matches with 404 NOT_FOUND.
        if status.as_u16() == 404 {
            return Ok(None);
        }

        if !status.is_success() {
            let excerpt = crate::sources::body_excerpt(&bytes);
            return Err(MedLookupError::Api {
                api: OPENFDA_API.to_string(),
                message: format!("HTTP {status}: {excerpt}"),
            });
        }

        crate::sources::ensure_json_content_type(OPENFDA_API, content_type.as_ref(), &bytes)?;

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| MedLookupError::ApiJson {
                api: OPENFDA_API.to_string(),
                source,
            })
    }

    /// Searches drug labels whose `field` exactly matches `name`.
    ///
    /// Returns an empty list when openFDA has no match.
    pub async fn label_search(
        &self,
        field: LabelSearchField,
        name: &str,
        limit: usize,
    ) -> Result<Vec<LabelRecord>, MedLookupError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(MedLookupError::InvalidArgument(
                "Medicine name is required. Example: medlookup lookup ibuprofen".into(),
            ));
        }
        if limit == 0 || limit > 100 {
            return Err(MedLookupError::InvalidArgument(
                "Label search limit must be between 1 and 100".into(),
            ));
        }

        let url = self.label_search_url(field, name, limit);
        let mut req = self.client.get(&url);
        if let Some(key) = self.api_key.as_deref() {
            req = req.query(&[("api_key", key)]);
        }

        let Some(resp) = self
            .get_json_optional::<OpenFdaResponse<LabelRecord>>(req)
            .await?
        else {
            debug!(field = field.as_str(), name, "openFDA returned no label matches");
            return Ok(Vec::new());
        };

        debug!(
            field = field.as_str(),
            name,
            returned = resp.results.len(),
            total = ?resp.meta.as_ref().map(|m| m.results.total),
            "openFDA label search"
        );
        Ok(resp.results)
    }
}

#[derive(Debug, Deserialize)]
pub struct OpenFdaResponse<T> {
    #[serde(default)]
    pub meta: Option<OpenFdaMeta>,
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub struct OpenFdaMeta {
    pub results: OpenFdaMetaResults,
}

#[derive(Debug, Deserialize)]
pub struct OpenFdaMetaResults {
    #[serde(default)]
    pub total: usize,
}

/// One structured product label, reduced to the sections the lookup reads.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LabelRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub indications_and_usage: StringOrVec,
    #[serde(default)]
    pub dosage_and_administration: StringOrVec,
    #[serde(default)]
    pub adverse_reactions: StringOrVec,
    #[serde(default)]
    pub precautions: StringOrVec,
    #[serde(default)]
    pub precautions_and_warnings: StringOrVec,
    #[serde(default)]
    pub warnings: StringOrVec,
}
