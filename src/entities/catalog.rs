use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::MedLookupError;

pub const CATALOG_FILE: &str = "medicines.json";
pub const QUOTES_FILE: &str = "quotes.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purpose: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dosage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub side_effects: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precautions: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// Entry in the keyed catalog shape, where the key supplies a missing name.
#[derive(Debug, Deserialize)]
struct KeyedCatalogEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    purpose: Option<String>,
    #[serde(default)]
    dosage: Option<String>,
    #[serde(default)]
    side_effects: Option<String>,
    #[serde(default)]
    precautions: Option<String>,
    #[serde(default)]
    image: Option<String>,
}

impl KeyedCatalogEntry {
    fn into_entry(self, key: String) -> CatalogEntry {
        CatalogEntry {
            name: self.name.filter(|n| !n.trim().is_empty()).unwrap_or(key),
            category: self.category,
            purpose: self.purpose,
            dosage: self.dosage,
            side_effects: self.side_effects,
            precautions: self.precautions,
            image: self.image,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum CatalogFile {
    List(Vec<CatalogEntry>),
    Keyed(BTreeMap<String, KeyedCatalogEntry>),
}

impl CatalogFile {
    fn into_entries(self) -> Vec<CatalogEntry> {
        match self {
            Self::List(entries) => entries,
            Self::Keyed(map) => map
                .into_iter()
                .map(|(key, entry)| entry.into_entry(key))
                .collect(),
        }
    }
}

/// Local medicine dataset, read once at startup.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct StaticCatalog {
    entries: Vec<CatalogEntry>,
}

impl StaticCatalog {
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self { entries }
    }

    /// Reads the catalog file. Every entry must carry a non-blank name.
    pub async fn load(path: &Path) -> Result<Self, MedLookupError> {
        let file: CatalogFile = read_json(path).await?;
        let entries = file.into_entries();
        if let Some(index) = entries.iter().position(|e| e.name.trim().is_empty()) {
            return Err(MedLookupError::DataFile {
                path: PathBuf::from(path),
                reason: format!("entry {index} has a blank name"),
            });
        }
        Ok(Self::from_entries(entries))
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries whose name or category contains `query`, ignoring case.
    pub fn filter(&self, query: &str) -> Vec<&CatalogEntry> {
        let needle = query.trim().to_lowercase();
        if needle.is_empty() {
            return self.entries.iter().collect();
        }
        self.entries
            .iter()
            .filter(|entry| {
                entry.name.to_lowercase().contains(&needle)
                    || entry
                        .category
                        .as_deref()
                        .is_some_and(|c| c.to_lowercase().contains(&needle))
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Quote {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum QuoteRecord {
    Text(String),
    Full {
        text: String,
        #[serde(default)]
        author: Option<String>,
    },
}

impl From<QuoteRecord> for Quote {
    fn from(record: QuoteRecord) -> Self {
        match record {
            QuoteRecord::Text(text) => Self { text, author: None },
            QuoteRecord::Full { text, author } => Self {
                text,
                author: author.filter(|a| !a.trim().is_empty()),
            },
        }
    }
}

/// Health quotes, read once at startup.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct QuoteSet {
    quotes: Vec<Quote>,
}

impl QuoteSet {
    pub fn from_quotes(quotes: Vec<Quote>) -> Self {
        Self { quotes }
    }

    pub async fn load(path: &Path) -> Result<Self, MedLookupError> {
        let records: Vec<QuoteRecord> = read_json(path).await?;
        Ok(Self::from_quotes(records.into_iter().map(Quote::from).collect()))
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }
}

/// Both read-only datasets served by the web app.
#[derive(Debug, Clone, Default)]
pub struct StaticData {
    pub catalog: StaticCatalog,
    pub quotes: QuoteSet,
}

impl StaticData {
    /// Loads `medicines.json` and `quotes.json` from `dir`.
    pub async fn load_dir(dir: &Path) -> Result<Self, MedLookupError> {
        let catalog = StaticCatalog::load(&dir.join(CATALOG_FILE)).await?;
        let quotes = QuoteSet::load(&dir.join(QUOTES_FILE)).await?;
        info!(
            dir = %dir.display(),
            medicines = catalog.entries().len(),
            quotes = quotes.quotes().len(),
            "Loaded static data"
        );
        Ok(Self { catalog, quotes })
    }
}

async fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, MedLookupError> {
    let data_err = |reason: String| MedLookupError::DataFile {
        path: PathBuf::from(path),
        reason,
    };
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|err| data_err(err.to_string()))?;
    serde_json::from_slice(&bytes).map_err(|err| data_err(err.to_string()))
}
