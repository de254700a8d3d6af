//! Prompt versions as embedded by the server, and the pair guard that runs
//! before any comparison.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{info, warn};

#[derive(Error, Debug)]
pub enum VersionLoadError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Rejections raised before a diff is attempted
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GuardError {
    #[error("Please select different versions to compare")]
    SameVersion,

    #[error("Need at least 2 versions to compare")]
    InsufficientVersions { count: usize },
}

/// A single immutable prompt version
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptVersion {
    pub version: i64,
    #[serde(default)]
    pub system_prompt: String,
    #[serde(default)]
    pub user_prompt: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(deserialize_with = "deserialize_timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        deserialize_with = "deserialize_optional_timestamp",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<UserRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_by: Option<UserRef>,
}

/// Author reference, the server sends either a numeric id or a username
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum UserRef {
    Id(i64),
    Name(String),
}

impl PromptVersion {
    /// Empty, inactive stand-in for a version the page does not know about
    pub fn placeholder(version: i64) -> Self {
        Self {
            version,
            system_prompt: String::new(),
            user_prompt: String::new(),
            is_active: false,
            created_at: DateTime::<Utc>::default(),
            updated_at: None,
            created_by: None,
            updated_by: None,
        }
    }
}

/// Accept RFC 3339 as well as the naive `isoformat()` output without offset
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn deserialize_timestamp<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    parse_timestamp(&raw)
        .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}")))
}

fn deserialize_optional_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) => parse_timestamp(&raw)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {raw}"))),
        None => Ok(None),
    }
}

/// Two versions chosen from the selectors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VersionPair {
    pub old: i64,
    pub new: i64,
}

impl VersionPair {
    pub fn new(old: i64, new: i64) -> Self {
        Self { old, new }
    }

    pub fn swapped(self) -> Self {
        Self {
            old: self.new,
            new: self.old,
        }
    }
}

/// Versions resolved for a comparison, unknown numbers already replaced
#[derive(Debug, Clone)]
pub struct SelectedPair {
    pub old: PromptVersion,
    pub new: PromptVersion,
}

/// Read-only collection of the versions embedded in the page, ordered by number
#[derive(Debug, Clone, Default)]
pub struct VersionSet {
    versions: Vec<PromptVersion>,
}

impl VersionSet {
    pub fn new(mut versions: Vec<PromptVersion>) -> Self {
        versions.sort_by_key(|v| v.version);
        Self { versions }
    }

    pub fn from_json(json: &str) -> Result<Self, VersionLoadError> {
        let versions: Vec<PromptVersion> = serde_json::from_str(json)?;
        Ok(Self::new(versions))
    }

    pub fn load(path: &Path) -> Result<Self, VersionLoadError> {
        let content = fs::read_to_string(path)?;
        let set = Self::from_json(&content)?;
        info!("Loaded {} prompt versions from {:?}", set.len(), path);
        Ok(set)
    }

    pub fn len(&self) -> usize {
        self.versions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.versions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PromptVersion> {
        self.versions.iter()
    }

    pub fn get(&self, version: i64) -> Option<&PromptVersion> {
        self.versions
            .binary_search_by_key(&version, |v| v.version)
            .ok()
            .map(|idx| &self.versions[idx])
    }

    pub fn active(&self) -> Option<&PromptVersion> {
        self.versions.iter().find(|v| v.is_active)
    }

    pub fn latest(&self) -> Option<&PromptVersion> {
        self.versions.last()
    }

    /// Previous-to-latest against latest, what the selectors start on
    pub fn default_pair(&self) -> Option<VersionPair> {
        match self.versions.as_slice() {
            [.., prev, last] => Some(VersionPair::new(prev.version, last.version)),
            _ => None,
        }
    }

    /// Run the guards and resolve both sides of the pair
    pub fn select(&self, pair: VersionPair) -> Result<SelectedPair, GuardError> {
        if pair.old == pair.new {
            warn!("Rejected comparison of version {} with itself", pair.old);
            return Err(GuardError::SameVersion);
        }
        if self.versions.len() < 2 {
            warn!("Need at least 2 versions, found {}", self.versions.len());
            return Err(GuardError::InsufficientVersions {
                count: self.versions.len(),
            });
        }

        Ok(SelectedPair {
            old: self.resolve(pair.old),
            new: self.resolve(pair.new),
        })
    }

    fn resolve(&self, version: i64) -> PromptVersion {
        match self.get(version) {
            Some(v) => v.clone(),
            None => {
                warn!("Version {} not found, comparing against empty text", version);
                PromptVersion::placeholder(version)
            }
        }
    }
}
