use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// How date strings that carry a UTC offset are turned into wall-clock values.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateMode {
    Utc,
    #[default]
    Local,
}

#[derive(Debug, Clone, Error, PartialEq)]
#[error("Unknown date mode '{0}', expected 'utc' or 'local'")]
pub struct UnknownDateMode(pub String);

impl FromStr for DateMode {
    type Err = UnknownDateMode;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "utc" => Ok(DateMode::Utc),
            "local" => Ok(DateMode::Local),
            _ => Err(UnknownDateMode(s.to_string())),
        }
    }
}

/// Options for compiling and applying a rule tree.
///
/// Deserializable so hosts can embed it in their own configuration; missing keys take their defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildOptions {
    /// Read every field through the record's default indexer, using the whole field string as the key
    pub use_indexed_property: bool,
    /// Name the default indexer is declared under
    pub indexed_property_name: String,
    pub date_mode: DateMode,
}

impl Default for BuildOptions {
    fn default() -> Self { Self { use_indexed_property: false, indexed_property_name: "Item".to_string(), date_mode: DateMode::default() } }
}

impl BuildOptions {
    pub fn new() -> Self { Self::default() }

    pub fn with_indexed_property(mut self, name: impl Into<String>) -> Self {
        self.use_indexed_property = true;
        self.indexed_property_name = name.into();
        self
    }

    pub fn with_date_mode(mut self, date_mode: DateMode) -> Self {
        self.date_mode = date_mode;
        self
    }
}
