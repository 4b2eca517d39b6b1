use std::fmt;

use serde::{
    ser::SerializeMap,
    Serialize,
    Serializer,
};
use serde_json::Value;

pub const ENDPOINT_KEY: &str = "endpoint";
pub const MERGE_THRESHOLD_KEY: &str = "merge_threshold";
pub const PARTITION_THRESHOLD_KEY: &str = "partition_threshold";
pub const LANGUAGE_SCOPE_KEY: &str = "LanguageScope";

/// A pipeline-step reference. Every variant carries an endpoint identifier;
/// the variant itself is decided once, when the raw entry is parsed.
#[derive(Debug, Clone, PartialEq)]
pub enum Script {
    Plain { endpoint: String },
    Threshold { endpoint: String, merge_threshold: f64, partition_threshold: f64 },
    LanguageScope { endpoint: String, languages: Vec<String> },
}

impl Script {
    pub fn plain(endpoint: impl Into<String>) -> Self {
        Script::Plain { endpoint: endpoint.into() }
    }

    pub fn from_raw(raw: &Value) -> Self {
        let entry = match raw.as_object() {
            Some(entry) => entry,
            None => return Script::default(),
        };

        let endpoint =
            entry.get(ENDPOINT_KEY).and_then(Value::as_str).unwrap_or_default().to_string();

        // merge_threshold wins over LanguageScope when an entry carries both
        if entry.contains_key(MERGE_THRESHOLD_KEY) {
            Script::Threshold {
                endpoint,
                merge_threshold: entry
                    .get(MERGE_THRESHOLD_KEY)
                    .and_then(Value::as_f64)
                    .unwrap_or_default(),
                partition_threshold: entry
                    .get(PARTITION_THRESHOLD_KEY)
                    .and_then(Value::as_f64)
                    .unwrap_or_default(),
            }
        } else if let Some(scope) = entry.get(LANGUAGE_SCOPE_KEY) {
            Script::LanguageScope { endpoint, languages: language_list(scope) }
        } else {
            Script::Plain { endpoint }
        }
    }

    pub fn endpoint(&self) -> &str {
        match self {
            Script::Plain { endpoint } => endpoint,
            Script::Threshold { endpoint, .. } => endpoint,
            Script::LanguageScope { endpoint, .. } => endpoint,
        }
    }
}

impl Default for Script {
    fn default() -> Self {
        Script::Plain { endpoint: String::new() }
    }
}

impl fmt::Display for Script {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.endpoint())
    }
}

// The write side dispatches on the tag and emits exactly the fields the
// variant defines, so unrecognized keys on a raw script entry do not survive.
impl Serialize for Script {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Script::Plain { endpoint } => {
                let mut entry = serializer.serialize_map(Some(1))?;
                entry.serialize_entry(ENDPOINT_KEY, endpoint)?;
                entry.end()
            }
            Script::Threshold { endpoint, merge_threshold, partition_threshold } => {
                let mut entry = serializer.serialize_map(Some(3))?;
                entry.serialize_entry(ENDPOINT_KEY, endpoint)?;
                entry.serialize_entry(MERGE_THRESHOLD_KEY, merge_threshold)?;
                entry.serialize_entry(PARTITION_THRESHOLD_KEY, partition_threshold)?;
                entry.end()
            }
            Script::LanguageScope { endpoint, languages } => {
                let mut entry = serializer.serialize_map(Some(2))?;
                entry.serialize_entry(ENDPOINT_KEY, endpoint)?;
                entry.serialize_entry(LANGUAGE_SCOPE_KEY, languages)?;
                entry.end()
            }
        }
    }
}

fn language_list(scope: &Value) -> Vec<String> {
    scope
        .as_array()
        .map(|values| values.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default()
}
