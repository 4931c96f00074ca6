use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Stand-in text for any page that yielded no usable biography.
pub const NO_INFORMATION: &str = "No information available.";

pub type Country = String;

/// Outcome of extracting one encyclopedia page.
///
/// Kept as a variant internally and collapsed to the sentinel string only
/// when serialised.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Biography {
    Paragraph(String),
    #[default]
    Unavailable,
}

impl Biography {
    /// Wrap extracted text, treating blank text and the sentinel itself as no data.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let trimmed = text.trim();
        if trimmed.is_empty() || trimmed == NO_INFORMATION {
            Biography::Unavailable
        } else {
            Biography::Paragraph(trimmed.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Biography::Paragraph(text) => text,
            Biography::Unavailable => NO_INFORMATION,
        }
    }

    pub fn is_available(&self) -> bool {
        matches!(self, Biography::Paragraph(_))
    }
}

impl Serialize for Biography {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Biography {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        String::deserialize(deserializer).map(Biography::from_text)
    }
}

/// One record from the directory API. Only `wikipedia_url` is inspected;
/// everything else rides along in `fields`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leader {
    pub wikipedia_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_wiki_par: Option<Biography>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Leader {
    /// Human-readable name built from the pass-through `first_name`/`last_name` fields.
    pub fn display_name(&self) -> String {
        let part = |key: &str| self.fields.get(key).and_then(Value::as_str).unwrap_or("");
        let name = format!("{} {}", part("first_name"), part("last_name"));
        let name = name.trim();
        if name.is_empty() {
            self.wikipedia_url.clone()
        } else {
            name.to_string()
        }
    }
}

/// Country-keyed leader lists.
///
/// Every walk over the leaders goes through `leaders`, `leaders_mut` or
/// `wikipedia_urls`, which share the map's key order followed by list order.
/// Dispatch and merge both rely on that single ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LeadersIndex(BTreeMap<Country, Vec<Leader>>);

impl LeadersIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, country: Country, leaders: Vec<Leader>) {
        self.0.insert(country, leaders);
    }

    pub fn get(&self, country: &str) -> Option<&[Leader]> {
        self.0.get(country).map(Vec::as_slice)
    }

    pub fn country_count(&self) -> usize {
        self.0.len()
    }

    pub fn leader_count(&self) -> usize {
        self.0.values().map(Vec::len).sum()
    }

    /// `(country, leader)` pairs in flattening order.
    pub fn leaders(&self) -> impl Iterator<Item = (&Country, &Leader)> {
        self.0
            .iter()
            .flat_map(|(country, leaders)| leaders.iter().map(move |l| (country, l)))
    }

    pub fn leaders_mut(&mut self) -> impl Iterator<Item = &mut Leader> {
        self.0.values_mut().flatten()
    }

    pub fn wikipedia_urls(&self) -> Vec<String> {
        self.leaders().map(|(_, l)| l.wikipedia_url.clone()).collect()
    }
}
