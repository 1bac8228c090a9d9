use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

pub const ALL: &str = "all";

/// A filter dimension: either the sentinel "all" or one exact value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Choice {
    #[default]
    All,
    Only(String),
}

impl Choice {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Choice::All => true,
            Choice::Only(wanted) => wanted == value,
        }
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Choice::All)
    }
}

impl From<&str> for Choice {
    fn from(value: &str) -> Self {
        if value == ALL {
            Choice::All
        } else {
            Choice::Only(value.to_string())
        }
    }
}

impl From<Option<String>> for Choice {
    fn from(value: Option<String>) -> Self {
        value.as_deref().map(Choice::from).unwrap_or_default()
    }
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str(ALL),
            Choice::Only(value) => f.write_str(value),
        }
    }
}

impl Serialize for Choice {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Choice {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Choice::from(raw.as_str()))
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortBy {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
    /// Ranks by number of batches. This is a stand-in until enrollment counts exist.
    Popular,
}

impl FromStr for SortBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest" => Ok(SortBy::Newest),
            "price-low" => Ok(SortBy::PriceLow),
            "price-high" => Ok(SortBy::PriceHigh),
            "popular" => Ok(SortBy::Popular),
            other => Err(format!("Unknown sort order: {}", other)),
        }
    }
}

/// Which screen a query runs for. The admin panel neither sorts nor filters by level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogVariant {
    Public,
    Admin,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    pub search_term: String,
    pub category: Choice,
    pub instructor: Choice,
    pub level: Choice,
    pub sort_by: SortBy,
}

impl FilterCriteria {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Response of `GET /courses/filters/all`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterOptions {
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub instructors: Vec<String>,
}
