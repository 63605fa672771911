//! Item identifiers
//!
//! Identifiers are opaque strings. Freshly created items get a time-ordered
//! UUIDv7, while any non-empty id found in older data is kept verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Opaque, stable identifier of a cataloged item
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "RawItemId", into = "String")]
pub struct ItemId(String);

/// Stored ids are strings, but very old data used bare timestamps
#[derive(Deserialize)]
#[serde(untagged)]
enum RawItemId {
    Text(String),
    Number(u64),
}

impl TryFrom<RawItemId> for ItemId {
    type Error = String;

    fn try_from(raw: RawItemId) -> Result<Self, Self::Error> {
        match raw {
            RawItemId::Text(s) => Self::parse(&s),
            RawItemId::Number(n) => Ok(Self(n.to_string())),
        }
    }
}

impl From<ItemId> for String {
    fn from(id: ItemId) -> Self {
        id.0
    }
}

impl ItemId {
    /// Create a new unique, creation-time-ordered ID
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier string
    pub fn parse(s: &str) -> Result<Self, String> {
        let s = s.trim();
        if s.is_empty() {
            return Err("Item ID cannot be empty".into());
        }
        Ok(Self(s.to_string()))
    }

    /// Get the raw identifier
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Short form for terminal display
    pub fn short(&self) -> &str {
        // v7 ids share their leading timestamp digits, so keep the random tail
        match self.0.rsplit_once('-') {
            Some((_, tail)) => match tail.char_indices().rev().nth(7) {
                Some((start, _)) => &tail[start..],
                None => &self.0,
            },
            None => &self.0,
        }
    }
}

impl Default for ItemId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ItemId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
