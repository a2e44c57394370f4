//! Domain identifier types with proper encapsulation.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Asset identifier - newtype for type safety.
///
/// Exchange symbols arrive with inconsistent casing and padding, so every
/// constructor normalizes to a trimmed, upper-case form. Two ids built from
/// `" bnb"` and `"BNB "` compare equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct AssetId(String);

impl AssetId {
    /// Create a new `AssetId` from a raw symbol.
    pub fn new(id: impl AsRef<str>) -> Self {
        Self(id.as_ref().trim().to_uppercase())
    }

    /// Parse a raw exchange symbol, rejecting blanks.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        let id = Self::new(raw);
        (!id.0.is_empty()).then_some(id)
    }

    /// Get the asset ID as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AssetId {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for AssetId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<AssetId> for String {
    fn from(id: AssetId) -> Self {
        id.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_normalizes_case_and_whitespace() {
        assert_eq!(AssetId::new(" bnb "), AssetId::new("BNB"));
        assert_eq!(AssetId::new("koge").as_str(), "KOGE");
    }

    #[test]
    fn asset_id_parse_rejects_blank() {
        assert!(AssetId::parse("   ").is_none());
        assert_eq!(AssetId::parse("zkj"), Some(AssetId::new("ZKJ")));
    }

    #[test]
    fn asset_id_serde_normalizes_on_read() {
        let id: AssetId = serde_json::from_str("\" aop\"").unwrap();
        assert_eq!(id.as_str(), "AOP");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AOP\"");
    }
}
