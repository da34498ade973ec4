use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer};

/// `major.minor.patch`, compared field by field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseVersionError(String);

impl fmt::Display for ParseVersionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid semantic version: {:?}", self.0)
    }
}

impl std::error::Error for ParseVersionError {}

impl SemanticVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self { major, minor, patch }
    }
}

impl FromStr for SemanticVersion {
    type Err = ParseVersionError;

    /// Exactly three dot-separated integers; anything else is rejected.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseVersionError(s.to_string());
        let parts: Vec<&str> = s.split('.').collect();
        let [major, minor, patch] = parts.as_slice() else {
            return Err(err());
        };
        Ok(Self {
            major: major.parse().map_err(|_| err())?,
            minor: minor.parse().map_err(|_| err())?,
            patch: patch.parse().map_err(|_| err())?,
        })
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

impl<'de> Deserialize<'de> for SemanticVersion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_malformed_input() {
        for bad in ["a", "1.2", "1.2.3.4", "1.2.3a", "", "1..3", "-1.2.3"] {
            assert!(bad.parse::<SemanticVersion>().is_err(), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_ordering() {
        let v = |s: &str| s.parse::<SemanticVersion>().unwrap();
        let (s1, s2, s3, s4) = (v("1.2.3"), v("1.2.0"), v("1.0.3"), v("2.0.0"));
        assert!(s1 > s2);
        assert!(s1 > s3);
        assert!(s1 < s4);
        assert!(s2 > s3);
        assert!(s2 < s4);
        assert!(s3 < s4);
        assert_eq!(v("1.10.0").cmp(&v("1.9.9")), std::cmp::Ordering::Greater);
    }

    #[test]
    fn test_display_and_deserialize() {
        let parsed: SemanticVersion = serde_json::from_str("\"4.0.12\"").unwrap();
        assert_eq!(parsed, SemanticVersion::new(4, 0, 12));
        assert_eq!(parsed.to_string(), "4.0.12");
        assert!(serde_json::from_str::<SemanticVersion>("\"4.0\"").is_err());
    }
}
