//! Identifiers for hospitals and units, and the artifact fingerprint hash.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of a hospital in the unit directory.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HospitalId(String);

impl HospitalId {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Identifier of a unit (ward/floor). Unique across the whole directory.
#[derive(Clone, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UnitId(String);

impl UnitId {
    pub fn new<S: Into<String>>(value: S) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HospitalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Display for UnitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UnitId {
    fn from(value: &str) -> Self {
        UnitId::new(value)
    }
}

impl From<&str> for HospitalId {
    fn from(value: &str) -> Self {
        HospitalId::new(value)
    }
}

/// FNV-1a hash used to fingerprint model artifacts.
#[derive(Copy, Clone, Debug)]
pub struct SimpleHash(u32);

impl SimpleHash {
    pub fn new() -> Self {
        Self(2_166_136_261)
    }

    pub fn update(&mut self, bytes: &[u8]) {
        for b in bytes {
            self.0 = (self.0 ^ (*b as u32)).wrapping_mul(16_777_619);
        }
    }

    /// 8-character lowercase hex digest.
    pub fn finish_hex(&self) -> String {
        format!("{:08x}", self.0)
    }
}

impl Default for SimpleHash {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fnv_matches_reference_vector() {
        let mut hash = SimpleHash::new();
        hash.update(b"a");
        assert_eq!(hash.finish_hex(), "e40c292c");
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let mut a = SimpleHash::new();
        a.update(b"[\"hour_of_day\"]");
        let mut b = SimpleHash::new();
        b.update(b"[\"day_of_week\"]");
        assert_ne!(a.finish_hex(), b.finish_hex());
    }

    #[test]
    fn ids_serialize_as_plain_strings() {
        let id = UnitId::new("med-surg-3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"med-surg-3\"");
        let back: HospitalId = serde_json::from_str("\"general\"").unwrap();
        assert_eq!(back.as_str(), "general");
    }
}
