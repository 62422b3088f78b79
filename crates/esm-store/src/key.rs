use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

/// Lowercase form used for case-insensitive record lookup.
///
/// Only ASCII is folded: ids are Windows-1252 text and the game compares
/// them byte-wise after folding A-Z.
pub fn normalize(id: &str) -> String {
    id.to_ascii_lowercase()
}

/// A record id that compares case-insensitively but remembers how it was
/// spelled when it was inserted.
#[derive(Clone, Default)]
pub struct CiKey {
    original: String,
    normalized: String,
}

impl CiKey {
    pub fn new(id: &str) -> Self {
        Self {
            original: id.to_string(),
            normalized: normalize(id),
        }
    }

    /// The id as it appeared in the content file.
    pub fn original(&self) -> &str {
        &self.original
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}

impl PartialEq for CiKey {
    fn eq(&self, other: &Self) -> bool {
        self.normalized == other.normalized
    }
}

impl Eq for CiKey {}

impl Hash for CiKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.normalized.hash(state);
    }
}

impl PartialOrd for CiKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CiKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.normalized.cmp(&other.normalized)
    }
}

/// Lets a map keyed by `CiKey` be queried with an already-normalized `&str`.
impl Borrow<str> for CiKey {
    fn borrow(&self) -> &str {
        &self.normalized
    }
}

impl fmt::Debug for CiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self.original)
    }
}

impl fmt::Display for CiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.original)
    }
}

impl Serialize for CiKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.original)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn compares_case_insensitively() {
        assert_eq!(CiKey::new("Balmora"), CiKey::new("bALMORA"));
        assert_ne!(CiKey::new("Balmora"), CiKey::new("Balmora, Guild"));
    }

    #[test]
    fn keeps_original_spelling() {
        let key = CiKey::new("Fargoth");
        assert_eq!(key.original(), "Fargoth");
        assert_eq!(key.normalized(), "fargoth");
        assert_eq!(key.to_string(), "Fargoth");
    }

    #[test]
    fn map_lookup_by_normalized_str() {
        let mut map = BTreeMap::new();
        map.insert(CiKey::new("Seyda Neen"), 1);
        assert_eq!(map.get("seyda neen"), Some(&1));
        assert_eq!(map.get(normalize("SEYDA NEEN").as_str()), Some(&1));
    }
}
