//! Storage key generation

use std::fmt;

/// Object key for one upload: `{base_path}/{uuid}.csv`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StorageKey(String);

impl StorageKey {
    /// Generate a fresh key under `base_path`
    ///
    /// `base_path` is used as given, without a trailing `/`. An empty base
    /// path puts the object at the bucket root.
    pub fn generate(base_path: &str) -> Self {
        let id = uuid::Uuid::new_v4();
        if base_path.is_empty() {
            Self(format!("{id}.csv"))
        } else {
            Self(format!("{base_path}/{id}.csv"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
