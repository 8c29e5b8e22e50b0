//! Media store that serves uploads under a fixed URL prefix.

use crate::task::{domain::PhotoUrl, ports::MediaStore};

/// Maps file references to `<prefix>/<file_ref>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefixMediaStore {
    prefix: String,
}

impl PrefixMediaStore {
    /// Creates a store serving files under `prefix`.
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        let raw: String = prefix.into();
        Self {
            prefix: raw.trim_end_matches('/').to_owned(),
        }
    }
}

impl Default for PrefixMediaStore {
    fn default() -> Self {
        Self::new("/uploads")
    }
}

impl MediaStore for PrefixMediaStore {
    fn stored_url(&self, file_ref: &str) -> PhotoUrl {
        PhotoUrl::new(format!(
            "{}/{}",
            self.prefix,
            file_ref.trim_start_matches('/')
        ))
    }
}
