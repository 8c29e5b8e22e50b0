//! Media store port.

use crate::task::domain::PhotoUrl;

/// Maps stored file references to public URLs.
///
/// Uploading is handled elsewhere; the marketplace only records the URL.
pub trait MediaStore: Send + Sync {
    /// Returns the public URL for a stored file reference.
    fn stored_url(&self, file_ref: &str) -> PhotoUrl;
}
