//! Free-text location resolution.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use tracing::debug;

use crate::model::Geometry;
use crate::yolp::{LandmarkSearch, ZipCodeSearch};

/// Japanese postal code anywhere in the text: three digits, an
/// optional hyphen, four digits.
static ZIP_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?<zip>\d{3}-?\d{4})").expect("valid zip pattern"));

/// The postal-code fragment of `text`, if it contains one.
pub fn zip_code(text: &str) -> Option<&str> {
    ZIP_PATTERN.find(text).map(|m| m.as_str())
}

/// Turn user text into coordinates.
///
/// Text containing a postal code goes to the zip search and nowhere
/// else; a matched code with no result is final. Everything else goes
/// to the landmark search with the full text.
pub async fn resolve_geometry(
    zip: &dyn ZipCodeSearch,
    landmarks: &dyn LandmarkSearch,
    text: &str,
) -> Result<Option<Geometry>> {
    if let Some(code) = zip_code(text) {
        debug!(code, "resolving as postal code");
        return zip.search(code).await;
    }
    debug!(text, "resolving as place name");
    landmarks.search(text).await
}
