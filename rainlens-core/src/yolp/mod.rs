//! Clients for the YOLP (Yahoo! Open Local Platform) web APIs.
//!
//! Each endpoint gets its own module with the serde models mirroring
//! the documented response shape and a trait the pipeline consumes, so
//! tests can substitute mocks.
//!
//! See <https://developer.yahoo.co.jp/webapi/map/>.

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::model::Geometry;

pub mod geocode;
pub mod map;
pub mod place;
pub mod weather;
pub mod zip;

pub use geocode::LandmarkSearch;
pub use map::StaticMapFetch;
pub use place::PlaceDescriber;
pub use weather::RainForecast;
pub use zip::ZipCodeSearch;

const BASE_URL: &str = "https://map.yahooapis.jp";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(5);

/// Shared HTTP client for all YOLP endpoints; one credential covers
/// the whole platform.
#[derive(Debug, Clone)]
pub struct YolpClient {
    app_id: String,
    base_url: String,
    http: reqwest::Client,
}

impl YolpClient {
    pub fn new(app_id: String) -> Result<Self> {
        Self::with_base_url(app_id, BASE_URL.to_string())
    }

    /// Point the client at a different host, for tests.
    pub fn with_base_url(app_id: String, base_url: String) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to build YOLP HTTP client")?;
        Ok(Self { app_id, base_url, http })
    }

    pub(crate) fn app_id(&self) -> &str {
        &self.app_id
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// GET a JSON endpoint and decode the response body.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T> {
        let res = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to YOLP {path}"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("Failed to read YOLP {path} response body"))?;

        if !status.is_success() {
            return Err(anyhow!(
                "YOLP {path} request failed with status {status}: {}",
                truncate_body(&body),
            ));
        }

        serde_json::from_str(&body).with_context(|| format!("Failed to parse YOLP {path} JSON"))
    }

    /// GET a binary endpoint and return the raw bytes.
    pub(crate) async fn get_bytes(&self, path: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let res = self
            .http
            .get(self.url(path))
            .query(query)
            .send()
            .await
            .with_context(|| format!("Failed to send request to YOLP {path}"))?;

        let status = res.status();
        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(anyhow!(
                "YOLP {path} request failed with status {status}: {}",
                truncate_body(&body),
            ));
        }

        let bytes = res
            .bytes()
            .await
            .with_context(|| format!("Failed to read YOLP {path} response body"))?;
        Ok(bytes.to_vec())
    }
}

/// Geometry element shared by the feature-returning endpoints.
#[derive(Debug, Deserialize)]
pub(crate) struct GeometryDto {
    #[serde(rename = "Coordinates")]
    pub coordinates: String,
}

impl GeometryDto {
    pub fn into_geometry(self) -> Result<Geometry> {
        Geometry::parse(&self.coordinates)
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.len() <= MAX {
        return body.to_string();
    }
    // Error bodies can be Japanese; back off to a char boundary.
    let mut cut = MAX;
    while !body.is_char_boundary(cut) {
        cut -= 1;
    }
    format!("{}...", &body[..cut])
}
