use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GeometryDto, YolpClient};
use crate::model::Geometry;

/// YOLP zip code search.
/// See <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/zipcodesearch.html>.
#[async_trait]
pub trait ZipCodeSearch: Send + Sync {
    /// Look up a postal code; `None` when nothing matched.
    async fn search(&self, zip: &str) -> Result<Option<Geometry>>;
}

const PATH: &str = "/search/zip/V1/zipCodeSearch";

#[async_trait]
impl ZipCodeSearch for YolpClient {
    async fn search(&self, zip: &str) -> Result<Option<Geometry>> {
        let response: ZipCodeResponse = self
            .get_json(
                PATH,
                &[
                    ("appid", self.app_id()),
                    ("query", zip),
                    ("detail", "simple"),
                    ("results", "1"),
                    ("output", "json"),
                ],
            )
            .await?;
        debug!(zip, features = response.feature.len(), "zip code search");

        response
            .feature
            .into_iter()
            .next()
            .map(|feature| feature.geometry.into_geometry())
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
struct ZipCodeResponse {
    #[serde(rename = "Feature", default)]
    feature: Vec<ZipCodeFeature>,
}

#[derive(Debug, Deserialize)]
struct ZipCodeFeature {
    #[serde(rename = "Geometry")]
    geometry: GeometryDto,
}
