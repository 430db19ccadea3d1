use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{GeometryDto, YolpClient};
use crate::model::Geometry;

/// YOLP contents geocoder: free-text landmark/address search.
/// See <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/contentsgeocoder.html>.
#[async_trait]
pub trait LandmarkSearch: Send + Sync {
    /// Search a place name; `None` when nothing matched.
    async fn search(&self, query: &str) -> Result<Option<Geometry>>;
}

const PATH: &str = "/geocode/cont/V1/contentsGeoCoder";

#[async_trait]
impl LandmarkSearch for YolpClient {
    async fn search(&self, query: &str) -> Result<Option<Geometry>> {
        let response: GeoCodeResponse = self
            .get_json(
                PATH,
                &[
                    ("appid", self.app_id()),
                    ("query", query),
                    ("category", "landmark,address,world"),
                    ("results", "1"),
                    ("output", "json"),
                ],
            )
            .await?;
        debug!(query, features = response.feature.len(), "landmark search");

        response
            .feature
            .into_iter()
            .next()
            .map(|feature| feature.geometry.into_geometry())
            .transpose()
    }
}

#[derive(Debug, Deserialize)]
struct GeoCodeResponse {
    #[serde(rename = "Feature", default)]
    feature: Vec<GeoCodeFeature>,
}

#[derive(Debug, Deserialize)]
struct GeoCodeFeature {
    #[serde(rename = "Geometry")]
    geometry: GeometryDto,
}
