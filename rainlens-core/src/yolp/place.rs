use anyhow::{Result, anyhow};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::YolpClient;
use crate::model::{Geometry, Place};

/// City-equivalent entries in the `Area` list carry this type code.
const AREA_TYPE_CITY: u8 = 2;

/// YOLP place information: what is around a coordinate.
/// See <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/placeinfo.html>.
#[async_trait]
pub trait PlaceDescriber: Send + Sync {
    async fn describe(&self, geo: &Geometry) -> Result<Place>;
}

const PATH: &str = "/placeinfo/V1/get";

#[async_trait]
impl PlaceDescriber for YolpClient {
    async fn describe(&self, geo: &Geometry) -> Result<Place> {
        let lon = geo.lon().to_string();
        let lat = geo.lat().to_string();
        let response: PlaceInfoResponse = self
            .get_json(
                PATH,
                &[
                    ("appid", self.app_id()),
                    ("lon", &lon),
                    ("lat", &lat),
                    ("output", "json"),
                ],
            )
            .await?;
        debug!(coords = geo.coords(), "place info");

        summarize(response.result_set)
    }
}

/// Pick the area name and join the landmark names.
///
/// Area: the first city-level entry wins; without one, the second
/// address component is used (the first is the prefecture).
fn summarize(result_set: ResultSet) -> Result<Place> {
    let area = match result_set.area.iter().find(|area| area.kind == AREA_TYPE_CITY) {
        Some(area) => area.name.clone(),
        None => result_set
            .address
            .get(1)
            .cloned()
            .ok_or_else(|| anyhow!("Place info response carried neither a city area nor an address fallback"))?,
    };

    let buildings = result_set
        .result
        .iter()
        .map(|poi| poi.name.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(Place { area, buildings })
}

#[derive(Debug, Deserialize)]
struct PlaceInfoResponse {
    #[serde(rename = "ResultSet")]
    result_set: ResultSet,
}

#[derive(Debug, Deserialize)]
struct ResultSet {
    #[serde(rename = "Address", default)]
    address: Vec<String>,

    #[serde(rename = "Result", default)]
    result: Vec<PointOfInterest>,

    #[serde(rename = "Area", default)]
    area: Vec<AreaInfo>,
}

#[derive(Debug, Deserialize)]
struct PointOfInterest {
    #[serde(rename = "Name")]
    name: String,
}

#[derive(Debug, Deserialize)]
struct AreaInfo {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Type")]
    kind: u8,
}
