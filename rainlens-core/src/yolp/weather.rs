use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use super::YolpClient;
use crate::model::{Geometry, WeatherSample, WeatherSeries};

/// Timestamp format of the weather endpoint, e.g. `202007011230`.
const DATE_FORMAT: &str = "%Y%m%d%H%M";

/// YOLP rainfall nowcast: observations plus roughly one hour of
/// forecast at a fixed interval, earliest first.
/// See <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/weather.html>.
#[async_trait]
pub trait RainForecast: Send + Sync {
    async fn fetch(&self, geo: &Geometry) -> Result<WeatherSeries>;
}

const PATH: &str = "/weather/V1/place";

#[async_trait]
impl RainForecast for YolpClient {
    async fn fetch(&self, geo: &Geometry) -> Result<WeatherSeries> {
        let response: WeatherForecastResponse = self
            .get_json(
                PATH,
                &[
                    ("appid", self.app_id()),
                    ("coordinates", geo.coords()),
                    ("output", "json"),
                ],
            )
            .await?;

        let feature = response
            .feature
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("Weather forecast response contained no feature"))?;

        let samples = feature
            .property
            .weather_list
            .weather
            .into_iter()
            .map(WeatherDto::into_sample)
            .collect::<Result<Vec<_>>>()?;
        debug!(coords = geo.coords(), samples = samples.len(), "weather forecast");

        WeatherSeries::new(samples)
    }
}

#[derive(Debug, Deserialize)]
struct WeatherForecastResponse {
    #[serde(rename = "Feature", default)]
    feature: Vec<WeatherFeature>,
}

#[derive(Debug, Deserialize)]
struct WeatherFeature {
    #[serde(rename = "Property")]
    property: WeatherProperty,
}

#[derive(Debug, Deserialize)]
struct WeatherProperty {
    #[serde(rename = "WeatherList")]
    weather_list: WeatherList,
}

#[derive(Debug, Deserialize)]
struct WeatherList {
    #[serde(rename = "Weather", default)]
    weather: Vec<WeatherDto>,
}

#[derive(Debug, Deserialize)]
struct WeatherDto {
    #[serde(rename = "Date")]
    date: String,
    #[serde(rename = "Rainfall")]
    rainfall: f64,
}

impl WeatherDto {
    fn into_sample(self) -> Result<WeatherSample> {
        let at = NaiveDateTime::parse_from_str(&self.date, DATE_FORMAT)
            .with_context(|| format!("Failed to parse weather timestamp {:?}", self.date))?;
        Ok(WeatherSample { at, rainfall: self.rainfall })
    }
}
