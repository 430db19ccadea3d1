use anyhow::{Result, anyhow};
use chrono::NaiveDateTime;

/// A resolved geographic point.
///
/// Carries the raw `"<lon>,<lat>"` string exactly as the upstream
/// geocoder returned it, plus the parsed coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    coordinates: String,
    lon: f64,
    lat: f64,
}

impl Geometry {
    /// Parse a `"<lon>,<lat>"` coordinate string.
    pub fn parse(coordinates: &str) -> Result<Self> {
        let (lon, lat) = coordinates
            .split_once(',')
            .ok_or_else(|| anyhow!("Malformed coordinate string: {coordinates:?}"))?;

        Ok(Self {
            coordinates: coordinates.to_string(),
            lon: lon
                .trim()
                .parse()
                .map_err(|_| anyhow!("Malformed longitude in {coordinates:?}"))?,
            lat: lat
                .trim()
                .parse()
                .map_err(|_| anyhow!("Malformed latitude in {coordinates:?}"))?,
        })
    }

    /// The raw coordinate string, longitude first.
    pub fn coords(&self) -> &str {
        &self.coordinates
    }

    pub fn lon(&self) -> f64 {
        self.lon
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }
}

/// Human-readable description of the resolved point.
#[derive(Debug, Clone, PartialEq)]
pub struct Place {
    /// City-level administrative name, or the address fallback.
    pub area: String,
    /// Comma-joined names of nearby landmarks; may be empty.
    pub buildings: String,
}

/// One rainfall observation or forecast sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSample {
    pub at: NaiveDateTime,
    /// Precipitation intensity in mm/h, non-negative.
    pub rainfall: f64,
}

/// Ordered rainfall samples, earliest first, as returned upstream.
///
/// The series is never empty: `current()` is the first sample and
/// `after_one_hour()` the last, which for a one-element series is the
/// same sample.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherSeries {
    samples: Vec<WeatherSample>,
}

impl WeatherSeries {
    pub fn new(samples: Vec<WeatherSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(anyhow!("Weather series contained no samples"));
        }
        Ok(Self { samples })
    }

    pub fn current(&self) -> &WeatherSample {
        &self.samples[0]
    }

    pub fn after_one_hour(&self) -> &WeatherSample {
        &self.samples[self.samples.len() - 1]
    }

    pub fn samples(&self) -> &[WeatherSample] {
        &self.samples
    }
}
