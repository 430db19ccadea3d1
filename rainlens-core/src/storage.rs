//! Object storage for the generated images.

use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_s3::primitives::ByteStream;
use tracing::debug;
use uuid::Uuid;

use crate::model::{Geometry, WeatherSample};

/// Storage seam: put a blob under a key and derive its public URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()>;

    /// Public URL for a stored key. A fresh sortable token is appended
    /// as a query string so chat link previews never reuse a cached
    /// image for a different request.
    fn public_url(&self, key: &str) -> String;
}

/// S3-backed image store.
#[derive(Debug, Clone)]
pub struct S3ImageStore {
    client: aws_sdk_s3::Client,
    bucket: String,
    public_base: String,
}

impl S3ImageStore {
    pub async fn connect(bucket: String, region: String) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.clone()))
            .load()
            .await;
        let public_base = format!("https://{bucket}.s3-{region}.amazonaws.com");
        Self { client: aws_sdk_s3::Client::new(&config), bucket, public_base }
    }
}

#[async_trait]
impl ObjectStore for S3ImageStore {
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<()> {
        debug!(key, bytes = body.len(), "uploading image");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("Failed to upload {key} to bucket {}", self.bucket))?;
        Ok(())
    }

    fn public_url(&self, key: &str) -> String {
        format!("{}/{}?{}", self.public_base, key, Uuid::now_v7().simple())
    }
}

/// Deterministic object keys for one request: sample timestamp plus
/// coordinates, so a location+time pair never collides with another.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetNames {
    pub map: String,
    pub chart: String,
}

impl AssetNames {
    pub fn derive(geo: &Geometry, current: &WeatherSample) -> Self {
        let prefix =
            format!("{}-{}", current.at.format("%Y%m%d%H%M"), geo.coords().replace(',', "-"));
        Self { map: format!("{prefix}-map.jpg"), chart: format!("{prefix}-chart.png") }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> WeatherSample {
        WeatherSample {
            at: chrono::NaiveDate::from_ymd_opt(2020, 7, 1)
                .unwrap()
                .and_hms_opt(12, 30, 0)
                .unwrap(),
            rainfall: 0.0,
        }
    }

    #[test]
    fn asset_names_are_deterministic() {
        let geo = Geometry::parse("139.75,35.68").unwrap();
        let names = AssetNames::derive(&geo, &sample());
        assert_eq!(names.map, "202007011230-139.75-35.68-map.jpg");
        assert_eq!(names.chart, "202007011230-139.75-35.68-chart.png");
        assert_eq!(names, AssetNames::derive(&geo, &sample()));
    }

    #[test]
    fn different_locations_get_different_keys() {
        let a = AssetNames::derive(&Geometry::parse("139.75,35.68").unwrap(), &sample());
        let b = AssetNames::derive(&Geometry::parse("135.50,34.70").unwrap(), &sample());
        assert_ne!(a.map, b.map);
    }
}
