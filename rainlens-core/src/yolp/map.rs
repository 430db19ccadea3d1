use anyhow::Result;
use async_trait::async_trait;

use super::YolpClient;
use crate::config;
use crate::model::Geometry;

/// YOLP static map: a rendered rain-radar image around a coordinate.
/// See <https://developer.yahoo.co.jp/webapi/map/openlocalplatform/v1/static.html>.
#[async_trait]
pub trait StaticMapFetch: Send + Sync {
    /// Fetch the rainfall-overlay map centered on `geo`, as jpg bytes.
    async fn fetch(&self, geo: &Geometry) -> Result<Vec<u8>>;
}

const PATH: &str = "/map/V1/static";

#[async_trait]
impl StaticMapFetch for YolpClient {
    async fn fetch(&self, geo: &Geometry) -> Result<Vec<u8>> {
        let lon = geo.lon().to_string();
        let lat = geo.lat().to_string();
        self.get_bytes(
            PATH,
            &[
                ("appid", self.app_id()),
                ("lon", &lon),
                ("lat", &lat),
                ("z", &config::MAP_ZOOM.to_string()),
                ("width", &config::MAP_WIDTH.to_string()),
                ("height", &config::MAP_HEIGHT.to_string()),
                ("style", config::MAP_STYLE),
                ("overlay", config::MAP_OVERLAY),
                ("output", "jpg"),
            ],
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn fetch_returns_raw_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .and(query_param("z", "13"))
            .and(query_param("overlay", "type:rainfall"))
            .and(query_param("style", "base:railway"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8jpeg-ish".to_vec()))
            .mount(&server)
            .await;

        let client = YolpClient::with_base_url("test-app-id".into(), server.uri()).unwrap();
        let geo = Geometry::parse("139.75,35.68").unwrap();
        let bytes = client.fetch(&geo).await.unwrap();
        assert_eq!(bytes, b"\xff\xd8jpeg-ish".to_vec());
    }

    #[tokio::test]
    async fn error_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(PATH))
            .respond_with(ResponseTemplate::new(403).set_body_string("forbidden"))
            .mount(&server)
            .await;

        let client = YolpClient::with_base_url("test-app-id".into(), server.uri()).unwrap();
        let geo = Geometry::parse("139.75,35.68").unwrap();
        let err = client.fetch(&geo).await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }
}
