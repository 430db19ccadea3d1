use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use rainlens_core::config::{PROJECT_NAME, PROJECT_VERSION};
use rainlens_core::{
    CommandHandler, Config, Dependencies, S3ImageStore, SlackWebhook, SlashCommand, YolpClient,
};
use serde_json::{Value, json};
use tracing::debug;

#[derive(Clone)]
pub struct AppState {
    handler: Arc<CommandHandler>,
}

impl AppState {
    /// Wire the real collaborators from the validated configuration.
    pub async fn build(config: Config) -> anyhow::Result<Self> {
        let yolp = Arc::new(YolpClient::new(config.yolp_app_id.clone())?);
        let store = Arc::new(
            S3ImageStore::connect(config.images_bucket.clone(), config.images_region.clone())
                .await,
        );
        let reply = Arc::new(SlackWebhook::new()?);

        let deps = Dependencies {
            zip: yolp.clone(),
            landmarks: yolp.clone(),
            place: yolp.clone(),
            weather: yolp.clone(),
            map: yolp,
            store,
            reply,
        };
        Ok(Self { handler: Arc::new(CommandHandler::new(config, deps)) })
    }

    pub fn with_handler(handler: CommandHandler) -> Self {
        Self { handler: Arc::new(handler) }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/commands/weather", post(weather_command))
        .route("/systems/version", get(version))
        .with_state(state)
}

/// Slash-command entry point. The reply is delivered asynchronously to
/// the command's response URL, so the HTTP response body stays empty.
async fn weather_command(
    State(state): State<AppState>,
    Form(command): Form<SlashCommand>,
) -> StatusCode {
    debug!(command = %command.command, team = %command.team_domain, "received slash command");
    tokio::spawn(async move { state.handler.handle(command).await });
    StatusCode::OK
}

/// Service name and version, for monitoring.
async fn version() -> Json<Value> {
    Json(json!({ "name": PROJECT_NAME, "version": PROJECT_VERSION }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::Request;
    use rainlens_core::{Geometry, Message, Place, Stage, WeatherSample, WeatherSeries};
    use tower::ServiceExt;

    struct NoHit;

    #[async_trait]
    impl rainlens_core::yolp::ZipCodeSearch for NoHit {
        async fn search(&self, _zip: &str) -> anyhow::Result<Option<Geometry>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl rainlens_core::yolp::LandmarkSearch for NoHit {
        async fn search(&self, _query: &str) -> anyhow::Result<Option<Geometry>> {
            Ok(None)
        }
    }

    #[async_trait]
    impl rainlens_core::yolp::PlaceDescriber for NoHit {
        async fn describe(&self, _geo: &Geometry) -> anyhow::Result<Place> {
            anyhow::bail!("unused")
        }
    }

    #[async_trait]
    impl rainlens_core::yolp::RainForecast for NoHit {
        async fn fetch(&self, _geo: &Geometry) -> anyhow::Result<WeatherSeries> {
            let at = chrono_now();
            WeatherSeries::new(vec![WeatherSample { at, rainfall: 0.0 }])
        }
    }

    #[async_trait]
    impl rainlens_core::yolp::StaticMapFetch for NoHit {
        async fn fetch(&self, _geo: &Geometry) -> anyhow::Result<Vec<u8>> {
            Ok(vec![])
        }
    }

    #[async_trait]
    impl rainlens_core::ObjectStore for NoHit {
        async fn put(&self, _key: &str, _body: Vec<u8>, _ct: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn public_url(&self, key: &str) -> String {
            format!("https://images.test/{key}")
        }
    }

    struct DropSink;

    #[async_trait]
    impl rainlens_core::ReplySink for DropSink {
        async fn respond(&self, _url: &str, _message: &Message) -> anyhow::Result<()> {
            Ok(())
        }
    }

    fn chrono_now() -> chrono::NaiveDateTime {
        chrono::NaiveDate::from_ymd_opt(2020, 7, 1).unwrap().and_hms_opt(12, 0, 0).unwrap()
    }

    fn test_state() -> AppState {
        let stub = Arc::new(NoHit);
        let config = Config {
            stage: Stage::Prd,
            slack_tokens: vec![],
            yolp_app_id: "app-id".into(),
            images_bucket: "images".into(),
            images_region: "ap-northeast-1".into(),
            note: "{project}".into(),
        };
        let deps = Dependencies {
            zip: stub.clone(),
            landmarks: stub.clone(),
            place: stub.clone(),
            weather: stub.clone(),
            map: stub,
            store: Arc::new(NoHit),
            reply: Arc::new(DropSink),
        };
        AppState::with_handler(CommandHandler::new(config, deps))
    }

    #[tokio::test]
    async fn version_endpoint_reports_name_and_version() {
        let app = router(test_state());
        let req = Request::builder().uri("/systems/version").body(Body::empty()).unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["name"], "rainlens");
        assert_eq!(json["version"], PROJECT_VERSION);
    }

    #[tokio::test]
    async fn command_endpoint_accepts_form_payload_with_empty_body() {
        let app = router(test_state());
        let form = "token=tok&command=%2Fweather&text=&response_url=https%3A%2F%2Fhooks.test%2F1\
                    &user_id=U1&user_name=taro&team_id=T1&team_domain=acme\
                    &channel_id=C1&channel_name=general";
        let req = Request::builder()
            .method("POST")
            .uri("/commands/weather")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from(form))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);

        let body = axum::body::to_bytes(resp.into_body(), 4096).await.unwrap();
        assert!(body.is_empty());
    }

    #[tokio::test]
    async fn command_endpoint_rejects_malformed_payload() {
        let app = router(test_state());
        let req = Request::builder()
            .method("POST")
            .uri("/commands/weather")
            .header("content-type", "application/x-www-form-urlencoded")
            .body(Body::from("token=only"))
            .unwrap();
        let resp = app.oneshot(req).await.unwrap();
        assert_ne!(resp.status(), StatusCode::OK);
    }
}
