use std::env;

use thiserror::Error;

pub const PROJECT_NAME: &str = "rainlens";
pub const PROJECT_VERSION: &str = env!("CARGO_PKG_VERSION");
pub const PROJECT_HOMEPAGE: &str = "https://github.com/rainlens/rainlens";

/// Character cap for the buildings summary in the reply.
pub const INFO_TEXT_LENGTH: usize = 24;

pub const CONTENT_TYPE_MAP: &str = "image/jpg";
pub const CONTENT_TYPE_CHART: &str = "image/png";

/// Zoom level shared by the static map request and the detail link.
pub const MAP_ZOOM: u32 = 13;
pub const MAP_WIDTH: u32 = 600;
pub const MAP_HEIGHT: u32 = 600;
pub const MAP_STYLE: &str = "base:railway";
pub const MAP_OVERLAY: &str = "type:rainfall";

pub const CHART_WIDTH: u32 = 600;
pub const CHART_HEIGHT: u32 = 400;

/// Deployment tier. Only `Dev` attaches diagnostic detail to the
/// user-visible error reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Dev,
    Qas,
    Prd,
}

impl TryFrom<&str> for Stage {
    type Error = ConfigError;

    fn try_from(value: &str) -> Result<Self, ConfigError> {
        match value {
            "dev" => Ok(Stage::Dev),
            "qas" => Ok(Stage::Qas),
            "prd" => Ok(Stage::Prd),
            other => Err(ConfigError::Invalid {
                name: "STAGE",
                detail: format!("unknown stage {other:?}, expected dev, qas or prd"),
            }),
        }
    }
}

/// Error raised by startup configuration validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("environment variable {0} is not set")]
    Missing(&'static str),

    #[error("environment variable {name} is invalid: {detail}")]
    Invalid { name: &'static str, detail: String },
}

/// Application configuration, read from the environment once at
/// startup and passed explicitly to every component.
#[derive(Debug, Clone)]
pub struct Config {
    pub stage: Stage,

    /// Allow-listed Slack verification tokens; an empty list disables
    /// the check.
    pub slack_tokens: Vec<String>,

    /// Credential for all upstream YOLP endpoints.
    pub yolp_app_id: String,

    pub images_bucket: String,
    pub images_region: String,

    /// Footer note template; `{project}` is replaced with a
    /// name+version link at compose time.
    pub note: String,
}

impl Config {
    /// Read and validate the whole configuration before any request is
    /// served, so a missing value fails the process at startup instead
    /// of deep inside a command.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            stage: Stage::try_from(require("STAGE")?.as_str())?,
            slack_tokens: parse_tokens(env::var("SLACK_TOKENS").ok().as_deref())?,
            yolp_app_id: require("YOLP_APP_ID")?,
            images_bucket: require("S3_IMAGES_BUCKET")?,
            images_region: require("S3_IMAGES_REGION")?,
            note: require("NOTE")?,
        })
    }

    /// Whether the given verification token may invoke the command.
    pub fn token_allowed(&self, token: &str) -> bool {
        self.slack_tokens.is_empty() || self.slack_tokens.iter().any(|t| t == token)
    }
}

fn require(name: &'static str) -> Result<String, ConfigError> {
    match env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(ConfigError::Missing(name)),
    }
}

/// `SLACK_TOKENS` is a JSON array of strings; absent means "no check".
fn parse_tokens(raw: Option<&str>) -> Result<Vec<String>, ConfigError> {
    match raw {
        None | Some("") => Ok(Vec::new()),
        Some(json) => serde_json::from_str(json).map_err(|err| ConfigError::Invalid {
            name: "SLACK_TOKENS",
            detail: err.to_string(),
        }),
    }
}
