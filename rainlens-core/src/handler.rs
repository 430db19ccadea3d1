//! The command pipeline: validate, resolve, gather, render, reply.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info};

use crate::chart;
use crate::config::{CONTENT_TYPE_CHART, CONTENT_TYPE_MAP, Config, Stage};
use crate::resolve;
use crate::slack::{Attachment, Message, ReplySink, SlashCommand};
use crate::storage::{AssetNames, ObjectStore};
use crate::yolp::{LandmarkSearch, PlaceDescriber, RainForecast, StaticMapFetch, ZipCodeSearch};

/// External collaborators of the pipeline, passed in explicitly so
/// tests can substitute any of them.
pub struct Dependencies {
    pub zip: Arc<dyn ZipCodeSearch>,
    pub landmarks: Arc<dyn LandmarkSearch>,
    pub place: Arc<dyn PlaceDescriber>,
    pub weather: Arc<dyn RainForecast>,
    pub map: Arc<dyn StaticMapFetch>,
    pub store: Arc<dyn ObjectStore>,
    pub reply: Arc<dyn ReplySink>,
}

pub struct CommandHandler {
    config: Config,
    deps: Dependencies,
}

impl CommandHandler {
    pub fn new(config: Config, deps: Dependencies) -> Self {
        Self { config, deps }
    }

    /// Process one slash command.
    ///
    /// Delivers exactly one reply per invocation, success or error,
    /// except for a token rejection which only logs. Failures are
    /// terminal; there are no retries.
    pub async fn handle(&self, command: SlashCommand) {
        if !self.config.token_allowed(&command.token) {
            error!(team = %command.team_domain, channel = %command.channel_name, "forbidden: token not allow-listed");
            return;
        }

        if command.text.is_empty() {
            info!("empty command text");
            self.deliver(&command, usage_hint("場所が指定されていません。", &command.command))
                .await;
            return;
        }

        if let Err(err) = self.run(&command).await {
            error!(error = %format!("{err:#}"), "command pipeline failed");
            let mut message = Message::plain("エラーが発生しました。");
            if self.config.stage == Stage::Dev {
                message
                    .attachments
                    .push(Attachment { text: Some(format!("{err:#}")), ..Attachment::default() });
            }
            self.deliver(&command, message).await;
        }
    }

    /// Everything that can fail after validation. A successful run has
    /// already delivered its reply.
    async fn run(&self, command: &SlashCommand) -> Result<()> {
        let geo = resolve::resolve_geometry(
            self.deps.zip.as_ref(),
            self.deps.landmarks.as_ref(),
            &command.text,
        )
        .await?;
        let Some(geo) = geo else {
            info!(text = %command.text, "location not found");
            self.deps
                .reply
                .respond(
                    &command.response_url,
                    &usage_hint("場所の検索に失敗しました。", &command.command),
                )
                .await?;
            return Ok(());
        };

        let (place, series) = tokio::try_join!(
            self.deps.place.describe(&geo),
            self.deps.weather.fetch(&geo),
        )?;

        let names = AssetNames::derive(&geo, series.current());
        let (map_url, chart_url) = tokio::try_join!(
            async {
                let bytes = self.deps.map.fetch(&geo).await?;
                self.deps.store.put(&names.map, bytes, CONTENT_TYPE_MAP).await?;
                Ok::<_, anyhow::Error>(self.deps.store.public_url(&names.map))
            },
            async {
                let bytes = chart::render(&series)?;
                self.deps.store.put(&names.chart, bytes, CONTENT_TYPE_CHART).await?;
                Ok::<_, anyhow::Error>(self.deps.store.public_url(&names.chart))
            },
        )?;

        let message =
            crate::reply::compose(&self.config, &place, &series, &chart_url, &map_url, &geo);
        self.deps.reply.respond(&command.response_url, &message).await?;
        info!(area = %place.area, "reply delivered");
        Ok(())
    }

    /// Best-effort delivery for validation hints and error replies; a
    /// delivery failure here only leaves a log entry.
    async fn deliver(&self, command: &SlashCommand, message: Message) {
        if let Err(err) = self.deps.reply.respond(&command.response_url, &message).await {
            error!(error = %format!("{err:#}"), "failed to deliver reply");
        }
    }
}

fn usage_hint(lead: &str, command_name: &str) -> Message {
    Message::plain(format!("{lead}`{command_name} [郵便番号 または 地名]` を入力してください。"))
}
