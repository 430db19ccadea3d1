//! Core library for the rainlens slash-command service.
//!
//! This crate defines:
//! - Configuration and startup validation
//! - Clients for the upstream YOLP endpoints, Slack delivery, and
//!   object storage, each behind a trait seam
//! - The command pipeline: resolve a location, gather place and
//!   rainfall data, render and upload the images, compose the reply
//!
//! It is used by `rainlens-server`, but carries no HTTP-server code of
//! its own.

pub mod chart;
pub mod config;
pub mod handler;
pub mod model;
pub mod reply;
pub mod resolve;
pub mod slack;
pub mod storage;
pub mod yolp;

pub use config::{Config, ConfigError, Stage};
pub use handler::{CommandHandler, Dependencies};
pub use model::{Geometry, Place, WeatherSample, WeatherSeries};
pub use slack::{Message, ReplySink, SlashCommand, SlackWebhook};
pub use storage::{ObjectStore, S3ImageStore};
pub use yolp::YolpClient;
