pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
#[cfg(feature = "server")]
pub mod server;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliConfig;

pub use adapters::{DockerCli, EcrRegistry};
pub use config::Settings;
pub use crate::core::pusher::Pusher;
pub use domain::model::{PushReport, PushRequest, RegistryCredentials, RegistryTarget};
pub use utils::error::{AppError, Result};
