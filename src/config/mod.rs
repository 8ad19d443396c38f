#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

use crate::adapters::docker::DEFAULT_DOCKER_BINARY;
use crate::domain::model::{PushRequest, RegistryTarget};
use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_required_field, Validate};
use std::path::Path;
use toml_config::TomlConfig;

pub const DEFAULT_TAG: &str = "latest";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8501;

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub region: Option<String>,
    pub account_id: Option<String>,
    pub docker_binary: Option<String>,
    pub repository: Option<String>,
    pub local_image: Option<String>,
    pub tag: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Effective configuration: flags, then config file, then environment, then defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub region: Option<String>,
    pub account_id: Option<String>,
    pub docker_binary: String,
    pub repository: Option<String>,
    pub local_image: Option<String>,
    pub tag: String,
    pub host: String,
    pub port: u16,
}

impl Settings {
    pub fn load(overrides: Overrides, config_path: Option<&Path>) -> Result<Self> {
        let file = match config_path {
            Some(path) => {
                tracing::info!("📁 Loading configuration from: {}", path.display());
                let file = TomlConfig::from_file(path)?;
                file.validate()?;
                file
            }
            None => TomlConfig::default(),
        };

        Ok(Self::resolve(overrides, file, |key| std::env::var(key).ok()))
    }

    pub fn resolve<F>(overrides: Overrides, file: TomlConfig, env: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |value: Option<String>| value.filter(|v| !v.trim().is_empty());

        let region = non_blank(overrides.region)
            .or(non_blank(file.aws.region))
            .or_else(|| non_blank(env("AWS_REGION")))
            .or_else(|| non_blank(env("AWS_DEFAULT_REGION")));

        let account_id = non_blank(overrides.account_id)
            .or(non_blank(file.aws.account_id))
            .or_else(|| non_blank(env("ECR_ACCOUNT_ID")));

        Self {
            region,
            account_id,
            docker_binary: overrides
                .docker_binary
                .or(file.docker.binary)
                .unwrap_or_else(|| DEFAULT_DOCKER_BINARY.to_string()),
            repository: non_blank(overrides.repository).or(non_blank(file.push.repository)),
            local_image: non_blank(overrides.local_image).or(non_blank(file.push.local_image)),
            tag: non_blank(overrides.tag)
                .or(non_blank(file.push.tag))
                .unwrap_or_else(|| DEFAULT_TAG.to_string()),
            host: overrides
                .host
                .or(file.server.host)
                .unwrap_or_else(|| DEFAULT_HOST.to_string()),
            port: overrides.port.or(file.server.port).unwrap_or(DEFAULT_PORT),
        }
    }

    pub fn registry_target(&self) -> Result<RegistryTarget> {
        let region = validate_required_field("region", &self.region)?;
        let account_id = validate_required_field("account_id", &self.account_id)?;

        let target = RegistryTarget::new(region, account_id);
        target.validate()?;
        Ok(target)
    }

    pub fn push_request(&self) -> Result<PushRequest> {
        let repository = validate_required_field("repository", &self.repository)?;
        let local_image = validate_required_field("local_image", &self.local_image)?;

        let request = PushRequest::new(repository, local_image, &self.tag);
        request.validate()?;
        Ok(request)
    }

    pub fn listen_address(&self) -> Result<String> {
        validate_non_empty_string("host", &self.host)?;
        Ok(format!("{}:{}", self.host, self.port))
    }
}
