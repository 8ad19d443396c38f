use crate::utils::error::Result;
use crate::utils::validation::{
    validate_account_id, validate_aws_region, validate_image_reference, validate_image_tag,
    validate_repository_name, Validate,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The ECR registry of one account in one region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryTarget {
    pub region: String,
    pub account_id: String,
}

impl RegistryTarget {
    pub fn new(region: impl AsRef<str>, account_id: impl AsRef<str>) -> Self {
        Self {
            region: region.as_ref().trim().to_string(),
            account_id: account_id.as_ref().trim().to_string(),
        }
    }

    pub fn registry_host(&self) -> String {
        format!("{}.dkr.ecr.{}.amazonaws.com", self.account_id, self.region)
    }

    pub fn repository_uri(&self, repository: &str) -> String {
        format!("{}/{}", self.registry_host(), repository)
    }
}

impl Validate for RegistryTarget {
    fn validate(&self) -> Result<()> {
        validate_aws_region("region", &self.region)?;
        validate_account_id("account_id", &self.account_id)?;
        Ok(())
    }
}

/// Decoded `docker login` material.
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub registry: String,
}

impl fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("registry", &self.registry)
            .finish()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PushRequest {
    pub repository: String,
    pub local_image: String,
    pub tag: String,
}

impl PushRequest {
    pub fn new(
        repository: impl AsRef<str>,
        local_image: impl AsRef<str>,
        tag: impl AsRef<str>,
    ) -> Self {
        Self {
            repository: repository.as_ref().trim().to_string(),
            local_image: local_image.as_ref().trim().to_string(),
            tag: tag.as_ref().trim().to_string(),
        }
    }

    /// `<account>.dkr.ecr.<region>.amazonaws.com/<repository>:<tag>`
    pub fn target_reference(&self, target: &RegistryTarget) -> String {
        format!("{}:{}", target.repository_uri(&self.repository), self.tag)
    }
}

impl Validate for PushRequest {
    fn validate(&self) -> Result<()> {
        validate_repository_name("repository", &self.repository)?;
        validate_image_reference("local_image", &self.local_image)?;
        validate_image_tag("tag", &self.tag)?;
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PushReport {
    pub local_image: String,
    pub remote_image: String,
    pub log_lines: usize,
    pub duration_ms: u64,
    pub pushed_at: DateTime<Utc>,
}
