use crate::domain::ports::RegistryClient;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_ecr::config::Region;
use aws_sdk_ecr::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_ecr::Client as EcrClient;

const AUTH_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "InvalidSignatureException",
    "ExpiredTokenException",
    "AccessDeniedException",
];

#[derive(Debug, Clone)]
pub struct EcrRegistry {
    client: EcrClient,
}

impl EcrRegistry {
    pub fn new(client: EcrClient) -> Self {
        Self { client }
    }

    /// Builds a client from the default credential chain (environment,
    /// `~/.aws/credentials`, profiles) pinned to `region`.
    pub async fn connect(region: &str) -> Self {
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;

        if config.credentials_provider().is_none() {
            tracing::warn!("No AWS credentials provider configured, requests will fail");
        }

        Self::new(EcrClient::new(&config))
    }
}

#[async_trait]
impl RegistryClient for EcrRegistry {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        let mut pages = self.client.describe_repositories().into_paginator().send();
        let mut names = Vec::new();

        while let Some(page) = pages.next().await {
            let page = page.map_err(|e| map_sdk_error("DescribeRepositories", e))?;
            names.extend(
                page.repositories()
                    .iter()
                    .filter_map(|repo| repo.repository_name())
                    .map(str::to_string),
            );
        }

        tracing::debug!("DescribeRepositories returned {} names", names.len());
        Ok(names)
    }

    async fn authorization_token(&self) -> Result<String> {
        let output = self
            .client
            .get_authorization_token()
            .send()
            .await
            .map_err(|e| map_sdk_error("GetAuthorizationToken", e))?;

        let data = output
            .authorization_data()
            .first()
            .ok_or_else(|| AppError::AuthenticationError {
                message: "ECR returned no authorization data".to_string(),
            })?;

        if let Some(expires_at) = data.expires_at() {
            tracing::debug!("ECR authorization token expires at {}", expires_at);
        }

        data.authorization_token()
            .map(str::to_string)
            .ok_or_else(|| AppError::AuthenticationError {
                message: "ECR authorization data has no token".to_string(),
            })
    }
}

fn map_sdk_error<E, R>(operation: &str, err: SdkError<E, R>) -> AppError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug,
{
    let code = err.code().map(str::to_string);
    let detail = DisplayErrorContext(&err).to_string();
    classify_error(operation, code.as_deref(), &detail)
}

fn classify_error(operation: &str, code: Option<&str>, detail: &str) -> AppError {
    let is_auth = code.is_some_and(|c| AUTH_ERROR_CODES.contains(&c))
        || detail.to_ascii_lowercase().contains("credentials");

    let message = match code {
        Some(code) => format!("{} failed ({}): {}", operation, code, detail),
        None => format!("{} failed: {}", operation, detail),
    };

    if is_auth {
        AppError::AuthenticationError { message }
    } else {
        AppError::RegistryError { message }
    }
}
