use crate::domain::model::RegistryCredentials;
use crate::utils::error::Result;
use async_trait::async_trait;
use tokio::sync::mpsc;

/// Container registry operations the push workflow needs.
#[async_trait]
pub trait RegistryClient: Send + Sync {
    /// Every repository name, across all result pages.
    async fn list_repositories(&self) -> Result<Vec<String>>;

    /// Base64 `user:password` token for `docker login`.
    async fn authorization_token(&self) -> Result<String>;
}

/// Local container engine operations.
#[async_trait]
pub trait ContainerEngine: Send + Sync {
    async fn login(&self, credentials: &RegistryCredentials) -> Result<()>;

    async fn tag(&self, source: &str, target: &str) -> Result<()>;

    /// Output lines are forwarded to `sink` as they are produced.
    async fn push(&self, reference: &str, sink: mpsc::Sender<String>) -> Result<()>;
}
