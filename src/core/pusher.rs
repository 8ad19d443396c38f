use crate::core::credentials::decode_authorization_token;
use crate::core::{
    ContainerEngine, PushReport, PushRequest, RegistryClient, RegistryCredentials, RegistryTarget,
    Result,
};
use crate::utils::validation::Validate;
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::mpsc;

/// Drives the connect / login / tag / push workflow against one registry.
pub struct Pusher<R: RegistryClient + ?Sized, E: ContainerEngine + ?Sized> {
    target: RegistryTarget,
    registry: Arc<R>,
    engine: Arc<E>,
}

impl<R: RegistryClient + ?Sized, E: ContainerEngine + ?Sized> Pusher<R, E> {
    pub fn new(target: RegistryTarget, registry: Arc<R>, engine: Arc<E>) -> Self {
        Self {
            target,
            registry,
            engine,
        }
    }

    pub fn target(&self) -> &RegistryTarget {
        &self.target
    }

    pub async fn connect(&self) -> Result<Vec<String>> {
        tracing::info!(
            "🔌 Fetching ECR repositories for account {} in {}",
            self.target.account_id,
            self.target.region
        );

        match self.registry.list_repositories().await {
            Ok(repositories) => {
                if repositories.is_empty() {
                    tracing::warn!("No ECR repositories found in region {}", self.target.region);
                } else {
                    tracing::info!("✅ Found {} repositories", repositories.len());
                }
                Ok(repositories)
            }
            Err(e) => {
                tracing::error!("❌ Error fetching ECR repositories: {}", e);
                Err(e)
            }
        }
    }

    pub async fn login(&self) -> Result<RegistryCredentials> {
        let registry = self.target.registry_host();
        tracing::info!("🔐 Authenticating Docker with {}", registry);

        let token = self.registry.authorization_token().await?;
        let credentials = decode_authorization_token(&token, &registry)?;

        if let Err(e) = self.engine.login(&credentials).await {
            tracing::error!("❌ Docker login failed: {}", e);
            return Err(e);
        }

        tracing::info!("✅ Docker login successful");
        Ok(credentials)
    }

    /// Tags the local image with its registry name and pushes it.
    /// Push output goes to `sink` line by line.
    pub async fn tag_and_push(
        &self,
        request: &PushRequest,
        sink: mpsc::Sender<String>,
    ) -> Result<PushReport> {
        let started = Instant::now();
        let remote_image = request.target_reference(&self.target);

        tracing::info!("🏷️ Tagging '{}' as '{}'", request.local_image, remote_image);
        if let Err(e) = self.engine.tag(&request.local_image, &remote_image).await {
            tracing::error!("❌ {}", e.user_friendly_message());
            return Err(e);
        }
        tracing::info!("✅ Image tagged successfully");

        tracing::info!("📤 Pushing image to {}", remote_image);
        let (tx, rx) = mpsc::channel(64);
        let (push_result, log_lines) =
            tokio::join!(self.engine.push(&remote_image, tx), forward_lines(rx, sink));

        if let Err(e) = push_result {
            tracing::error!("❌ Failed to push image: {}", e);
            return Err(e);
        }

        let report = PushReport {
            local_image: request.local_image.clone(),
            remote_image,
            log_lines,
            duration_ms: started.elapsed().as_millis() as u64,
            pushed_at: Utc::now(),
        };
        tracing::info!(
            "✅ Image pushed successfully to {} ({} ms)",
            report.remote_image,
            report.duration_ms
        );
        Ok(report)
    }

    /// Full workflow. Logs in on every push since ECR tokens expire.
    pub async fn push(
        &self,
        request: &PushRequest,
        sink: mpsc::Sender<String>,
    ) -> Result<PushReport> {
        self.target.validate()?;
        request.validate()?;

        self.login().await?;
        self.tag_and_push(request, sink).await
    }
}

async fn forward_lines(mut rx: mpsc::Receiver<String>, sink: mpsc::Sender<String>) -> usize {
    let mut count = 0;
    let mut sink_open = true;
    while let Some(line) = rx.recv().await {
        count += 1;
        tracing::debug!("push: {}", line);
        // 接收端關閉時只記錄，不中斷推送
        if sink_open && sink.send(line).await.is_err() {
            tracing::debug!("push output receiver closed, continuing without it");
            sink_open = false;
        }
    }
    count
}
