#![allow(dead_code)]

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use ecr_pusher::domain::ports::{ContainerEngine, RegistryClient};
use ecr_pusher::{AppError, RegistryCredentials, Result};
use std::sync::Mutex;
use tokio::sync::mpsc;

pub const ACCOUNT_ID: &str = "123456789012";
pub const REGION: &str = "us-east-1";

pub fn token_for(user: &str, password: &str) -> String {
    STANDARD.encode(format!("{}:{}", user, password))
}

pub struct FakeRegistry {
    pub repositories: Vec<String>,
    pub token: String,
    pub fail_listing: bool,
}

impl FakeRegistry {
    pub fn with_repositories(names: &[&str]) -> Self {
        Self {
            repositories: names.iter().map(|n| n.to_string()).collect(),
            token: token_for("AWS", "pa:ss"),
            fail_listing: false,
        }
    }
}

#[async_trait]
impl RegistryClient for FakeRegistry {
    async fn list_repositories(&self) -> Result<Vec<String>> {
        if self.fail_listing {
            return Err(AppError::RegistryError {
                message: "AccessDeniedException".to_string(),
            });
        }
        Ok(self.repositories.clone())
    }

    async fn authorization_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[derive(Default)]
pub struct FakeEngine {
    pub calls: Mutex<Vec<String>>,
    pub logins: Mutex<Vec<RegistryCredentials>>,
    pub push_lines: Vec<String>,
    pub fail_login: bool,
    pub fail_tag: bool,
    pub fail_push: bool,
}

impl FakeEngine {
    pub fn with_push_output(lines: &[&str]) -> Self {
        Self {
            push_lines: lines.iter().map(|l| l.to_string()).collect(),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn login(&self, credentials: &RegistryCredentials) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("login {}", credentials.registry));
        self.logins.lock().unwrap().push(credentials.clone());

        if self.fail_login {
            return Err(AppError::DockerError {
                operation: "login".to_string(),
                stderr: "unauthorized".to_string(),
            });
        }
        Ok(())
    }

    async fn tag(&self, source: &str, target: &str) -> Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("tag {} {}", source, target));

        if self.fail_tag {
            return Err(AppError::DockerError {
                operation: "tag".to_string(),
                stderr: format!("No such image: {}", source),
            });
        }
        Ok(())
    }

    async fn push(&self, reference: &str, sink: mpsc::Sender<String>) -> Result<()> {
        self.calls.lock().unwrap().push(format!("push {}", reference));

        for line in &self.push_lines {
            let _ = sink.send(line.clone()).await;
        }

        if self.fail_push {
            return Err(AppError::DockerError {
                operation: "push".to_string(),
                stderr: "denied: requested access to the resource is denied".to_string(),
            });
        }
        Ok(())
    }
}
