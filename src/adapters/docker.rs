use crate::domain::model::RegistryCredentials;
use crate::domain::ports::ContainerEngine;
use crate::utils::error::{AppError, Result};
use async_trait::async_trait;
use std::process::{Output, Stdio};
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWriteExt, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

pub const DEFAULT_DOCKER_BINARY: &str = "docker";

/// `ContainerEngine` backed by the docker command line client.
#[derive(Debug, Clone)]
pub struct DockerCli {
    binary: String,
}

impl Default for DockerCli {
    fn default() -> Self {
        Self::new(DEFAULT_DOCKER_BINARY)
    }
}

impl DockerCli {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.binary);
        command.args(args).kill_on_drop(true);
        command
    }

    fn spawn_error(&self, err: std::io::Error) -> AppError {
        if err.kind() == std::io::ErrorKind::NotFound {
            AppError::DockerNotFoundError {
                binary: self.binary.clone(),
            }
        } else {
            AppError::IoError(err)
        }
    }
}

fn check_status(operation: &str, output: Output) -> Result<()> {
    if output.status.success() {
        return Ok(());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(AppError::DockerError {
        operation: operation.to_string(),
        stderr: if stderr.is_empty() {
            format!("exited with {}", output.status)
        } else {
            stderr
        },
    })
}

/// Forwards each line of `reader` to `sink`, returning the last line seen.
///
/// Bytes that are not UTF-8 are replaced rather than ending the read, so the
/// child never sees a closed pipe.
async fn pipe_lines<R>(reader: Option<R>, sink: mpsc::Sender<String>) -> Option<String>
where
    R: AsyncRead + Unpin,
{
    let mut reader = BufReader::new(reader?);
    let mut buf = Vec::new();
    let mut last = None;

    loop {
        buf.clear();
        match reader.read_until(b'\n', &mut buf).await {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Stopped reading docker output: {}", e);
                break;
            }
        }

        let line = String::from_utf8_lossy(&buf)
            .trim_end_matches(['\r', '\n'])
            .to_string();
        if line.trim().is_empty() {
            continue;
        }
        // 接收端已關閉時仍需讀完管線，避免子行程阻塞
        let _ = sink.send(line.clone()).await;
        last = Some(line);
    }
    last
}

#[async_trait]
impl ContainerEngine for DockerCli {
    async fn login(&self, credentials: &RegistryCredentials) -> Result<()> {
        tracing::debug!(
            "Running {} login --username {} --password-stdin {}",
            self.binary,
            credentials.username,
            credentials.registry
        );

        let mut child = self
            .command(&[
                "login",
                "--username",
                &credentials.username,
                "--password-stdin",
                &credentials.registry,
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(credentials.password.as_bytes()).await?;
            stdin.shutdown().await?;
        }

        let output = child.wait_with_output().await?;
        check_status("login", output)
    }

    async fn tag(&self, source: &str, target: &str) -> Result<()> {
        let output = self
            .command(&["tag", source, target])
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| self.spawn_error(e))?;

        check_status("tag", output)
    }

    async fn push(&self, reference: &str, sink: mpsc::Sender<String>) -> Result<()> {
        let mut child = self
            .command(&["push", reference])
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        let stdout = child.stdout.take();
        let stderr = child.stderr.take();

        let (status, _, last_error) = tokio::join!(
            child.wait(),
            pipe_lines(stdout, sink.clone()),
            pipe_lines(stderr, sink)
        );
        let status = status?;

        if status.success() {
            Ok(())
        } else {
            Err(AppError::DockerError {
                operation: "push".to_string(),
                stderr: last_error.unwrap_or_else(|| format!("exited with {}", status)),
            })
        }
    }
}
