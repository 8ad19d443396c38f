#![cfg(unix)]

use anyhow::Result;
use ecr_pusher::domain::ports::ContainerEngine;
use ecr_pusher::{AppError, DockerCli, RegistryCredentials};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::TempDir;
use tokio::sync::mpsc;

/// Shell script standing in for the docker client. Records its arguments and
/// the password read from stdin under `dir`.
fn write_stub(dir: &Path) -> Result<String> {
    let script = format!(
        r#"#!/bin/sh
echo "$@" >> "{dir}/calls"
case "$1" in
  login)
    cat > "{dir}/password"
    echo "Login Succeeded"
    ;;
  tag)
    if [ "$2" = "missing:latest" ]; then
      echo "Error response from daemon: No such image: $2" >&2
      exit 1
    fi
    ;;
  push)
    case "$2" in
      *binary*)
        printf 'layer: \377 pushing\n'
        i=0
        while [ $i -lt 5000 ]; do
          echo "layer $i: Pushed"
          i=$((i+1))
        done
        exit 0
        ;;
      *denied*)
        echo "The push refers to repository [$2]"
        echo "denied: requested access to the resource is denied" >&2
        exit 1
        ;;
    esac
    echo "The push refers to repository [$2]"
    echo "5f70bf18a086: Pushed" >&2
    echo ""
    echo "latest: digest: sha256:abc size: 528"
    ;;
esac
exit 0
"#,
        dir = dir.display()
    );

    let path = dir.join("docker");
    std::fs::write(&path, script)?;
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))?;
    Ok(path.to_string_lossy().into_owned())
}

async fn collect(mut rx: mpsc::Receiver<String>) -> Vec<String> {
    let mut lines = Vec::new();
    while let Some(line) = rx.recv().await {
        lines.push(line);
    }
    lines
}

#[tokio::test]
async fn test_docker_cli_against_stub() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let docker = DockerCli::new(write_stub(temp_dir.path())?);

    // login: 密碼只經由 stdin 傳入
    let credentials = RegistryCredentials {
        username: "AWS".to_string(),
        password: "super:secret".to_string(),
        registry: "123456789012.dkr.ecr.us-east-1.amazonaws.com".to_string(),
    };
    docker.login(&credentials).await?;
    let password = std::fs::read_to_string(temp_dir.path().join("password"))?;
    assert_eq!(password, "super:secret");

    // tag
    docker.tag("my-app:latest", "registry/my-app:v1").await?;
    let err = docker
        .tag("missing:latest", "registry/my-app:v1")
        .await
        .unwrap_err();
    match err {
        AppError::DockerError { operation, stderr } => {
            assert_eq!(operation, "tag");
            assert!(stderr.contains("No such image"));
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // push, stdout and stderr both forwarded, blank lines skipped
    let (tx, rx) = mpsc::channel(16);
    let collector = tokio::spawn(collect(rx));
    docker.push("registry/my-app:v1", tx).await?;
    let lines = collector.await?;
    assert_eq!(lines.len(), 3);
    assert!(lines.contains(&"5f70bf18a086: Pushed".to_string()));
    assert!(lines.contains(&"latest: digest: sha256:abc size: 528".to_string()));

    // non UTF-8 output is forwarded lossily and the push still succeeds
    let (tx, rx) = mpsc::channel(16);
    let collector = tokio::spawn(collect(rx));
    docker.push("registry/binary:v1", tx).await?;
    let lines = collector.await?;
    assert_eq!(lines.len(), 5001);
    assert_eq!(lines[0], "layer: \u{FFFD} pushing");
    assert_eq!(lines[5000], "layer 4999: Pushed");

    // push failure keeps the last stderr line
    let (tx, rx) = mpsc::channel(16);
    let collector = tokio::spawn(collect(rx));
    let err = docker.push("registry/denied:v1", tx).await.unwrap_err();
    let lines = collector.await?;
    assert_eq!(lines.len(), 2);
    assert!(err.to_string().contains("requested access to the resource is denied"));

    let calls = std::fs::read_to_string(temp_dir.path().join("calls"))?;
    let calls: Vec<&str> = calls.lines().collect();
    assert_eq!(
        calls[0],
        "login --username AWS --password-stdin 123456789012.dkr.ecr.us-east-1.amazonaws.com"
    );
    assert!(!calls.iter().any(|c| c.contains("super:secret")));
    assert_eq!(calls[1], "tag my-app:latest registry/my-app:v1");
    assert_eq!(calls[3], "push registry/my-app:v1");
    assert_eq!(calls[4], "push registry/binary:v1");
    Ok(())
}

#[tokio::test]
async fn test_missing_docker_binary() {
    let docker = DockerCli::new("/nonexistent/path/to/docker");

    let err = docker.tag("a", "b").await.unwrap_err();

    assert!(matches!(err, AppError::DockerNotFoundError { .. }));
    assert_eq!(err.exit_code(), 3);
}
