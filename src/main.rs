use anyhow::Context;
use clap::Parser;
use ecr_pusher::config::cli::Command;
use ecr_pusher::utils::logger::{self, LogFormat};
use ecr_pusher::{AppError, CliConfig, DockerCli, EcrRegistry, Pusher, Settings};
use std::sync::Arc;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    // 初始化日誌
    let format = if config.json_logs {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };
    logger::init_logger(format, config.verbose, config.is_serving());

    tracing::info!("Starting ecr-pusher");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(err) = run(config).await {
        let Some(e) = err.downcast_ref::<AppError>() else {
            return Err(err);
        };

        tracing::error!(
            "❌ {:#} (Category: {:?}, Severity: {:?})",
            err,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());

        eprintln!("❌ {}", e.user_friendly_message());
        eprintln!("💡 {}", e.recovery_suggestion());
        std::process::exit(e.exit_code());
    }

    Ok(())
}

async fn run(config: CliConfig) -> anyhow::Result<()> {
    let settings = Settings::load(config.overrides(), config.config.as_deref())?;

    match config.command {
        Command::Repos => {
            let pusher = build_pusher(&settings).await?;
            let repositories = pusher.connect().await?;
            if repositories.is_empty() {
                println!("⚠️ No ECR repositories found in {}", pusher.target().region);
            }
            for name in repositories {
                println!("{}", name);
            }
        }
        Command::Login => {
            let pusher = build_pusher(&settings).await?;
            let credentials = pusher.login().await?;
            println!("✅ Docker login to {} successful!", credentials.registry);
        }
        Command::Push { .. } => {
            let request = settings.push_request()?;
            let pusher = build_pusher(&settings).await?;

            let (tx, mut rx) = mpsc::channel::<String>(64);
            let printer = tokio::spawn(async move {
                while let Some(line) = rx.recv().await {
                    println!("{}", line);
                }
            });

            let result = pusher.push(&request, tx).await;
            printer.await.context("push output printer stopped unexpectedly")?;

            let report = result?;
            println!(
                "✅ Image pushed successfully to {} in {} ms",
                report.remote_image, report.duration_ms
            );
        }
        #[cfg(feature = "server")]
        Command::Serve { .. } => {
            use ecr_pusher::server::{serve, AppState, AwsPusherFactory};

            let address = settings.listen_address()?;
            let state = AppState::new(AwsPusherFactory::new(settings.docker_binary.clone()));
            serve(state, &address).await?;
        }
    }

    Ok(())
}

async fn build_pusher(settings: &Settings) -> anyhow::Result<Pusher<EcrRegistry, DockerCli>> {
    let target = settings.registry_target()?;
    let registry = EcrRegistry::connect(&target.region).await;
    let engine = DockerCli::new(settings.docker_binary.clone());

    Ok(Pusher::new(target, Arc::new(registry), Arc::new(engine)))
}
