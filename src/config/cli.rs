use super::Overrides;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "ecr-pusher")]
#[command(about = "Push a local Docker image to an Amazon ECR repository")]
#[command(version)]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Emit JSON log lines instead of the compact format
    #[arg(long, global = true)]
    pub json_logs: bool,

    /// AWS region, e.g. us-east-1
    #[arg(long, global = true)]
    pub region: Option<String>,

    /// The 12-digit AWS account number
    #[arg(long, global = true)]
    pub account_id: Option<String>,

    /// Docker executable to run
    #[arg(long, global = true)]
    pub docker_binary: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the ECR repositories of the account in the region
    Repos,

    /// Authenticate Docker with the ECR registry
    Login,

    /// Tag a local image and push it to an ECR repository
    Push {
        /// Target ECR repository name
        #[arg(long)]
        repository: Option<String>,

        /// Local Docker image, e.g. my-app:latest
        #[arg(long = "image")]
        local_image: Option<String>,

        /// Tag for the image in ECR [default: latest]
        #[arg(long)]
        tag: Option<String>,
    },

    /// Serve the HTTP front end
    #[cfg(feature = "server")]
    Serve {
        /// Bind address [default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,

        /// Listen port [default: 8501]
        #[arg(long)]
        port: Option<u16>,
    },
}

impl CliConfig {
    pub fn is_serving(&self) -> bool {
        #[cfg(feature = "server")]
        if matches!(self.command, Command::Serve { .. }) {
            return true;
        }
        false
    }

    pub fn overrides(&self) -> Overrides {
        let mut overrides = Overrides {
            region: self.region.clone(),
            account_id: self.account_id.clone(),
            docker_binary: self.docker_binary.clone(),
            ..Default::default()
        };

        match &self.command {
            Command::Push {
                repository,
                local_image,
                tag,
            } => {
                overrides.repository = repository.clone();
                overrides.local_image = local_image.clone();
                overrides.tag = tag.clone();
            }
            #[cfg(feature = "server")]
            Command::Serve { host, port } => {
                overrides.host = host.clone();
                overrides.port = *port;
            }
            Command::Repos | Command::Login => {}
        }

        overrides
    }
}
