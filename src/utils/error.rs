use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Registry request failed: {message}")]
    RegistryError { message: String },

    #[error("Registry authentication failed: {message}")]
    AuthenticationError { message: String },

    #[error("docker {operation} failed: {stderr}")]
    DockerError { operation: String, stderr: String },

    #[error("Docker executable '{binary}' could not be started")]
    DockerNotFoundError { binary: String },

    #[error("Server error: {message}")]
    ServerError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Registry,
    Authentication,
    Docker,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::RegistryError { .. } => ErrorCategory::Registry,
            AppError::AuthenticationError { .. } => ErrorCategory::Authentication,
            AppError::DockerError { .. } | AppError::DockerNotFoundError { .. } => {
                ErrorCategory::Docker
            }
            AppError::IoError(_) | AppError::SerializationError(_) | AppError::ServerError { .. } => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 網路或服務端暫時性問題，重試可能成功
            AppError::RegistryError { .. } => ErrorSeverity::Medium,
            AppError::DockerError { .. } => ErrorSeverity::Medium,
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. }
            | AppError::AuthenticationError { .. } => ErrorSeverity::High,
            AppError::DockerNotFoundError { .. }
            | AppError::IoError(_)
            | AppError::SerializationError(_)
            | AppError::ServerError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            AppError::ConfigError { .. } | AppError::InvalidConfigValueError { .. } => {
                "Check the command line flags and the configuration file values"
            }
            AppError::MissingConfigError { .. } => {
                "Provide the missing value with a flag, the config file or an environment variable"
            }
            AppError::RegistryError { .. } => {
                "Check your AWS credentials, region and IAM permissions for ECR"
            }
            AppError::AuthenticationError { .. } => {
                "Run 'aws configure' or export AWS_ACCESS_KEY_ID / AWS_SECRET_ACCESS_KEY and retry"
            }
            AppError::DockerError { operation, .. } if operation == "tag" => {
                "Make sure the local image exists ('docker images')"
            }
            AppError::DockerError { .. } => "Check that the Docker daemon is running and reachable",
            AppError::DockerNotFoundError { .. } => {
                "Install Docker or point --docker-binary at the docker executable"
            }
            AppError::IoError(_) | AppError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
            AppError::ServerError { .. } => "Check that the listen address is free and valid",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::InvalidConfigValueError { field, reason, .. } => {
                format!("Invalid '{}': {}", field, reason)
            }
            AppError::MissingConfigError { field } => {
                format!("Please provide a value for '{}'", field)
            }
            AppError::RegistryError { message } => {
                format!("Could not talk to Amazon ECR: {}", message)
            }
            AppError::AuthenticationError { message } => {
                format!("AWS credentials were not found or were rejected: {}", message)
            }
            AppError::DockerError { operation, .. } if operation == "tag" => {
                "Failed to tag Docker image. Make sure the local image exists.".to_string()
            }
            AppError::DockerError { operation, stderr } => {
                format!("Docker {} failed: {}", operation, stderr)
            }
            other => other.to_string(),
        }
    }

    /// CLI 退出碼
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
