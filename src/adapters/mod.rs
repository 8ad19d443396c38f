// Adapters layer: concrete implementations of the domain ports.

pub mod docker;
pub mod ecr;

pub use docker::DockerCli;
pub use ecr::EcrRegistry;
