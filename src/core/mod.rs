pub mod credentials;
pub mod pusher;

pub use crate::domain::model::{PushReport, PushRequest, RegistryCredentials, RegistryTarget};
pub use crate::domain::ports::{ContainerEngine, RegistryClient};
pub use crate::utils::error::Result;
