use crate::domain::model::RegistryCredentials;
use crate::utils::error::{AppError, Result};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;

/// Decodes an ECR authorization token (`base64("AWS:<password>")`).
///
/// Only the first `:` separates user from password; the password itself may
/// contain colons.
pub fn decode_authorization_token(token: &str, registry: &str) -> Result<RegistryCredentials> {
    let raw = STANDARD
        .decode(token.trim())
        .map_err(|e| AppError::AuthenticationError {
            message: format!("authorization token is not valid base64: {}", e),
        })?;

    let decoded = String::from_utf8(raw).map_err(|_| AppError::AuthenticationError {
        message: "authorization token is not valid UTF-8".to_string(),
    })?;

    let (username, password) =
        decoded
            .split_once(':')
            .ok_or_else(|| AppError::AuthenticationError {
                message: "authorization token has no 'user:password' separator".to_string(),
            })?;

    if username.is_empty() {
        return Err(AppError::AuthenticationError {
            message: "authorization token has an empty user name".to_string(),
        });
    }

    Ok(RegistryCredentials {
        username: username.to_string(),
        password: password.to_string(),
        registry: registry.to_string(),
    })
}
