use crate::utils::error::{AppError, Result};
use regex::Regex;
use std::sync::LazyLock;

static REPOSITORY_NAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:[a-z0-9]+(?:[._-][a-z0-9]+)*/)*[a-z0-9]+(?:[._-][a-z0-9]+)*$")
        .expect("repository name pattern")
});

static IMAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9._-]{0,127}$").expect("tag pattern"));

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field_name: &str, value: &str, reason: impl Into<String>) -> AppError {
    AppError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AppError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(
            field_name,
            value,
            "Value cannot be empty or whitespace-only",
        ));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            &value.to_string(),
            format!("Value must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_aws_region(field_name: &str, region: &str) -> Result<()> {
    validate_non_empty_string(field_name, region)?;

    if !region
        .chars()
        .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
    {
        return Err(invalid(
            field_name,
            region,
            "AWS region can only contain lowercase letters, numbers, and hyphens",
        ));
    }

    if region.starts_with('-') || region.ends_with('-') {
        return Err(invalid(
            field_name,
            region,
            "AWS region cannot start or end with a hyphen",
        ));
    }

    Ok(())
}

/// AWS account ids are always 12 digits, leading zeros included.
pub fn validate_account_id(field_name: &str, account_id: &str) -> Result<()> {
    if account_id.len() != 12 || !account_id.chars().all(|c| c.is_ascii_digit()) {
        return Err(invalid(
            field_name,
            account_id,
            "AWS account ID must be exactly 12 digits",
        ));
    }
    Ok(())
}

pub fn validate_repository_name(field_name: &str, name: &str) -> Result<()> {
    validate_range(&format!("{}.length", field_name), name.len(), 2, 256)?;

    if !REPOSITORY_NAME.is_match(name) {
        return Err(invalid(
            field_name,
            name,
            "Repository names may only contain lowercase letters, numbers, and . _ - / separators",
        ));
    }
    Ok(())
}

pub fn validate_image_reference(field_name: &str, reference: &str) -> Result<()> {
    validate_non_empty_string(field_name, reference)?;

    if reference.chars().any(char::is_whitespace) {
        return Err(invalid(
            field_name,
            reference,
            "Image reference cannot contain whitespace",
        ));
    }
    Ok(())
}

pub fn validate_image_tag(field_name: &str, tag: &str) -> Result<()> {
    validate_non_empty_string(field_name, tag)?;

    if !IMAGE_TAG.is_match(tag) {
        return Err(invalid(
            field_name,
            tag,
            "Tags must start with a letter, digit or underscore, use only [A-Za-z0-9._-] and be at most 128 characters",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_aws_region() {
        assert!(validate_aws_region("region", "us-east-1").is_ok());
        assert!(validate_aws_region("region", "ap-southeast-2").is_ok());
        assert!(validate_aws_region("region", "").is_err());
        assert!(validate_aws_region("region", "US-EAST-1").is_err());
        assert!(validate_aws_region("region", "-us-east-1").is_err());
    }

    #[test]
    fn test_validate_account_id() {
        assert!(validate_account_id("account_id", "123456789012").is_ok());
        assert!(validate_account_id("account_id", "012345678901").is_ok());
        assert!(validate_account_id("account_id", "12345678901").is_err());
        assert!(validate_account_id("account_id", "12345678901a").is_err());
    }

    #[test]
    fn test_validate_repository_name() {
        assert!(validate_repository_name("repository", "my-app").is_ok());
        assert!(validate_repository_name("repository", "team/backend.api").is_ok());
        assert!(validate_repository_name("repository", "a").is_err());
        assert!(validate_repository_name("repository", "My-App").is_err());
        assert!(validate_repository_name("repository", "team//api").is_err());
        assert!(validate_repository_name("repository", "trailing-").is_err());
    }

    #[test]
    fn test_validate_image_tag() {
        assert!(validate_image_tag("tag", "latest").is_ok());
        assert!(validate_image_tag("tag", "v1.2.3_rc-1").is_ok());
        assert!(validate_image_tag("tag", "-bad").is_err());
        assert!(validate_image_tag("tag", "has space").is_err());
        assert!(validate_image_tag("tag", &"x".repeat(129)).is_err());
    }

    #[test]
    fn test_validate_image_reference() {
        assert!(validate_image_reference("local_image", "my-app:latest").is_ok());
        assert!(validate_image_reference("local_image", "   ").is_err());
        assert!(validate_image_reference("local_image", "my app").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some("eu-west-1".to_string());
        let absent: Option<String> = None;
        assert_eq!(validate_required_field("region", &present).unwrap(), "eu-west-1");
        assert!(matches!(
            validate_required_field("region", &absent),
            Err(AppError::MissingConfigError { .. })
        ));
    }
}
