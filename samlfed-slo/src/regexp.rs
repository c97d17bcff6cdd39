use regex::Regex;
use validator::ValidationError;

lazy_static::lazy_static! {
    static ref PROVIDER_NAME_REGEX: Regex = Regex::new(
        r"^[A-Za-z0-9_+=,.@-]{1,128}$",
    ).unwrap();

    static ref ACCOUNT_ID_REGEX: Regex = Regex::new(
        r"^\d{12}$",
    ).unwrap();

    static ref BUCKET_REGEX: Regex = Regex::new(
        r"^[a-z0-9][a-z0-9.-]{1,61}[a-z0-9]$",
    ).unwrap();

    static ref PARTITION_REGEX: Regex = Regex::new(
        r"^aws(-[a-z]+)*$",
    ).unwrap();
}

/// Same constraint IAM puts on SAML provider names.
pub fn check_provider_name(name: &str) -> Result<(), ValidationError> {
    if PROVIDER_NAME_REGEX.is_match(name) {
        return Ok(());
    }
    Err(ValidationError::new("invalid provider name"))
}

pub fn check_account_id(account_id: &str) -> Result<(), ValidationError> {
    if ACCOUNT_ID_REGEX.is_match(account_id) {
        return Ok(());
    }
    Err(ValidationError::new("invalid account id"))
}

pub fn check_bucket(bucket: &str) -> Result<(), ValidationError> {
    if BUCKET_REGEX.is_match(bucket) && !bucket.contains("..") {
        return Ok(());
    }
    Err(ValidationError::new("invalid bucket name"))
}

pub fn check_partition(partition: &str) -> Result<(), ValidationError> {
    if PARTITION_REGEX.is_match(partition) {
        return Ok(());
    }
    Err(ValidationError::new("invalid partition"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name() {
        assert!(check_provider_name("idp").is_ok());
        assert!(check_provider_name("corp.okta-prod@eu").is_ok());
        assert!(check_provider_name("").is_err());
        assert!(check_provider_name("has space").is_err());
        assert!(check_provider_name(&"a".repeat(129)).is_err());
        assert!(check_provider_name("idé").is_err());
        assert!(check_provider_name("名前").is_err());
    }

    #[test]
    fn account_id() {
        assert!(check_account_id("123456789012").is_ok());
        assert!(check_account_id("12345").is_err());
        assert!(check_account_id("12345678901a").is_err());
    }

    #[test]
    fn bucket() {
        assert!(check_bucket("saml-metadata").is_ok());
        assert!(check_bucket("my.bucket.name").is_ok());
        assert!(check_bucket("Upper").is_err());
        assert!(check_bucket("a..b").is_err());
        assert!(check_bucket("abc").is_ok());
        assert!(check_bucket("ab").is_err());
    }

    #[test]
    fn partition() {
        assert!(check_partition("aws").is_ok());
        assert!(check_partition("aws-us-gov").is_ok());
        assert!(check_partition("azure").is_err());
    }
}
