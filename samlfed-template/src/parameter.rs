use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use validator::Validate;

use samlfed_slo::{
    errors::Code,
    regexp::{check_bucket, check_provider_name},
    Result,
};

pub const PROVIDER_NAME: &str = "ProviderName";
pub const METADATA_BUCKET: &str = "MetadataBucket";
pub const METADATA_OBJECT: &str = "MetadataObject";

pub const DEFAULT_PROVIDER_NAME: &str = "idp";
pub const DEFAULT_METADATA_OBJECT: &str = "SAML.xml";

/// Role names are `<ProviderName>-<suffix>` and IAM caps them at 64
/// characters; the longest suffix is `-CloudFormationAdmin`.
pub const MAX_PROVIDER_NAME_LEN: usize = 44;

/// Operator supplied values, keyed by their template parameter names.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, Validate)]
#[serde(rename_all = "PascalCase")]
pub struct Parameters {
    #[serde(default = "default_provider_name")]
    #[validate(custom(function = "check_provider_name"), length(max = 44))]
    pub provider_name: String,
    #[validate(custom(function = "check_bucket"))]
    pub metadata_bucket: String,
    #[serde(default = "default_metadata_object")]
    #[validate(length(min = 1, max = 1024))]
    pub metadata_object: String,
}

fn default_provider_name() -> String {
    String::from(DEFAULT_PROVIDER_NAME)
}

fn default_metadata_object() -> String {
    String::from(DEFAULT_METADATA_OBJECT)
}

impl Parameters {
    pub fn new(metadata_bucket: &str) -> Self {
        Self {
            provider_name: default_provider_name(),
            metadata_bucket: metadata_bucket.to_owned(),
            metadata_object: default_metadata_object(),
        }
    }

    pub fn check(&self) -> Result<()> {
        self.validate().map_err(Code::Validates)?;
        Ok(())
    }
}

/// declarations renders the template `Parameters` section.
pub fn declarations() -> Value {
    json!({
        PROVIDER_NAME: {
            "Type": "String",
            "Default": DEFAULT_PROVIDER_NAME,
            "AllowedPattern": r"[A-Za-z0-9_+=,.@-]+",
            "MinLength": 1,
            "MaxLength": MAX_PROVIDER_NAME_LEN,
            "Description": "Name of the SAML identity provider to create",
        },
        METADATA_BUCKET: {
            "Type": "String",
            "MinLength": 3,
            "MaxLength": 63,
            "Description": "Bucket holding the identity provider metadata document",
        },
        METADATA_OBJECT: {
            "Type": "String",
            "Default": DEFAULT_METADATA_OBJECT,
            "MinLength": 1,
            "Description": "Key of the metadata document inside the bucket",
        },
    })
}
