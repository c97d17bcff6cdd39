use serde_json::{json, Map, Value};

use crate::{
    intrinsic::{get_att, reference, sub},
    parameter::{self, METADATA_BUCKET, METADATA_OBJECT, PROVIDER_NAME},
    role::{execution_role, AccessRole, PROVIDER_ARN},
};

pub const EXECUTION_ROLE_ID: &str = "HandlerExecutionRole";
pub const HANDLER_ID: &str = "ProviderHandler";
pub const PROVIDER_ID: &str = "SamlProvider";

/// Environment variables the handler reads its configuration from.
pub mod env {
    pub const PROVIDER_NAME: &str = "PROVIDER_NAME";
    pub const ACCOUNT_ID: &str = "ACCOUNT_ID";
    pub const PARTITION: &str = "PARTITION";
    pub const METADATA_BUCKET: &str = "METADATA_BUCKET";
    pub const METADATA_OBJECT: &str = "METADATA_OBJECT";
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateOptions {
    /// Bucket and key of the packaged handler.
    pub code_bucket: String,
    pub code_key: String,
    pub timeout_secs: u32,
    pub memory_mb: u32,
}

impl TemplateOptions {
    pub fn new(code_bucket: &str, code_key: &str) -> Self {
        Self {
            code_bucket: code_bucket.to_owned(),
            code_key: code_key.to_owned(),
            timeout_secs: 30,
            memory_mb: 128,
        }
    }
}

fn handler(options: &TemplateOptions) -> Value {
    json!({
        "Type": "AWS::Lambda::Function",
        "Properties": {
            "Description": "Creates and deletes the SAML identity provider",
            "Runtime": "provided.al2023",
            "Handler": "bootstrap",
            "Architectures": ["arm64"],
            "Code": {
                "S3Bucket": options.code_bucket,
                "S3Key": options.code_key,
            },
            "Role": get_att(EXECUTION_ROLE_ID, "Arn"),
            "Timeout": options.timeout_secs,
            "MemorySize": options.memory_mb,
            "Environment": {
                "Variables": {
                    env::PROVIDER_NAME: reference(PROVIDER_NAME),
                    env::ACCOUNT_ID: reference("AWS::AccountId"),
                    env::PARTITION: reference("AWS::Partition"),
                    env::METADATA_BUCKET: reference(METADATA_BUCKET),
                    env::METADATA_OBJECT: reference(METADATA_OBJECT),
                }
            }
        }
    })
}

// Carrying the parameters as properties makes a parameter change reach the
// handler as an Update event.
fn provider() -> Value {
    json!({
        "Type": "Custom::SamlProvider",
        "Properties": {
            "ServiceToken": get_att(HANDLER_ID, "Arn"),
            PROVIDER_NAME: reference(PROVIDER_NAME),
            METADATA_BUCKET: reference(METADATA_BUCKET),
            METADATA_OBJECT: reference(METADATA_OBJECT),
        }
    })
}

/// render builds the whole template document.
pub fn render(options: &TemplateOptions) -> Value {
    let mut resources = Map::new();
    resources.insert(EXECUTION_ROLE_ID.to_owned(), execution_role());
    resources.insert(HANDLER_ID.to_owned(), handler(options));
    resources.insert(PROVIDER_ID.to_owned(), provider());

    let mut outputs = Map::new();
    outputs.insert(
        "ProviderArn".to_owned(),
        json!({ "Value": sub(PROVIDER_ARN) }),
    );
    for role in AccessRole::ALL {
        resources.insert(role.logical_id().to_owned(), role.resource(PROVIDER_ID));
        outputs.insert(
            format!("{}Arn", role.logical_id()),
            json!({ "Value": get_att(role.logical_id(), "Arn") }),
        );
    }

    json!({
        "AWSTemplateFormatVersion": "2010-09-09",
        "Description": "IAM roles and SAML identity provider for federated access",
        "Parameters": parameter::declarations(),
        "Resources": resources,
        "Outputs": outputs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered() -> Value {
        render(&TemplateOptions::new("artifacts", "samlfed/bootstrap.zip"))
    }

    #[test]
    fn declares_all_resources() {
        let template = rendered();
        let resources = template["Resources"].as_object().unwrap();
        assert_eq!(resources.len(), 7);
        assert_eq!(resources[PROVIDER_ID]["Type"], "Custom::SamlProvider");
        assert_eq!(resources[HANDLER_ID]["Type"], "AWS::Lambda::Function");
        for role in AccessRole::ALL {
            assert_eq!(resources[role.logical_id()]["Type"], "AWS::IAM::Role");
        }
    }

    #[test]
    fn provider_is_bound_to_handler() {
        let template = rendered();
        assert_eq!(
            template["Resources"][PROVIDER_ID]["Properties"]["ServiceToken"],
            json!({"Fn::GetAtt": [HANDLER_ID, "Arn"]})
        );
        assert_eq!(
            template["Resources"][HANDLER_ID]["Properties"]["Role"],
            json!({"Fn::GetAtt": [EXECUTION_ROLE_ID, "Arn"]})
        );
    }

    #[test]
    fn handler_environment() {
        let template = rendered();
        let props = &template["Resources"][HANDLER_ID]["Properties"];
        let vars = props["Environment"]["Variables"].as_object().unwrap();
        let mut keys: Vec<_> = vars.keys().cloned().collect();
        keys.sort();
        assert_eq!(
            keys,
            vec![
                "ACCOUNT_ID",
                "METADATA_BUCKET",
                "METADATA_OBJECT",
                "PARTITION",
                "PROVIDER_NAME"
            ]
        );
        assert_eq!(props["Code"]["S3Key"], "samlfed/bootstrap.zip");
        assert_eq!(props["Timeout"], 30);
        assert_eq!(props["MemorySize"], 128);
    }

    #[test]
    fn outputs() {
        let template = rendered();
        let outputs = template["Outputs"].as_object().unwrap();
        assert_eq!(outputs.len(), 5);
        assert_eq!(
            outputs["AuditorRoleArn"]["Value"],
            json!({"Fn::GetAtt": ["AuditorRole", "Arn"]})
        );
    }

    #[test]
    fn parameters_are_declared() {
        let template = rendered();
        let params = template["Parameters"].as_object().unwrap();
        assert!(params.contains_key(PROVIDER_NAME));
        assert!(params.contains_key(METADATA_BUCKET));
        assert!(params.contains_key(METADATA_OBJECT));
    }
}
