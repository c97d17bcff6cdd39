use serde_json::{json, Value};

use crate::{
    intrinsic::{partition_arn, sub},
    policy::{PolicyDocument, Principal, Statement},
};

/// Audience every federated sign-in assertion must carry.
pub const SAML_AUDIENCE: &str = "https://signin.aws.amazon.com/saml";

/// IAM limit on role names.
pub const MAX_ROLE_NAME_LEN: usize = 64;

pub const PROVIDER_ARN: &str =
    "arn:${AWS::Partition}:iam::${AWS::AccountId}:saml-provider/${ProviderName}";

/// The four roles federated users can assume.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AccessRole {
    Administrator,
    PowerUser,
    Auditor,
    OrchestrationAdmin,
}

impl AccessRole {
    pub const ALL: [AccessRole; 4] = [
        AccessRole::Administrator,
        AccessRole::PowerUser,
        AccessRole::Auditor,
        AccessRole::OrchestrationAdmin,
    ];

    pub fn logical_id(self) -> &'static str {
        match self {
            Self::Administrator => "AdministratorRole",
            Self::PowerUser => "PowerUserRole",
            Self::Auditor => "AuditorRole",
            Self::OrchestrationAdmin => "CloudFormationAdminRole",
        }
    }

    fn name_suffix(self) -> &'static str {
        match self {
            Self::Administrator => "Administrator",
            Self::PowerUser => "PowerUser",
            Self::Auditor => "Auditor",
            Self::OrchestrationAdmin => "CloudFormationAdmin",
        }
    }

    /// Role names are prefixed with the provider name so several
    /// federations can live in one account.
    pub fn role_name(self) -> Value {
        sub(&format!("${{ProviderName}}-{}", self.name_suffix()))
    }

    pub fn managed_policy(self) -> &'static str {
        match self {
            Self::Administrator | Self::OrchestrationAdmin => {
                "AdministratorAccess"
            }
            Self::PowerUser => "PowerUserAccess",
            Self::Auditor => "SecurityAudit",
        }
    }

    pub fn managed_policy_arn(self) -> Value {
        partition_arn(&format!("iam::aws:policy/{}", self.managed_policy()))
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Administrator => "Full access for federated administrators",
            Self::PowerUser => {
                "Full access except identity management for federated power users"
            }
            Self::Auditor => "Read-only security audit access",
            Self::OrchestrationAdmin => {
                "Administrator access for operating the orchestration service"
            }
        }
    }

    /// trust_policy lets holders of a SAML assertion from `provider` assume
    /// the role, provided the assertion targets the console sign-in
    /// endpoint.
    pub fn trust_policy(self, provider: Value) -> PolicyDocument {
        PolicyDocument::new(vec![Statement::allow(["sts:AssumeRoleWithSAML"])
            .principal(Principal::Federated(provider))
            .condition("StringEquals", "SAML:aud", json!(SAML_AUDIENCE))])
    }

    /// resource renders the role declaration. `depends_on` is the logical
    /// id of the resource that brings the provider into existence.
    pub fn resource(self, depends_on: &str) -> Value {
        json!({
            "Type": "AWS::IAM::Role",
            "DependsOn": depends_on,
            "Properties": {
                "RoleName": self.role_name(),
                "Description": self.description(),
                "AssumeRolePolicyDocument":
                    self.trust_policy(sub(PROVIDER_ARN)).to_value(),
                "ManagedPolicyArns": [self.managed_policy_arn()],
            }
        })
    }
}

/// execution_role renders the role the provider handler runs as. It may
/// manage exactly the one SAML provider and read exactly the one metadata
/// object. Listing the bucket makes S3 answer a missing object with
/// NoSuchKey instead of AccessDenied.
pub fn execution_role() -> Value {
    let trust = PolicyDocument::new(vec![Statement::allow(["sts:AssumeRole"])
        .principal(Principal::Service("lambda.amazonaws.com".to_owned()))]);

    let permissions = PolicyDocument::new(vec![
        Statement::allow(["iam:ListSAMLProviders"]).resource(json!("*")),
        Statement::allow(["iam:CreateSAMLProvider", "iam:DeleteSAMLProvider"])
            .resource(sub(PROVIDER_ARN)),
        Statement::allow(["s3:GetObject"]).resource(partition_arn(
            "s3:::${MetadataBucket}/${MetadataObject}",
        )),
        Statement::allow(["s3:ListBucket"])
            .resource(partition_arn("s3:::${MetadataBucket}")),
    ]);

    json!({
        "Type": "AWS::IAM::Role",
        "Properties": {
            "AssumeRolePolicyDocument": trust.to_value(),
            "ManagedPolicyArns": [partition_arn(
                "iam::aws:policy/service-role/AWSLambdaBasicExecutionRole",
            )],
            "Policies": [{
                "PolicyName": "saml-provider-management",
                "PolicyDocument": permissions.to_value(),
            }],
        }
    })
}
