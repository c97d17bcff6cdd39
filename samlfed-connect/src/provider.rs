use std::fmt;

use validator::ValidationErrors;

use samlfed_slo::{
    errors::Code,
    regexp::{check_account_id, check_partition, check_provider_name},
    Result,
};

/// ProviderIdentity names one SAML provider both ways the identity service
/// knows it: by the name given at creation and by its ARN.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub name: String,
    pub arn: String,
}

impl ProviderIdentity {
    /// derive builds the ARN IAM assigns to a provider called `name` in the
    /// given account.
    pub fn derive(partition: &str, account_id: &str, name: &str) -> Result<Self> {
        let mut errs = ValidationErrors::new();
        if let Err(err) = check_partition(partition) {
            errs.add("partition", err);
        }
        if let Err(err) = check_account_id(account_id) {
            errs.add("account_id", err);
        }
        if let Err(err) = check_provider_name(name) {
            errs.add("name", err);
        }
        if !errs.errors().is_empty() {
            return Err(Code::Validates(errs).into());
        }
        Ok(Self {
            name: name.to_owned(),
            arn: format!("arn:{partition}:iam::{account_id}:saml-provider/{name}"),
        })
    }

    /// with_arn trusts an ARN handed in by the caller, checking only that it
    /// ends with the provider name.
    pub fn with_arn(name: &str, arn: &str) -> Result<Self> {
        check_provider_name(name).map_err(|err| {
            samlfed_slo::errors::bad_request(&format!("{name}: {err}"))
        })?;
        let suffix = format!(":saml-provider/{name}");
        if !arn.starts_with("arn:") || !arn.ends_with(&suffix) {
            return Err(samlfed_slo::errors::bad_request(&format!(
                "{arn} is not the ARN of SAML provider {name}"
            )));
        }
        Ok(Self {
            name: name.to_owned(),
            arn: arn.to_owned(),
        })
    }
}

impl fmt::Display for ProviderIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.arn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_arn() {
        let identity =
            ProviderIdentity::derive("aws", "123456789012", "idp").unwrap();
        assert_eq!(identity.name, "idp");
        assert_eq!(
            identity.arn,
            "arn:aws:iam::123456789012:saml-provider/idp"
        );
    }

    #[test]
    fn derive_other_partition() {
        let identity =
            ProviderIdentity::derive("aws-cn", "123456789012", "corp").unwrap();
        assert_eq!(
            identity.to_string(),
            "arn:aws-cn:iam::123456789012:saml-provider/corp"
        );
    }

    #[test]
    fn derive_rejects_bad_input() {
        assert!(ProviderIdentity::derive("aws", "1234", "idp").is_err());
        assert!(
            ProviderIdentity::derive("aws", "123456789012", "bad name").is_err()
        );
        assert!(ProviderIdentity::derive("gcp", "123456789012", "idp").is_err());
    }

    #[test]
    fn explicit_arn_must_match_name() {
        let arn = "arn:aws:iam::123456789012:saml-provider/idp";
        assert!(ProviderIdentity::with_arn("idp", arn).is_ok());
        assert!(ProviderIdentity::with_arn("other", arn).is_err());
        assert!(ProviderIdentity::with_arn("idp", "saml-provider/idp").is_err());
    }
}
