use async_trait::async_trait;
use aws_sdk_iam::{error::DisplayErrorContext, Client};
use tracing::{debug, info};

use samlfed_slo::{errors, Result};

use crate::IdentityService;

/// IdentityService over the IAM SAML provider API.
#[derive(Debug, Clone)]
pub struct IamIdentityService {
    client: Client,
}

impl IamIdentityService {
    pub fn new(config: &super::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl IdentityService for IamIdentityService {
    async fn list_providers(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_saml_providers()
            .send()
            .await
            .map_err(|err| errors::service("iam", &DisplayErrorContext(err)))?;

        let arns = output
            .saml_provider_list()
            .iter()
            .filter_map(|entry| entry.arn().map(str::to_owned))
            .collect::<Vec<_>>();
        debug!(count = arns.len(), "listed SAML providers");
        Ok(arns)
    }

    async fn create_provider(
        &self,
        name: &str,
        document: &str,
    ) -> Result<String> {
        let output = self
            .client
            .create_saml_provider()
            .name(name)
            .saml_metadata_document(document)
            .send()
            .await
            .map_err(|err| errors::service("iam", &DisplayErrorContext(err)))?;

        let arn = output.saml_provider_arn().ok_or_else(|| {
            errors::service("iam", "CreateSAMLProvider returned no ARN")
        })?;
        info!(name, arn, "SAML provider created");
        Ok(arn.to_owned())
    }

    async fn delete_provider(&self, arn: &str) -> Result<()> {
        self.client
            .delete_saml_provider()
            .saml_provider_arn(arn)
            .send()
            .await
            .map_err(|err| errors::service("iam", &DisplayErrorContext(err)))?;
        info!(arn, "SAML provider deleted");
        Ok(())
    }
}
