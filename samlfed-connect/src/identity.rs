use async_trait::async_trait;
use mockall::automock;

use samlfed_slo::Result;

/// IdentityService is the slice of the cloud identity API the reconciler
/// needs to manage SAML providers.
#[automock]
#[async_trait]
pub trait IdentityService {
    /// list_providers returns the ARN of every SAML provider in the account.
    ///
    /// The underlying API is not paginated, so the whole set comes back in
    /// one call.
    async fn list_providers(&self) -> Result<Vec<String>>;

    /// create_provider registers a provider named `name` trusting the given
    /// metadata document and returns the ARN assigned to it.
    async fn create_provider(&self, name: &str, document: &str)
        -> Result<String>;

    async fn delete_provider(&self, arn: &str) -> Result<()>;
}

/// provider_exists scans the provider list for `arn`.
pub async fn provider_exists<I>(identity: &I, arn: &str) -> Result<bool>
where
    I: IdentityService + Sync + ?Sized,
{
    let providers = identity.list_providers().await?;
    Ok(providers.iter().any(|existing| existing == arn))
}
