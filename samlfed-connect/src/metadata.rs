use async_trait::async_trait;
use mockall::automock;

use samlfed_slo::Result;

/// MetadataStore reads the identity provider's metadata document from
/// object storage.
#[automock]
#[async_trait]
pub trait MetadataStore {
    /// fetch returns the whole object as text.
    ///
    /// A missing bucket or object must be reported with
    /// [`samlfed_slo::errors::not_found`] so callers can tell it apart from
    /// a failing store.
    async fn fetch(&self, bucket: &str, key: &str) -> Result<String>;
}
