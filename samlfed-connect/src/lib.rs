pub mod aws;
mod identity;
mod metadata;
mod provider;

pub use identity::{provider_exists, IdentityService, MockIdentityService};
pub use metadata::{MetadataStore, MockMetadataStore};
pub use provider::ProviderIdentity;
