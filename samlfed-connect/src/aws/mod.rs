//! Adapters backed by the AWS SDK.

mod iam;
mod s3;

pub use iam::IamIdentityService;
pub use s3::S3MetadataStore;

pub use aws_config::SdkConfig;

/// load_config resolves credentials and region from the environment the
/// same way the AWS CLI does. An explicit `region` wins over the
/// environment.
pub async fn load_config(region: Option<String>) -> SdkConfig {
    let mut loader = aws_config::from_env();
    if let Some(region) = region {
        loader = loader.region(aws_config::Region::new(region));
    }
    let config = loader.load().await;
    tracing::info!(
        region = ?config.region().map(|r| r.as_ref().to_owned()),
        "AWS SDK configuration loaded"
    );
    config
}
