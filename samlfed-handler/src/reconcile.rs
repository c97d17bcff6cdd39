use std::fmt;

use tracing::{debug, error, info, warn};

use samlfed_connect::{
    provider_exists, IdentityService, MetadataStore, ProviderIdentity,
};
use samlfed_slo::Result;

use crate::event::{RequestType, Status};

/// What one reconciliation did, or why it did nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Created { arn: String },
    AlreadyPresent,
    /// The metadata object was missing, so the provider was not created.
    SkippedMissingSource { bucket: String, key: String },
    Deleted,
    AlreadyAbsent,
    /// The request type is not one the handler acts on.
    Ignored { request_type: String },
    Failed(String),
}

impl Outcome {
    pub fn is_mutation(&self) -> bool {
        matches!(self, Self::Created { .. } | Self::Deleted)
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Created { arn } => write!(f, "Created SAML provider {arn}"),
            Self::AlreadyPresent => f.write_str("SAML provider already present"),
            Self::SkippedMissingSource { bucket, key } => write!(
                f,
                "Metadata s3://{bucket}/{key} not found, SAML provider not created"
            ),
            Self::Deleted => f.write_str("Deleted SAML provider"),
            Self::AlreadyAbsent => f.write_str("SAML provider already absent"),
            Self::Ignored { request_type } => {
                write!(f, "Request type {request_type} ignored")
            }
            Self::Failed(reason) => write!(f, "Failed: {reason}"),
        }
    }
}

/// ReportPolicy decides which outcomes the orchestration service sees as
/// failures. The default reports everything except `Failed` as success.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReportPolicy {
    pub fail_on_missing_metadata: bool,
    pub fail_on_unsupported: bool,
}

impl ReportPolicy {
    pub fn status(&self, outcome: &Outcome) -> Status {
        match outcome {
            Outcome::Failed(_) => Status::Failed,
            Outcome::SkippedMissingSource { .. }
                if self.fail_on_missing_metadata =>
            {
                Status::Failed
            }
            Outcome::Ignored { .. } if self.fail_on_unsupported => {
                Status::Failed
            }
            _ => Status::Success,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub provider: ProviderIdentity,
    pub metadata_bucket: String,
    pub metadata_object: String,
}

/// Reconciler makes the existence of one SAML provider match a lifecycle
/// request. The identity service is the only source of truth; nothing is
/// remembered between calls.
#[derive(Debug)]
pub struct Reconciler<I, M> {
    identity: I,
    metadata: M,
    config: ProviderConfig,
}

impl<I, M> Reconciler<I, M> {
    pub fn new(identity: I, metadata: M, config: ProviderConfig) -> Self {
        Self {
            identity,
            metadata,
            config,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }
}

impl<I, M> Reconciler<I, M>
where
    I: IdentityService + Sync,
    M: MetadataStore + Sync,
{
    /// reconcile performs at most one mutating call. Errors never escape;
    /// they come back as [`Outcome::Failed`].
    pub async fn reconcile(&self, request: &RequestType) -> Outcome {
        match self.try_reconcile(request).await {
            Ok(outcome) => {
                info!(
                    arn = %self.config.provider.arn,
                    request = %request,
                    changed = outcome.is_mutation(),
                    "{}",
                    outcome
                );
                outcome
            }
            Err(err) => {
                error!(
                    arn = %self.config.provider.arn,
                    request = %request,
                    code = err.code(),
                    "{:?}",
                    err
                );
                Outcome::Failed(err.to_string())
            }
        }
    }

    async fn try_reconcile(&self, request: &RequestType) -> Result<Outcome> {
        let arn = &self.config.provider.arn;
        match request {
            RequestType::Create | RequestType::Update => {
                if self.exists().await? {
                    Ok(Outcome::AlreadyPresent)
                } else {
                    self.create().await
                }
            }
            RequestType::Delete => {
                if !self.exists().await? {
                    return Ok(Outcome::AlreadyAbsent);
                }
                self.identity.delete_provider(arn).await?;
                Ok(Outcome::Deleted)
            }
            RequestType::Other(kind) => {
                warn!(request_type = %kind, "unsupported request type");
                Ok(Outcome::Ignored {
                    request_type: kind.clone(),
                })
            }
        }
    }

    async fn exists(&self) -> Result<bool> {
        let arn = &self.config.provider.arn;
        let exists = provider_exists(&self.identity, arn).await?;
        debug!(%arn, exists, "SAML provider state discovered");
        Ok(exists)
    }

    async fn create(&self) -> Result<Outcome> {
        let bucket = &self.config.metadata_bucket;
        let key = &self.config.metadata_object;

        let document = match self.metadata.fetch(bucket, key).await {
            Ok(document) => document,
            Err(err) if err.is_not_found() => {
                warn!(%bucket, %key, "{}", err);
                return Ok(Outcome::SkippedMissingSource {
                    bucket: bucket.clone(),
                    key: key.clone(),
                });
            }
            Err(err) => return Err(err),
        };

        let arn = self
            .identity
            .create_provider(&self.config.provider.name, &document)
            .await?;
        if arn != self.config.provider.arn {
            warn!(
                expected = %self.config.provider.arn,
                actual = %arn,
                "created provider ARN differs from the configured one"
            );
        }
        Ok(Outcome::Created { arn })
    }
}

#[cfg(test)]
pub(crate) fn provider_config() -> ProviderConfig {
    ProviderConfig {
        provider: ProviderIdentity::derive("aws", "123456789012", "idp")
            .unwrap(),
        metadata_bucket: "idp-metadata".to_owned(),
        metadata_object: "SAML.xml".to_owned(),
    }
}
