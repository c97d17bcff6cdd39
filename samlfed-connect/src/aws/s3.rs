use async_trait::async_trait;
use aws_sdk_s3::{
    error::{DisplayErrorContext, SdkError},
    operation::get_object::GetObjectError,
    Client,
};
use tracing::debug;

use samlfed_slo::{errors, Result};

use crate::MetadataStore;

/// MetadataStore over S3 GetObject.
#[derive(Debug, Clone)]
pub struct S3MetadataStore {
    client: Client,
}

impl S3MetadataStore {
    pub fn new(config: &super::SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }
}

#[async_trait]
impl MetadataStore for S3MetadataStore {
    async fn fetch(&self, bucket: &str, key: &str) -> Result<String> {
        let output =
            match self.client.get_object().bucket(bucket).key(key).send().await
            {
                Ok(output) => output,
                Err(err) if is_missing(&err) => {
                    return Err(errors::not_found(&format!(
                        "s3://{bucket}/{key}"
                    )));
                }
                Err(err) => {
                    return Err(errors::service(
                        "s3",
                        &DisplayErrorContext(err),
                    ));
                }
            };

        let bytes = output
            .body
            .collect()
            .await
            .map_err(|err| errors::service("s3", &err))?
            .into_bytes();
        debug!(bucket, key, size = bytes.len(), "metadata object fetched");
        decode(bucket, key, bytes.to_vec())
    }
}

fn decode(bucket: &str, key: &str, bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|err| {
        errors::bad_request(&format!("s3://{bucket}/{key} is not text: {err}"))
    })
}

// GetObject reports a missing key as NoSuchKey; a missing bucket only
// shows up as a bare 404.
fn is_missing(err: &SdkError<GetObjectError>) -> bool {
    if let Some(service_err) = err.as_service_error() {
        if service_err.is_no_such_key() {
            return true;
        }
    }
    err.raw_response()
        .map(|raw| raw.status().as_u16() == 404)
        .unwrap_or(false)
}
