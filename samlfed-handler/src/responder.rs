use std::time::Duration;

use async_trait::async_trait;
use mockall::automock;
use reqwest::{header::CONTENT_TYPE, Client};
use tracing::info;

use samlfed_slo::{errors, Result};

use crate::event::CustomResourceResponse;

/// String to set as the user agent in the callback request.
static USER_AGENT: &str =
    concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// ResponseSink delivers the outcome of a request back to the orchestration
/// service.
#[automock]
#[async_trait]
pub trait ResponseSink {
    async fn send(
        &self,
        url: &str,
        response: &CustomResourceResponse,
    ) -> Result<()>;
}

/// HttpResponder PUTs the response to the presigned URL carried by the
/// event.
#[derive(Debug, Clone)]
pub struct HttpResponder {
    client: Client,
}

impl HttpResponder {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(errors::any)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ResponseSink for HttpResponder {
    async fn send(
        &self,
        url: &str,
        response: &CustomResourceResponse,
    ) -> Result<()> {
        let body = serde_json::to_vec(response).map_err(errors::any)?;
        // the presigned URL is signed without a content type
        let res = self
            .client
            .put(url)
            .header(CONTENT_TYPE, "")
            .body(body)
            .send()
            .await
            .map_err(|err| errors::service("callback", &err))?;

        let status = res.status();
        if !status.is_success() {
            let text = res.text().await.unwrap_or_default();
            return Err(errors::service(
                "callback",
                &format!("{status}: {text}"),
            ));
        }
        info!(
            status = ?response.status,
            request_id = %response.request_id,
            "response delivered"
        );
        Ok(())
    }
}
