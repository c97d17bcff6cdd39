use std::{fs, time::Duration};

use anyhow::{Context, Result};
use clap::Parser;
use serde::Deserialize;

use samlfed_connect::ProviderIdentity;
use samlfed_slo::{errors, regexp::check_bucket};

use crate::reconcile::{ProviderConfig, ReportPolicy};

#[derive(Parser, Debug, Clone, Deserialize)]
#[command(name = "bootstrap")]
#[command(author, version, about, long_about = None)]
pub struct HandlerConfig {
    #[clap(long)]
    #[arg(short = 'c')]
    #[serde(default)]
    pub config: Option<String>,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("idp"))]
    #[serde(default = "default_provider_name")]
    pub provider_name: String,
    #[clap(long, env)]
    pub account_id: String,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("aws"))]
    #[serde(default = "default_partition")]
    pub partition: String,
    /// Use this ARN instead of deriving one from the account and name.
    #[clap(long, env)]
    #[serde(default)]
    pub provider_arn: Option<String>,
    #[clap(long, env)]
    pub metadata_bucket: String,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("SAML.xml"))]
    #[serde(default = "default_metadata_object")]
    pub metadata_object: String,
    #[clap(long, env = "AWS_REGION")]
    #[serde(default)]
    pub region: Option<String>,
    #[clap(long, env)]
    #[arg(default_value_t = String::from("samlfed_handler=info,samlfed_connect=info"))]
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    /// Report FAILED instead of SUCCESS when the metadata object is missing.
    #[clap(long, env)]
    #[arg(default_value_t = false)]
    #[serde(default)]
    pub fail_on_missing_metadata: bool,
    /// Report FAILED for request types other than Create, Update and Delete.
    #[clap(long, env)]
    #[arg(default_value_t = false)]
    #[serde(default)]
    pub fail_on_unsupported: bool,
    /// Time kept back from the invocation deadline to deliver the response.
    #[clap(long, env)]
    #[arg(default_value_t = 1000)]
    #[serde(default = "default_response_margin_ms")]
    pub response_margin_ms: u64,
    #[clap(long, env)]
    #[arg(default_value_t = 10)]
    #[serde(default = "default_callback_timeout_secs")]
    pub callback_timeout_secs: u64,
}

fn default_provider_name() -> String {
    String::from("idp")
}

fn default_partition() -> String {
    String::from("aws")
}

fn default_metadata_object() -> String {
    String::from("SAML.xml")
}

fn default_rust_log() -> String {
    String::from("samlfed_handler=info,samlfed_connect=info")
}

fn default_response_margin_ms() -> u64 {
    1000
}

fn default_callback_timeout_secs() -> u64 {
    10
}

impl HandlerConfig {
    pub fn provider_config(&self) -> samlfed_slo::Result<ProviderConfig> {
        let provider = match &self.provider_arn {
            Some(arn) => ProviderIdentity::with_arn(&self.provider_name, arn)?,
            None => ProviderIdentity::derive(
                &self.partition,
                &self.account_id,
                &self.provider_name,
            )?,
        };
        check_bucket(&self.metadata_bucket).map_err(|err| {
            errors::bad_request(&format!("{}: {}", self.metadata_bucket, err))
        })?;
        if self.metadata_object.is_empty() {
            return Err(errors::bad_request("metadata object name is empty"));
        }
        Ok(ProviderConfig {
            provider,
            metadata_bucket: self.metadata_bucket.clone(),
            metadata_object: self.metadata_object.clone(),
        })
    }

    pub fn report_policy(&self) -> ReportPolicy {
        ReportPolicy {
            fail_on_missing_metadata: self.fail_on_missing_metadata,
            fail_on_unsupported: self.fail_on_unsupported,
        }
    }

    pub fn response_margin(&self) -> Duration {
        Duration::from_millis(self.response_margin_ms)
    }

    pub fn callback_timeout(&self) -> Duration {
        Duration::from_secs(self.callback_timeout_secs)
    }
}

pub fn load(cfg: &str) -> Result<HandlerConfig> {
    let content =
        fs::read_to_string(cfg).context("could not read config file")?;
    toml::from_str(&content).context("could not parse config file")
}
