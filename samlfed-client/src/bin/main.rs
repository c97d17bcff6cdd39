use std::iter;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use samlfed_connect::aws::{self, IamIdentityService, S3MetadataStore};
use samlfed_handler::{load, HandlerConfig, Reconciler, RequestType, Status};
use samlfed_template::{render, Parameters, TemplateOptions};

#[derive(Debug, Parser)]
#[command(name = "samlctl")]
#[command(author, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the stack template
    Template {
        /// Bucket holding the packaged handler
        #[arg(long)]
        code_bucket: String,
        /// Key of the packaged handler
        #[arg(long)]
        code_key: String,
        #[arg(long, default_value_t = 30)]
        timeout_secs: u32,
        #[arg(long, default_value_t = 128)]
        memory_mb: u32,
        /// Print on one line
        #[arg(long)]
        compact: bool,
    },
    /// Check stack parameter values before deploying
    Check {
        #[arg(long, default_value = "idp")]
        provider_name: String,
        #[arg(long)]
        metadata_bucket: String,
        #[arg(long, default_value = "SAML.xml")]
        metadata_object: String,
    },
    /// Reconcile the provider once against live services, without a
    /// callback. Handler settings come from the environment, from a config
    /// file, or from flags after `--`.
    Reconcile {
        #[arg(long)]
        request_type: String,
        #[arg(long, short = 'c')]
        config: Option<String>,
        #[arg(last = true)]
        handler_args: Vec<String>,
    },
    #[command(short_flag = 'v')]
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "warn".to_owned()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Cli::parse();
    match args.command {
        Commands::Template {
            code_bucket,
            code_key,
            timeout_secs,
            memory_mb,
            compact,
        } => {
            let options = TemplateOptions {
                timeout_secs,
                memory_mb,
                ..TemplateOptions::new(&code_bucket, &code_key)
            };
            let template = render(&options);
            let out = if compact {
                serde_json::to_string(&template)?
            } else {
                serde_json::to_string_pretty(&template)?
            };
            println!("{out}");
        }
        Commands::Check {
            provider_name,
            metadata_bucket,
            metadata_object,
        } => {
            let params = Parameters {
                provider_name,
                metadata_bucket,
                metadata_object,
            };
            params.check()?;
            println!("parameters are valid");
        }
        Commands::Reconcile {
            request_type,
            config,
            handler_args,
        } => {
            let config = match config {
                Some(path) => load(&path)?,
                None => HandlerConfig::try_parse_from(
                    iter::once("reconcile".to_owned()).chain(handler_args),
                )?,
            };
            reconcile(RequestType::from(request_type), config).await?;
        }
        Commands::Version => {
            println!("samlctl {}", env!("CARGO_PKG_VERSION"));
        }
    }
    Ok(())
}

async fn reconcile(request: RequestType, config: HandlerConfig) -> Result<()> {
    let provider = config
        .provider_config()
        .context("invalid provider configuration")?;
    let sdk_config = aws::load_config(config.region.clone()).await;
    let reconciler = Reconciler::new(
        IamIdentityService::new(&sdk_config),
        S3MetadataStore::new(&sdk_config),
        provider,
    );

    let outcome = reconciler.reconcile(&request).await;
    let status = config.report_policy().status(&outcome);
    println!("{status:?}: {outcome}");
    if status == Status::Failed {
        bail!("reconciliation of {} failed", reconciler.config().provider);
    }
    Ok(())
}
