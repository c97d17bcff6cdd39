use anyhow::{Context, Result};
use tracing::info;

use samlfed_connect::aws::{self, IamIdentityService, S3MetadataStore};

use crate::{
    handler::Handler, reconcile::Reconciler, responder::HttpResponder,
    HandlerConfig,
};

pub type App = Handler<IamIdentityService, S3MetadataStore, HttpResponder>;

/// build_app wires the handler to the live services. Clients are created
/// once per process and reused across invocations.
pub async fn build_app(config: &HandlerConfig) -> Result<App> {
    info!("initializing service clients...");
    let provider = config
        .provider_config()
        .context("invalid provider configuration")?;
    let sdk_config = aws::load_config(config.region.clone()).await;

    let reconciler = Reconciler::new(
        IamIdentityService::new(&sdk_config),
        S3MetadataStore::new(&sdk_config),
        provider,
    );
    let responder = HttpResponder::new(config.callback_timeout())
        .context("could not build the response client")?;
    info!(
        arn = %reconciler.config().provider.arn,
        "handler successfully initialized!"
    );
    Ok(Handler::new(
        reconciler,
        responder,
        config.report_policy(),
        config.response_margin(),
    ))
}
