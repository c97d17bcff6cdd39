use std::{env, sync::Arc};

use anyhow::Result;
use clap::Parser;
use lambda_runtime::{service_fn, LambdaEvent};
use tracing::{debug, info, info_span, Instrument};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use samlfed_handler::{
    build_app, load, version, App, CustomResourceResponse, HandlerConfig,
    Invocation, LifecycleEvent,
};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    let args = env::args().collect::<Vec<_>>();
    let config =
        if args.len() == 3 && (args[1] == "-c" || args[1] == "--config") {
            load(&args[2])?
        } else {
            HandlerConfig::try_parse()?
        };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.rust_log))
        .with(tracing_subscriber::fmt::layer().without_time())
        .init();

    debug!("{:#?}", &config);
    info!("{}", version());
    run(config).await
}

async fn run(config: HandlerConfig) -> Result<(), lambda_runtime::Error> {
    let app = Arc::new(build_app(&config).await?);

    info!("waiting for lifecycle events...");
    lambda_runtime::run(service_fn(move |event| {
        let app = Arc::clone(&app);
        async move { serve(&app, event).await }
    }))
    .await
}

async fn serve(
    app: &App,
    event: LambdaEvent<LifecycleEvent>,
) -> Result<CustomResourceResponse, lambda_runtime::Error> {
    let (payload, context) = event.into_parts();
    let invocation = Invocation {
        request_id: context.request_id.clone(),
        log_stream: context.env_config.log_stream.clone(),
        deadline_ms: i64::try_from(context.deadline).ok(),
    };
    let span = info_span!("invocation", request_id = %invocation.request_id);
    let response = app.handle(payload, &invocation).instrument(span).await?;
    Ok(response)
}
