mod app;
mod config;
mod event;
mod handler;
mod reconcile;
mod responder;
mod version;

pub use app::{build_app, App};
pub use config::{load, HandlerConfig};
pub use event::{
    CustomResourceResponse, LifecycleEvent, RequestType, ResponseData, Status,
};
pub use handler::{Handler, Invocation};
pub use reconcile::{Outcome, ProviderConfig, Reconciler, ReportPolicy};
pub use responder::{HttpResponder, MockResponseSink, ResponseSink};
pub use version::version;
