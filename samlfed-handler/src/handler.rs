use std::time::Duration;

use chrono::Utc;
use tracing::{info, warn};

use samlfed_connect::{IdentityService, MetadataStore};
use samlfed_slo::{errors, Result};

use crate::{
    event::{CustomResourceResponse, LifecycleEvent},
    reconcile::{Outcome, Reconciler, ReportPolicy},
    responder::ResponseSink,
};

/// Invocation carries what the runtime knows about the current call.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub request_id: String,
    pub log_stream: String,
    /// Wall-clock deadline in epoch milliseconds.
    pub deadline_ms: Option<i64>,
}

impl Invocation {
    /// budget is the time left before the deadline once `margin` is kept
    /// back for delivering the response.
    pub fn budget(&self, margin: Duration) -> Option<Duration> {
        let deadline = self.deadline_ms?;
        let margin = i64::try_from(margin.as_millis()).unwrap_or(i64::MAX);
        let left = deadline
            .saturating_sub(Utc::now().timestamp_millis())
            .saturating_sub(margin);
        Some(Duration::from_millis(u64::try_from(left).unwrap_or(0)))
    }
}

/// Handler answers one lifecycle event: reconcile, then report.
#[derive(Debug)]
pub struct Handler<I, M, R> {
    reconciler: Reconciler<I, M>,
    sink: R,
    policy: ReportPolicy,
    margin: Duration,
}

impl<I, M, R> Handler<I, M, R> {
    pub fn new(
        reconciler: Reconciler<I, M>,
        sink: R,
        policy: ReportPolicy,
        margin: Duration,
    ) -> Self {
        Self {
            reconciler,
            sink,
            policy,
            margin,
        }
    }
}

impl<I, M, R> Handler<I, M, R>
where
    I: IdentityService + Sync,
    M: MetadataStore + Sync,
    R: ResponseSink + Sync,
{
    /// handle always tries to deliver a response; only a failed delivery is
    /// returned as an error.
    pub async fn handle(
        &self,
        event: LifecycleEvent,
        invocation: &Invocation,
    ) -> Result<CustomResourceResponse> {
        info!(
            request_type = %event.request_type,
            stack_id = %event.stack_id,
            logical_resource_id = %event.logical_resource_id,
            "lifecycle event received"
        );

        let outcome = self.run(&event, invocation).await;
        let status = self.policy.status(&outcome);

        // Keep the id stable across updates, otherwise the orchestration
        // service deletes the "old" resource after an update.
        let physical_resource_id = event
            .physical_resource_id
            .clone()
            .unwrap_or_else(|| self.reconciler.config().provider.arn.clone());
        let reason = format!(
            "{}. See the details in log stream: {}",
            outcome, invocation.log_stream
        );
        let response = CustomResourceResponse::new(
            &event,
            status,
            reason,
            physical_resource_id,
        );

        self.sink.send(&event.response_url, &response).await?;
        Ok(response)
    }

    async fn run(
        &self,
        event: &LifecycleEvent,
        invocation: &Invocation,
    ) -> Outcome {
        let Some(budget) = invocation.budget(self.margin) else {
            return self.reconciler.reconcile(&event.request_type).await;
        };
        match tokio::time::timeout(
            budget,
            self.reconciler.reconcile(&event.request_type),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => {
                let err = errors::timeout(&format!(
                    "reconciliation did not finish within {}ms",
                    budget.as_millis()
                ));
                warn!(code = err.code(), "{}", err);
                Outcome::Failed(err.to_string())
            }
        }
    }
}
