//! Entry point for the RPC front: wire request in, wire response out.

use std::sync::Arc;

use log::info;

use crate::driver::{Executor, SessionRequest};
use crate::platform::Registry;
use crate::protocol::{CliRequest, CliResponse};
use crate::transport::Connector;

/// Resolves the operator for each request and runs it.
///
/// Cheap to share: the registry is read-only and the executor keeps no
/// per-request state, so one handler serves concurrent requests.
#[derive(Debug)]
pub struct CliHandler<C> {
    registry: Arc<Registry>,
    executor: Executor<C>,
}

impl<C: Connector> CliHandler<C> {
    pub fn new(registry: Arc<Registry>, executor: Executor<C>) -> Self {
        Self { registry, executor }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn executor(&self) -> &Executor<C> {
        &self.executor
    }

    /// Handle one request. Every failure is reported in the response.
    pub async fn handle(&self, request: CliRequest) -> CliResponse {
        info!(
            "request for {} ({}.{} {}) at {}: {} command(s), mode '{}'",
            request.device,
            request.vendor,
            request.kind,
            request.version,
            request.address,
            request.commands.len(),
            request.mode
        );

        let operator = match self.registry.resolve(&request.vendor, &request.kind) {
            Ok(operator) => operator,
            Err(e) => return CliResponse::from_error(&e),
        };
        let device = request.device.clone();
        let session = match SessionRequest::try_from(request) {
            Ok(session) => session,
            Err(e) => return CliResponse::from_error(&e),
        };

        let result = self.executor.run(&operator, &session).await;
        info!(
            "{} done in {:?}: {} output(s), {}",
            device,
            result.elapsed,
            result.outputs.len(),
            result.message()
        );
        CliResponse::from(&result)
    }
}
