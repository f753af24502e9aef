use std::time::Duration;

use gofast_tracker::{
    route_plan::{InvalidRequest, OptimizeRequest, RoutePlan},
    sources::RouteOptimizer,
};
use thiserror::Error;
use tracing::{info, instrument, warn};

use crate::route_optimizer_types::{OptimizeRouteBody, OptimizedRouteResponse, RouteConversionError};

pub const OPTIMIZER_URL_ENV_VAR: &str = "GOFAST_OPTIMIZER_URL";
pub const DEFAULT_OPTIMIZER_URL: &str = "http://127.0.0.1:8000";

#[derive(Debug, Error)]
pub enum OptimizerError {
    #[error(transparent)]
    InvalidRequest(#[from] InvalidRequest),

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Invalid optimized route: {0}")]
    Conversion(#[from] RouteConversionError),
}

pub struct RouteOptimizerClientParams {
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for RouteOptimizerClientParams {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_OPTIMIZER_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl RouteOptimizerClientParams {
    /// Reads the service URL from `GOFAST_OPTIMIZER_URL`, falling back to a local instance.
    pub fn from_env() -> Self {
        let base_url = std::env::var(OPTIMIZER_URL_ENV_VAR)
            .unwrap_or_else(|_| DEFAULT_OPTIMIZER_URL.to_string());

        Self {
            base_url,
            ..Default::default()
        }
    }
}

pub struct RouteOptimizerClient {
    params: RouteOptimizerClientParams,
    client: reqwest::Client,
}

impl RouteOptimizerClient {
    pub fn new(params: RouteOptimizerClientParams) -> Result<Self, OptimizerError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;
        Ok(Self { params, client })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/optimize_delivery_route/",
            self.params.base_url.trim_end_matches('/')
        )
    }

    #[instrument(skip_all, fields(orders = request.orders.len()))]
    pub async fn optimize_route(
        &self,
        request: &OptimizeRequest,
    ) -> Result<RoutePlan, OptimizerError> {
        request.validate()?;

        let response = self
            .client
            .post(self.endpoint())
            .json(&OptimizeRouteBody::from(request))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            warn!(status, "Optimizer rejected the request");
            return Err(OptimizerError::Api { status, message });
        }

        let body: OptimizedRouteResponse = response.json().await?;
        if let Some(message) = &body.message {
            info!("Optimizer: {message}");
        }

        let plan = RoutePlan::try_from(body)?;
        info!(
            stops = plan.stops.len(),
            "Optimizer: predicted {:?} for the run", plan.total_predicted_time
        );

        Ok(plan)
    }
}

impl RouteOptimizer for RouteOptimizerClient {
    async fn optimize(&self, request: &OptimizeRequest) -> anyhow::Result<RoutePlan> {
        Ok(self.optimize_route(request).await?)
    }
}
