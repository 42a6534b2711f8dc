use std::time::Duration;

use serde::{Deserialize, de::DeserializeOwned};
use thiserror::Error;
use tracing::debug;
use waypath_core::waypoint::Waypoint;

use crate::plan::{PlanRequestBody, PlanResponse, PlanStrategy};

#[derive(Debug, Error)]
pub enum PlannerError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Planner error: {status} - {message}")]
    Api { status: u16, message: String },

    #[error("Deserialization error: {0}")]
    Deserialize(#[from] serde_json::Error),
}

/// FastAPI error body
#[derive(Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

#[derive(Clone, Debug)]
pub struct PlannerClientParams {
    pub base_url: String,
    pub timeout: Duration,
}

pub const DEFAULT_PLANNER_URL: &str = "http://localhost:8002";

impl Default for PlannerClientParams {
    fn default() -> Self {
        Self {
            base_url: String::from(DEFAULT_PLANNER_URL),
            timeout: Duration::from_secs(30),
        }
    }
}

/// Client for the route planning service that orders the cities of a trip.
pub struct PlannerClient {
    params: PlannerClientParams,
    client: reqwest::Client,
}

impl PlannerClient {
    pub fn new(params: PlannerClientParams) -> Result<Self, PlannerError> {
        let client = reqwest::Client::builder().timeout(params.timeout).build()?;

        Ok(Self { params, client })
    }

    pub async fn cities(&self) -> Result<Vec<Waypoint>, PlannerError> {
        let response = self.client.get(self.url("/cities")).send().await?;

        let cities: Vec<Waypoint> = self.handle_response(response).await?;
        debug!(cities = cities.len(), "Planner: Fetched cities");

        Ok(cities)
    }

    pub async fn plan_greedy(
        &self,
        start_city: &str,
        must_visit: &[String],
        return_to_start: bool,
    ) -> Result<PlanResponse, PlannerError> {
        let body = PlanRequestBody {
            start_city: start_city.to_string(),
            must_visit: Some(must_visit.to_vec()),
            end_city: None,
            return_to_start,
        };

        self.plan(PlanStrategy::Greedy, &body).await
    }

    pub async fn plan_intelligent(
        &self,
        start_city: &str,
        end_city: &str,
    ) -> Result<PlanResponse, PlannerError> {
        let body = PlanRequestBody {
            start_city: start_city.to_string(),
            must_visit: None,
            end_city: Some(end_city.to_string()),
            return_to_start: false,
        };

        self.plan(PlanStrategy::Intelligent, &body).await
    }

    async fn plan(
        &self,
        strategy: PlanStrategy,
        body: &PlanRequestBody,
    ) -> Result<PlanResponse, PlannerError> {
        let response = self
            .client
            .post(self.url(strategy.path()))
            .json(body)
            .send()
            .await?;

        let plan: PlanResponse = self.handle_response(response).await?;
        debug!(
            ?strategy,
            stops = plan.route.len(),
            suggested = plan.suggested_cities.len(),
            "Planner: Received plan"
        );

        Ok(plan)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.params.base_url.trim_end_matches('/'), path)
    }

    async fn handle_response<T>(&self, response: reqwest::Response) -> Result<T, PlannerError>
    where
        T: DeserializeOwned,
    {
        let status = response.status();
        let body = response.bytes().await?;

        if status.is_success() {
            return Ok(serde_json::from_slice(&body)?);
        }

        let message = match serde_json::from_slice::<ErrorBody>(&body) {
            Ok(ErrorBody {
                detail: serde_json::Value::String(detail),
            }) => detail,
            Ok(ErrorBody { detail }) => detail.to_string(),
            Err(_) => String::from_utf8_lossy(&body).into_owned(),
        };

        Err(PlannerError::Api {
            status: status.as_u16(),
            message,
        })
    }
}
