//! Gateway admin API client.
//!
//! A route is identified by its [`RouteSegment`]. Creating it is an
//! idempotent PUT, removing it a DELETE; each call is a single attempt.

mod apisix;

pub use apisix::ApisixGateway;

use crate::encoder::RouteSegment;
use async_trait::async_trait;
use gatewayctl_common::ErrorCode;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use thiserror::Error;

/// Errors reported by the gateway client
#[derive(Error, Debug)]
pub enum GatewayError {
    /// The request never produced a response (connect, TLS, timeout)
    #[error("{0}")]
    Transport(String),

    /// The response body was not a JSON object
    #[error("{0}")]
    MalformedResponse(String),

    /// The gateway answered with a status other than 200/201
    #[error("{body}")]
    Rejected { status: u16, body: String },

    /// The admin URL could not be built
    #[error("invalid gateway url: {0}")]
    InvalidUrl(String),
}

impl GatewayError {
    /// Subsystem code; the API reports every gateway failure as
    /// [`ErrorCode::CreateRoute`] and this one only reaches the logs.
    pub fn code(&self) -> ErrorCode {
        match self {
            GatewayError::Rejected { .. } => ErrorCode::GatewayRequest,
            _ => ErrorCode::CreateRoute,
        }
    }
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        GatewayError::Transport(err.to_string())
    }
}

/// Load balancing target set of a route
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Upstream {
    #[serde(rename = "type")]
    pub kind: String,
    /// Address to weight
    pub nodes: BTreeMap<String, u32>,
}

impl Upstream {
    /// Round-robin over a single node with weight 1.
    pub fn single_node(address: impl Into<String>) -> Self {
        Self {
            kind: "roundrobin".to_string(),
            nodes: BTreeMap::from([(address.into(), 1)]),
        }
    }
}

/// Body of the route PUT request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteDefinition {
    pub uri: String,
    pub upstream: Upstream,
}

/// Route management on the external gateway
#[async_trait]
pub trait RouteGateway: Send + Sync {
    /// Create or replace the route for `segment`, forwarding to `upstream_address`.
    ///
    /// Returns the public path of the route.
    async fn upsert_route(
        &self,
        segment: &RouteSegment,
        upstream_address: &str,
    ) -> Result<String, GatewayError>;

    /// Remove the route for `segment`. A missing route is an error like any
    /// other non-2xx answer.
    async fn delete_route(&self, segment: &RouteSegment) -> Result<(), GatewayError>;
}
