use super::{GatewayError, RouteDefinition, RouteGateway, Upstream};
use crate::encoder::RouteSegment;
use async_trait::async_trait;
use gatewayctl_common::{ApisixConfig, GATEWAY_API_KEY_HEADER};
use reqwest::{Client, StatusCode, Url};
use serde_json::{Map, Value};
use tracing::{debug, error};

/// Client for an APISIX-style admin API (`PUT|DELETE <base>/<segment>`).
///
/// Cloning is cheap; clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApisixGateway {
    client: Client,
    base_url: String,
    token: String,
    prefix: String,
}

impl ApisixGateway {
    /// Build a client from configuration, applying the optional timeout.
    pub fn new(config: &ApisixConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;
        Ok(Self::with_client(client, config))
    }

    /// Use an existing HTTP client.
    pub fn with_client(client: Client, config: &ApisixConfig) -> Self {
        Self {
            client,
            base_url: config.url.clone(),
            token: config.token.clone(),
            prefix: config.prefix.clone(),
        }
    }

    /// Public path under which the gateway serves `segment`.
    pub fn public_path(&self, segment: &RouteSegment) -> String {
        format!("{}/{}", self.prefix, segment)
    }

    fn admin_url(&self, segment: &RouteSegment) -> Result<Url, GatewayError> {
        let raw = format!("{}/{}", self.base_url, segment);
        Url::parse(&raw).map_err(|e| {
            error!("url parse error for {}: {}", raw, e);
            GatewayError::InvalidUrl(format!("{raw}: {e}"))
        })
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<(), GatewayError> {
        let response = request
            .header(GATEWAY_API_KEY_HEADER, &self.token)
            .send()
            .await
            .map_err(|e| {
                error!("send request to gateway error: {}", e);
                GatewayError::from(e)
            })?;

        let status = response.status();
        let bytes = response.bytes().await?;
        let body: Map<String, Value> = serde_json::from_slice(&bytes).map_err(|e| {
            error!("gateway response is not a JSON object: {}", e);
            GatewayError::MalformedResponse(e.to_string())
        })?;

        if status != StatusCode::OK && status != StatusCode::CREATED {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body: Value::Object(body).to_string(),
            });
        }

        debug!(status = status.as_u16(), body = ?body, "gateway response");
        Ok(())
    }
}

#[async_trait]
impl RouteGateway for ApisixGateway {
    async fn upsert_route(
        &self,
        segment: &RouteSegment,
        upstream_address: &str,
    ) -> Result<String, GatewayError> {
        let url = self.admin_url(segment)?;
        let uri = self.public_path(segment);
        let definition = RouteDefinition {
            uri: uri.clone(),
            upstream: Upstream::single_node(upstream_address),
        };

        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();

        let result = self.send(self.client.put(url).json(&definition)).await;

        #[cfg(feature = "metrics")]
        if let Some(m) = gatewayctl_observability::gatewayctl_metrics() {
            m.observe_gateway_request("PUT", started.elapsed());
        }

        result.map(|()| uri)
    }

    async fn delete_route(&self, segment: &RouteSegment) -> Result<(), GatewayError> {
        let url = self.admin_url(segment)?;

        #[cfg(feature = "metrics")]
        let started = std::time::Instant::now();

        let result = self.send(self.client.delete(url)).await;

        #[cfg(feature = "metrics")]
        if let Some(m) = gatewayctl_observability::gatewayctl_metrics() {
            m.observe_gateway_request("DELETE", started.elapsed());
        }

        result
    }
}
