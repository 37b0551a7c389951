//! Registration workflow.
//!
//! Register: encode id → upsert gateway route → insert catalog row.
//! Unregister: encode id → delete gateway route → soft delete catalog row.
//!
//! The gateway step always runs first and nothing is rolled back. When the
//! catalog step fails after the gateway step succeeded, the gateway is left
//! with a route the catalog does not know about (or the catalog keeps a row
//! whose route is gone). The failure is reported as a catalog error and the
//! caller is expected to re-query before retrying.

use crate::catalog::{CatalogError, NewPlugin, PluginCatalog, PluginView};
use crate::encoder::encode_segment;
use crate::gateway::{GatewayError, RouteGateway};
use gatewayctl_common::ErrorCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

/// Terminal failure of a registration workflow step
#[derive(Error, Debug)]
pub enum RegistrationError {
    /// Input rejected before any side effect
    #[error("{0}")]
    BadRequest(String),

    /// The gateway step failed; the catalog was not touched
    #[error(transparent)]
    Gateway(#[from] GatewayError),

    /// The catalog step failed; the gateway step may already be applied
    #[error(transparent)]
    Catalog(#[from] CatalogError),
}

impl RegistrationError {
    /// Application code reported in the response envelope.
    pub fn code(&self) -> ErrorCode {
        match self {
            RegistrationError::BadRequest(_) => ErrorCode::BadRequest,
            RegistrationError::Gateway(_) => ErrorCode::CreateRoute,
            // Missing rows are store errors like any other.
            RegistrationError::Catalog(_) => ErrorCode::Database,
        }
    }
}

/// Successful registration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registered {
    /// Public path of the new route
    pub uri: String,
}

/// Orchestrates the gateway and the catalog
#[derive(Clone)]
pub struct RegistrationService {
    gateway: Arc<dyn RouteGateway>,
    catalog: Arc<dyn PluginCatalog>,
}

impl RegistrationService {
    pub fn new(gateway: Arc<dyn RouteGateway>, catalog: Arc<dyn PluginCatalog>) -> Self {
        Self { gateway, catalog }
    }

    pub fn catalog(&self) -> &Arc<dyn PluginCatalog> {
        &self.catalog
    }

    /// Register `id` as a gateway upstream and record it in the catalog.
    ///
    /// The id doubles as the upstream address of the route.
    pub async fn register(&self, id: &str, extra: Value) -> Result<Registered, RegistrationError> {
        let result = self.try_register(id, extra).await;

        #[cfg(feature = "metrics")]
        if let Some(m) = gatewayctl_observability::gatewayctl_metrics() {
            m.record_registration(outcome(&result));
        }

        result
    }

    async fn try_register(&self, id: &str, extra: Value) -> Result<Registered, RegistrationError> {
        validate_id(id)?;
        let segment = encode_segment(id);

        let uri = self.gateway.upsert_route(&segment, id).await.map_err(|e| {
            error!(
                plugin = id,
                %segment,
                code = e.code().code(),
                "gateway route upsert failed: {}",
                e
            );
            e
        })?;

        let plugin = NewPlugin {
            id: id.to_string(),
            url: uri.clone(),
            extra,
        };
        if let Err(e) = self.catalog.create(plugin).await {
            warn!(
                plugin = id,
                %segment,
                "catalog insert failed after gateway upsert, route left in place: {}",
                e
            );
            return Err(e.into());
        }

        info!(plugin = id, uri = %uri, "plugin registered");
        Ok(Registered { uri })
    }

    /// Remove the gateway route for `id` and soft delete its catalog row.
    pub async fn unregister(&self, id: &str) -> Result<(), RegistrationError> {
        let result = self.try_unregister(id).await;

        #[cfg(feature = "metrics")]
        if let Some(m) = gatewayctl_observability::gatewayctl_metrics() {
            m.record_unregistration(outcome(&result));
        }

        result
    }

    async fn try_unregister(&self, id: &str) -> Result<(), RegistrationError> {
        validate_id(id)?;
        let segment = encode_segment(id);

        self.gateway.delete_route(&segment).await.map_err(|e| {
            error!(
                plugin = id,
                %segment,
                code = e.code().code(),
                "gateway route delete failed: {}",
                e
            );
            e
        })?;

        if let Err(e) = self.catalog.soft_delete(id).await {
            warn!(
                plugin = id,
                %segment,
                "catalog soft delete failed after gateway delete, row left active: {}",
                e
            );
            return Err(e.into());
        }

        info!(plugin = id, "plugin unregistered");
        Ok(())
    }

    /// The active catalog entry for `id`.
    pub async fn get(&self, id: &str) -> Result<PluginView, RegistrationError> {
        Ok(self.catalog.get(id).await?)
    }

    /// Ids of all active plugins.
    pub async fn list(&self) -> Result<Vec<String>, RegistrationError> {
        Ok(self.catalog.list().await?)
    }
}

fn validate_id(id: &str) -> Result<(), RegistrationError> {
    if id.is_empty() {
        return Err(RegistrationError::BadRequest("id is required".to_string()));
    }
    Ok(())
}

#[cfg(feature = "metrics")]
fn outcome<T>(result: &Result<T, RegistrationError>) -> gatewayctl_observability::Outcome {
    use gatewayctl_observability::Outcome;
    match result {
        Ok(_) => Outcome::Success,
        Err(RegistrationError::BadRequest(_)) => Outcome::BadRequest,
        Err(RegistrationError::Gateway(_)) => Outcome::GatewayError,
        Err(RegistrationError::Catalog(_)) => Outcome::CatalogError,
    }
}
