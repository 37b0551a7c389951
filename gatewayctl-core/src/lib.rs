//! Plugin registration workflow for `gatewayctl`.
//!
//! A plugin is registered by creating a route on the gateway and then
//! recording the mapping in the catalog. Both sides sit behind traits
//! ([`RouteGateway`], [`PluginCatalog`]) so the [`RegistrationService`]
//! only sees the orchestration contract.

pub mod catalog;
pub mod encoder;
pub mod gateway;
pub mod service;

// Re-export specific items for convenience
pub use catalog::{
    CatalogError, Lifecycle, MemoryCatalog, NewPlugin, PgCatalog, PluginCatalog, PluginRecord,
    PluginView,
};
pub use encoder::{encode_segment, RouteSegment};
pub use gateway::{ApisixGateway, GatewayError, RouteDefinition, RouteGateway, Upstream};
pub use service::{Registered, RegistrationError, RegistrationService};
