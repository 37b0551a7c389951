//! Common utilities and types for `gatewayctl`

pub mod config;
pub mod constants;
pub mod error;

pub use config::{
    ApisixConfig, AppConfig, DataConfig, DbConfig, GatewayConfig, HttpConfig, LogConfig,
    LogEncoding, PostgresConfig,
};
pub use constants::{
    CONFIG_ENV_VAR, CONFIG_ENV_PREFIX, DEFAULT_CONFIG_PATH, DEFAULT_HTTP_BIND, DEFAULT_HTTP_PORT,
    DEFAULT_ROUTE_PREFIX, GATEWAY_API_KEY_HEADER,
};
pub use error::{ErrorCode, GatewayCtlError, Result};
