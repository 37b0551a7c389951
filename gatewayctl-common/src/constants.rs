//! Defaults shared by the library crates, the CLI and the integration tests.

/// Default port for the plugin registration API.
pub const DEFAULT_HTTP_PORT: u16 = 8081;

/// Default bind address for the plugin registration API as a string (`0.0.0.0:8081`).
pub const DEFAULT_HTTP_BIND: &str = "0.0.0.0:8081";

/// Default configuration file, relative to the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config/config.yaml";

/// Environment variable that overrides the configuration file path.
pub const CONFIG_ENV_VAR: &str = "APP_CONF";

/// Prefix for environment overrides of individual settings
/// (`GATEWAYCTL__GATEWAY__APISIX__TOKEN=...`).
pub const CONFIG_ENV_PREFIX: &str = "GATEWAYCTL";

/// Header carrying the shared secret on every gateway admin request.
pub const GATEWAY_API_KEY_HEADER: &str = "X-API-KEY";

/// Public path prefix used when the configuration does not set one.
pub const DEFAULT_ROUTE_PREFIX: &str = "/plugins";
