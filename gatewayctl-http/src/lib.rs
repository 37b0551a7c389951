//! HTTP surface of `gatewayctl`.
//!
//! Every response uses the `{code, msg, data}` envelope. Handled failures are
//! reported with HTTP 200 and a non-zero `code`; only bodies that fail to
//! parse get HTTP 400.

pub mod handlers;
pub mod models;
pub mod response;
pub mod server;

pub use models::{RegisterRequest, UnregisterRequest};
pub use response::Envelope;
pub use server::{create_router, ApiServer, ApiServerBuilder, ApiState};
