//! Interaction layer for the Campus Portal client.
//!
//! Adapters that talk to the remote portal API. Currently one adapter: the
//! HTTP implementation of the auth service port.

pub mod http_auth_service;

pub use http_auth_service::HttpAuthService;
