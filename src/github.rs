//! GitHub REST access for the charts workflow.
//!
//! Provides a bearer-token authenticated REST client, a typed manager over
//! the endpoints the workflow uses, and paginated PR file listings.

/// Reqwest based REST client.
pub mod client;

/// Typed wrapper over the REST client.
pub mod manager;

/// Request payloads sent to the REST API.
pub mod request;

/// Trait abstracting raw REST access.
pub mod traits;

/// Response types and the tagged API result.
pub mod types;
