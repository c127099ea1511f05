//! # atrium-client
//!
//! Gateway API client for the Atrium console.
//!
//! Two interchangeable backends implement the façade traits from
//! `atrium-core`: [`facades::HttpGateway`] over live HTTP and
//! [`mock::MockBackend`] over an in-memory store with simulated latency.
//! The traits are the stable contract; swapping backends is a wiring
//! change only.

pub mod facades;
pub mod http;
pub mod mock;
pub mod sse;

pub use facades::HttpGateway;
pub use http::{ApiClient, TENANT_HEADER};
pub use mock::MockBackend;
