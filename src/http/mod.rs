//! HTTP transport for the analytics query endpoint
//!
//! The client is the sole I/O boundary of the crate: it POSTs a pre-built
//! query payload to the fixed endpoint and hands the parsed JSON body to
//! the decoders. No retries and no caching; one snapshot per call.

mod client;

pub use client::{DashboardClient, DashboardClientConfig, DashboardClientConfigBuilder, QueryOptions};
