//! # NIJZ Vaccination Dashboard Client
//!
//! A typed client for the national COVID-19 vaccination dashboard's public
//! analytics query endpoint. The dashboard backend answers each report with
//! a compact, run-length-encoded, dictionary-indirected result document not
//! meant for external consumption; this crate reconstructs flat, typed rows
//! from it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use nijz_vaccinations::{vaccinations_by_day, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     for row in vaccinations_by_day().await? {
//!         println!("{}: {} / {}", row.date.date(), row.first_dose, row.second_dose);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────────┐
//! │                     Report Functions                      │
//! │  vaccinations_by_day()  vaccinations_by_age()  ...        │
//! └───────────────────────────────┬───────────────────────────┘
//!                                 │
//! ┌──────────────┬────────────────┴──────────────┬────────────┐
//! │    Query     │            HTTP               │   Decode   │
//! ├──────────────┼───────────────────────────────┼────────────┤
//! │ fixed        │ POST, fixed headers,          │ positional │
//! │ per-report   │ status validation,            │ paths,     │
//! │ payloads     │ per-call deadline             │ RLE state  │
//! │              │                               │ machine    │
//! └──────────────┴───────────────────────────────┴────────────┘
//! ```
//!
//! Decoders are pure and stateless across calls; the client is the sole
//! I/O boundary and is safe to share across tasks.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::doc_markdown)]

/// Error types for the client
pub mod error;

/// Row types produced by the decoders
pub mod types;

/// HTTP transport to the analytics endpoint
pub mod http;

/// Fixed per-report query payloads
pub mod query;

/// Response decoders
pub mod decode;

/// Public report functions
pub mod reports;

pub use error::{Error, Result};
pub use http::{DashboardClient, DashboardClientConfig, QueryOptions};
pub use reports::{
    vaccinations_by_age, vaccinations_by_age_range, vaccinations_by_age_range_90,
    vaccinations_by_day, vaccinations_by_region, vaccines_supplied_and_used,
    vaccines_supplied_by_manufacturer, vaccines_supplied_by_manufacturer_cumulative,
};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
