//! Location resolution and facility referral for a conversational health
//! service.
//!
//! Kliniki turns free-text, often colloquial place descriptions into
//! coordinates and searches two independent facility registries:
//!
//! | Registry | Keyed by | Search |
//! |----------|----------|--------|
//! | **Clinics** | Optional latitude/longitude | Great-circle radius (1–50 km), nearest first |
//! | **Hospitals** | County → Constituency → Sub-County → Ward | Most specific level wins, attribute filters ANDed |
//!
//! The registries are never merged. Geocoding failures are reported as data
//! (`success=false` plus a reason), never as errors; widening a search that
//! found nothing is left to the caller.
//!
//! # Architecture
//!
//! - **Storage**: SQLite (WAL) with one table per registry
//! - **Geocoding**: Nominatim by default, Google Geocoding with an API key
//! - **Transport**: MCP over stdio (primary) or Streamable HTTP
//!
//! # Modules
//!
//! - [`config`]: Configuration loading from TOML files and environment variables
//! - [`db`]: SQLite database initialization, schema, migrations, and health checks
//! - [`facility`]: Registry access, proximity and region search, result formatting
//! - [`geocode`]: Geocoder trait, providers, and the normalizing adapter
//! - [`service`]: [`LocationSearchService`](service::LocationSearchService), the interface the agent layer uses
//! - [`import`]: Bulk load of a curated JSON snapshot

pub mod config;
pub mod db;
pub mod error;
pub mod facility;
pub mod geocode;
pub mod import;
pub mod service;
