//! Solar PV estimation service.
//!
//! The numerical core lives in [`engine`]: a pure, synchronous pipeline that
//! turns consumption history, tariff data and irradiance data into a sizing,
//! billing and financial estimate. Everything else (config, tables, HTTP
//! surface) is glue around that pipeline.

pub mod api;
pub mod config;
pub mod engine;
pub mod tables;
pub mod telemetry;
