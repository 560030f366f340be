//! Core domain + export pipeline for the Slack workspace exporter.
//!
//! This crate is transport-agnostic. The Slack Web API lives behind a port
//! (trait) implemented in the adapter crate; everything here works against
//! that port, so the pipeline can be exercised with fakes.

pub mod api;
pub mod archive;
pub mod config;
pub mod domain;
pub mod errors;
pub mod export;
pub mod logging;

pub use errors::{Error, Result};
