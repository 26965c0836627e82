//! Testcrier Server Library
//!
//! Receives JUnit reports over HTTP and posts a result summary to Slack
//! from a single background dispatch worker. Exposed as a library for
//! testing purposes.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod ingest;
pub mod models;
pub mod routes;
pub mod services;
