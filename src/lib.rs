//! Typed reddit listing client.
//!
//! [`client::Session`] builds OAuth requests, tracks rate limits from
//! response headers and decodes `{kind, data}` JSON into [`models::Thing`]s.
//! The `operations` module holds the command-line use cases built on it.

pub mod cli;
pub mod client;
pub mod config;
pub mod models;
pub mod operations;
