//! HTTP API: server, routing, and request/response mapping for the parts catalog.

pub mod app;
pub mod config;
pub mod server;
