//! # portr common
//!
//! Types shared by the scanning core and its front-ends: port sets, targets,
//! the service table, scan models, configuration, errors and the JSON wire
//! contract. Nothing in this crate performs network I/O.

pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod wire;
