//! # portr core
//!
//! The scanning engine: a bounded worker pool of TCP connect probes behind
//! the [`scanner::ScanEngine`] facade.

pub mod network;
pub mod scanner;
