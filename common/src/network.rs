pub mod ports;
pub mod service;
pub mod target;
