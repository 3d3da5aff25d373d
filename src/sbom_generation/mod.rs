//! Domain model and pure graph-construction services
pub mod domain;
pub mod services;
