//! Key-value module: three-layer architecture (domain, repository, service).
//!
//! The repository stores opaque text rows; the service owns JSON encoding,
//! key validation and error classification.

pub mod domain;
pub mod repository;
pub mod service;
pub mod repo;

pub use service::KeyValueStore;
