//! Gameserver Ingress - annotation-driven Ingress generation for Agones GameServers
//!
//! This crate derives the `networking.k8s.io/v1` Ingress a GameServer should be
//! exposed through, based on annotations carried by the GameServer itself. Two
//! mutually exclusive routing modes are supported:
//! - **domain**: traffic is routed by subdomain (`{gameserver}.{domain}`)
//! - **path**: traffic is routed by URL path prefix under a shared FQDN
//!
//! The pipeline is pure and in-memory: it consumes a GameServer record and
//! mutates a target Ingress, reporting success or a typed failure. Watching
//! for changes, applying the resulting object to a cluster, and retrying
//! failed reconciliation passes all belong to the surrounding driver.
//!
//! # Modules
//!
//! - [`gameserver`] - GameServer CRD types, annotation constants, routing mode
//! - [`reconcilers`] - Ingress transformation steps and the pipeline executor
//! - [`error`] - Error types for the pipeline

#![deny(missing_docs)]

pub mod error;
pub mod gameserver;
pub mod reconcilers;

pub use error::Error;

/// Result type alias using our custom Error type
pub type Result<T> = std::result::Result<T, Error>;
