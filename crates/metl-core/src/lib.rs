//! Transform engine and pipeline orchestration
//!
//! This crate drives a staged metadata ETL run end to end:
//!
//! - **Staging**: run-scoped scratch directories with guaranteed
//!   cleanup on every exit path
//! - **Transform engine**: per-instance discovery, escaping, parsing,
//!   transform invocation, and write-back for one entity type
//! - **Pipeline**: the linear stage machine over the three task
//!   variants (synthesis, batch transform, single-entity transform)
//! - **Transfer client seam**: the trait the external network client
//!   is consumed through
//!
//! # Architecture
//!
//! `metl-core` sits above the leaf crates:
//!
//! ```text
//!        concrete tasks / callers
//!                  |
//!              metl-core
//!                  |
//!           +------+------+
//!           |             |
//!       metl-xml      metl-meta
//! ```

pub mod client;
pub mod config;
pub mod engine;
pub mod error;
pub mod namespace;
pub mod pipeline;
pub mod staging;
pub mod tasks;

pub use client::{DeployOptions, DeployResult, DeployStatus, TransferClient};
pub use config::TaskOptions;
pub use engine::{EntityTransform, TransformOutcome, transform_entity_files};
pub use error::{Error, Result};
pub use namespace::{NAMESPACE_OR_C_TOKEN, NAMESPACE_TOKEN, inject_namespace};
pub use pipeline::{BatchTransformFn, Pipeline, RunOutcome, SynthesizeFn, VariantSpec};
pub use staging::StagingArea;
pub use tasks::{ObjectSharing, SharingDefaults};
