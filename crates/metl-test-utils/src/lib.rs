//! Shared test utilities for the metadata ETL workspace.
//!
//! This crate provides standardised test fixtures to eliminate
//! duplication across crate test suites. It is a dev-dependency only
//! — never published.
//!
//! # Modules
//!
//! - [`client`] — [`MockTransferClient`], a recording in-memory
//!   transfer client
//! - [`fixtures`] — sample entity documents

pub mod client;
pub mod fixtures;

pub use client::{MockTransferClient, RecordedDeploy};
pub use fixtures::{layout_xml, object_xml};
