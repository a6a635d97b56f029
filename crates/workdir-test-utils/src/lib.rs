//! Shared test utilities for the workdir workspace.
//!
//! This crate provides temporary source trees and listing helpers so the
//! crate test suites do not each reinvent them. It is a dev-dependency only,
//! never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for temporary directory trees
//! - [`fixtures`]: canned source layouts used across suites

pub mod fixtures;
pub mod tree;

pub use tree::{TestTree, listing};
