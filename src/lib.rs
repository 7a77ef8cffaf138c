//! tasktrack - Flat-file Task Tracking Library
//!
//! This library provides the core functionality for the tasktrack CLI:
//! a task store and user directory kept as plain text records, and
//! derived overview reports.
//!
//! # Core Concepts
//!
//! - **Records**: one line per task or user, fields joined by `", "`
//! - **Positions**: tasks have no identifier; they are addressed by their
//!   position in the loaded collection
//! - **Reports**: task and per-user statistics recomputed from the stores
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tasktrack.toml`
//! - `error`: Error types and result aliases
//! - `output`: JSON envelope and human-readable output
//! - `record`: Line codec for task and user records
//! - `report`: Persisted overview reports
//! - `stats`: Percentage arithmetic and report generation
//! - `storage`: Data directory layout and atomic file writes
//! - `task`: Task model and task store
//! - `user`: User directory and credential checks

pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod record;
pub mod report;
pub mod stats;
pub mod storage;
pub mod task;
pub mod user;

pub use error::{Error, Result};
