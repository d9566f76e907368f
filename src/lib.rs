//! End-to-end checks for build failure reporting.
//!
//! `buildprobe` drives the `oc` client against a live cluster, provokes a set
//! of known build failures, and checks that each failed build reports the
//! expected status reason and message. Every scenario submits a fixture,
//! starts a build with verbose build logging, waits for a terminal phase,
//! and compares the build's status fields with a fixed taxonomy.
//!
//! # Modules
//!
//! - [`api`]: Command orchestration shared by the CLI and embedders
//! - [`cluster`]: The `oc` client seam, typed cluster operations, and waits
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the application
//! - [`runner`]: Scenario execution and verdicts
//! - [`scenario`]: The failure scenario table
//! - [`status`]: Build phases and the status reason taxonomy

pub mod api;
pub mod cluster;
pub mod config;
pub mod error;
pub mod runner;
pub mod scenario;
pub mod status;
