//! Unit tests for buildprobe configuration types.
//!
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Defaults and deserialisation
//! - [`validation`] - `AppConfig::validate` and the post-merge hook
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence

mod helpers;
mod types_tests;
