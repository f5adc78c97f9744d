//! critiq — AI code review for GitHub Actions (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod classify;
pub mod config;
pub mod constants;
pub mod env;
pub mod extract;
pub mod github;
pub mod models;
pub mod orchestrator;
pub mod prompt;
pub mod provider;
pub mod repair;
pub mod report;
