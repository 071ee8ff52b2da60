//! vizreg library - visual-regression run orchestration.
//!
//! This library exposes the core functionality of the `vizreg` CLI for
//! use in tests and potentially other applications.
//!
//! # Modules
//!
//! - `cli`: Command-line surface (clap definitions)
//! - `config`: TOML configuration schema and loader
//! - `dev`: Dev-mode continuous-comparison loop
//! - `error`: Error types with user-recoverable hints
//! - `lifecycle`: run/compare/has-report/empty behaviors and exit codes
//! - `render`: Render collaborator (subprocess + mock)
//! - `report`: Report service (curl client + mock)
//! - `sha`: Report identifier generation
#![forbid(unsafe_code)]

pub mod cli;
pub mod config;
pub mod dev;
pub mod error;
pub mod lifecycle;
pub mod logging;
pub mod progress;
pub mod render;
pub mod report;
pub mod sha;
