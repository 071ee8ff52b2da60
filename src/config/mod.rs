//! Configuration for the vizreg CLI.
//!
//! Configuration lives in a TOML file (default `.vizreg.toml` in the
//! working directory) and carries the service credentials, the endpoint,
//! and the render command that produces snapshot manifests. Credentials
//! and endpoint can be overridden through `VIZREG_*` environment
//! variables so CI never has to commit secrets.

mod loader;
mod schema;

pub use loader::load_config;
pub use schema::{Config, RenderConfig, DEFAULT_ENDPOINT};
