//! Render collaborator abstraction.
//!
//! The render engine itself is external: a user-configured command that
//! draws component snapshots and describes them in a JSON manifest on
//! stdout. This module wraps that command behind a trait so the
//! lifecycle code can also run against a scripted mock.

pub mod command;
pub mod mock;

pub use command::CommandRenderer;

use std::path::PathBuf;
use std::sync::mpsc;

use serde::Deserialize;

use crate::error::Result;
use crate::report::SnapshotSet;

/// One render pass described by the render command.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Manifest {
    pub snapshots: Vec<ManifestEntry>,
}

/// One snapshot entry within a manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ManifestEntry {
    /// Component name.
    pub component: String,

    /// Variant within the component.
    #[serde(default = "default_variant")]
    pub variant: String,

    /// Path to the rendered PNG.
    pub path: PathBuf,

    /// Pixel width; probed from the PNG when absent.
    #[serde(default)]
    pub width: Option<u32>,

    /// Pixel height; probed from the PNG when absent.
    #[serde(default)]
    pub height: Option<u32>,
}

fn default_variant() -> String {
    "default".to_string()
}

/// Core render operations.
pub trait Renderer {
    /// Runs a single render pass and collects its snapshot set.
    fn render_once(&self, only: Option<&str>) -> Result<SnapshotSet>;

    /// Starts the renderer in watch mode.
    ///
    /// Returns a channel that yields one [`SnapshotSet`] per completed
    /// render pass. Events queue up while the consumer is busy; the
    /// channel closes when the watcher exits.
    fn watch(&self, only: Option<&str>) -> Result<mpsc::Receiver<SnapshotSet>>;
}
