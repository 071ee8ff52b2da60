//! Report service abstraction.
//!
//! This module provides a trait-based abstraction over the remote
//! comparison service, with a curl-backed client for production and a
//! recording mock for lifecycle tests. Reports live server-side, keyed
//! by an opaque SHA-like identifier; the CLI only ever references them
//! by that identifier.

pub mod client;
pub mod mock;

pub use client::CurlReportClient;

use serde::{Deserialize, Serialize};

use crate::cli::RunOptions;
use crate::error::Result;

/// One rendered component capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    /// Component name (e.g. "Button").
    pub component: String,
    /// Variant name within the component (e.g. "hover", "default").
    pub variant: String,
    /// Pixel width of the capture.
    pub width: u32,
    /// Pixel height of the capture.
    pub height: u32,
    /// Raw PNG bytes.
    pub png: Vec<u8>,
}

/// An ordered collection of snapshots for one report.
pub type SnapshotSet = Vec<Snapshot>;

/// Reference to a stored report, returned by the service after upload.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Uploaded {
    /// URL where the stored report can be viewed.
    pub url: String,
}

/// Outcome of comparing two reports by identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ComparisonResult {
    /// True when the two reports are visually identical.
    pub equal: bool,
    /// Human-readable description of the differences (or their absence).
    pub summary: String,
}

/// Metadata forwarded with uploads and comparisons.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportMeta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<String>,
}

impl ReportMeta {
    /// Builds metadata from the shared CLI options plus the configured
    /// project name.
    pub fn from_options(opts: &RunOptions, project: Option<&str>) -> Self {
        Self {
            link: opts.link.clone(),
            message: opts.message.clone(),
            author: opts.author.clone(),
            project: project.map(str::to_string),
        }
    }
}

/// Core report service operations.
///
/// Abstracts over the real HTTP-backed client and the mock used in
/// tests. Identifiers are used verbatim; the service owns report
/// persistence and diffing.
pub trait ReportService {
    /// Uploads a snapshot set under `sha`, returning the report URL.
    ///
    /// An empty snapshot slice is a valid upload: it marks the sha as
    /// having no visual surface.
    fn upload(&self, sha: &str, snapshots: &[Snapshot], meta: &ReportMeta) -> Result<Uploaded>;

    /// Asks the service to diff the reports stored under `sha1` and
    /// `sha2`.
    fn compare(&self, sha1: &str, sha2: &str, meta: &ReportMeta) -> Result<ComparisonResult>;

    /// Queries whether a report exists for `sha`.
    fn exists(&self, sha: &str) -> Result<bool>;
}
