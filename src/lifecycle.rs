//! Run-lifecycle behaviors behind the CLI commands.
//!
//! Each behavior is a thin sequencing function over the render and
//! report collaborators; `main` wires real implementations in and maps
//! results onto process exit codes. Keeping the sequencing here, generic
//! over the traits, is what lets the state machine be tested without a
//! renderer or a network.

use tracing::debug;

use crate::error::Result;
use crate::render::Renderer;
use crate::report::{ComparisonResult, ReportMeta, ReportService, Uploaded};
use crate::sha;

/// Exit code signalling "reports differ visually" to CI pipelines.
/// External contract; the literal value must not change.
pub const VISUAL_DIFF_EXIT_CODE: i32 = 113;

/// A report identifier plus how it came to be.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSha {
    pub sha: String,
    pub generated: bool,
}

/// Resolves the report identifier for a command that accepts an
/// optional SHA.
///
/// Caller-supplied identifiers are used verbatim. Generated ones get the
/// component filter appended so a partial run can never collide with a
/// full run's report.
#[must_use]
pub fn resolve_sha(supplied: Option<&str>, only: Option<&str>) -> ResolvedSha {
    match supplied {
        Some(sha) => ResolvedSha {
            sha: sha.to_string(),
            generated: false,
        },
        None => {
            let mut sha = sha::generate_dev_sha();
            if let Some(component) = only {
                sha.push('-');
                sha.push_str(component);
            }
            ResolvedSha {
                sha,
                generated: true,
            }
        }
    }
}

/// `run`: render one snapshot set and upload it under `sha`.
pub fn run_once<R, S>(
    renderer: &R,
    service: &S,
    sha: &str,
    only: Option<&str>,
    meta: &ReportMeta,
) -> Result<Uploaded>
where
    R: Renderer + ?Sized,
    S: ReportService + ?Sized,
{
    let snapshots = renderer.render_once(only)?;
    debug!(count = snapshots.len(), %sha, "rendered snapshot set");
    service.upload(sha, &snapshots, meta)
}

/// `empty`: upload a report with no snapshots, marking `sha` as having
/// no visual surface.
pub fn upload_empty<S>(service: &S, sha: &str, meta: &ReportMeta) -> Result<Uploaded>
where
    S: ReportService + ?Sized,
{
    service.upload(sha, &[], meta)
}

/// `compare`: diff two stored reports by identifier.
pub fn compare_reports<S>(
    service: &S,
    sha1: &str,
    sha2: &str,
    meta: &ReportMeta,
) -> Result<ComparisonResult>
where
    S: ReportService + ?Sized,
{
    service.compare(sha1, sha2, meta)
}

/// `has-report`: query whether a report exists for `sha`.
pub fn has_report<S>(service: &S, sha: &str) -> Result<bool>
where
    S: ReportService + ?Sized,
{
    service.exists(sha)
}

/// Maps a comparison outcome onto the CI exit-code contract.
#[must_use]
pub const fn comparison_exit_code(result: &ComparisonResult) -> i32 {
    if result.equal {
        0
    } else {
        VISUAL_DIFF_EXIT_CODE
    }
}

/// Maps report existence onto the `has-report` exit-code contract.
#[must_use]
pub const fn existence_exit_code(exists: bool) -> i32 {
    if exists { 0 } else { 1 }
}
