//! Dev-mode continuous-comparison loop.
//!
//! The render watcher delivers one [`SnapshotSet`] per completed render
//! pass through an mpsc channel. This controller is the channel's only
//! consumer, so cycles are strictly sequential: a cycle's upload and
//! comparison finish before the next readiness event is taken. Events
//! arriving mid-cycle queue up in the channel and are handled in order.
//!
//! The first successfully uploaded report of a session becomes the
//! baseline; every later cycle is compared against that same baseline,
//! never against the previous iteration.

use std::sync::mpsc::Receiver;

use tracing::{debug, warn};

use crate::error::Result;
use crate::progress::{indent, Reporter};
use crate::report::{ReportMeta, ReportService, Snapshot, SnapshotSet};
use crate::sha;

/// Consumes readiness events until the channel closes.
///
/// A failed cycle (upload or comparison) is reported and the loop keeps
/// going; the next render pass gets a fresh, independent cycle. The loop
/// has no terminal state of its own — it ends when the watcher does.
pub fn run_dev_loop<S>(
    events: &Receiver<SnapshotSet>,
    service: &S,
    meta: &ReportMeta,
    reporter: &Reporter,
) where
    S: ReportService + ?Sized,
{
    let mut baseline: Option<String> = None;
    for snapshots in events {
        if let Err(e) = run_cycle(service, meta, reporter, &mut baseline, &snapshots) {
            warn!(error = %e, "dev cycle failed; waiting for next render pass");
            reporter.failure(&e);
        }
    }
}

/// One full cycle: upload under a fresh identifier, then establish the
/// baseline or compare against it.
fn run_cycle<S>(
    service: &S,
    meta: &ReportMeta,
    reporter: &Reporter,
    baseline: &mut Option<String>,
    snapshots: &[Snapshot],
) -> Result<()>
where
    S: ReportService + ?Sized,
{
    let sha = sha::generate_dev_sha();

    let task = reporter.task(format!("Preparing report ({sha})..."));
    let uploaded = match service.upload(&sha, snapshots, meta) {
        Ok(uploaded) => {
            task.success();
            uploaded
        }
        Err(e) => {
            task.fail();
            return Err(e);
        }
    };
    reporter.info(&format!("View results at {}", uploaded.url));

    let Some(base) = baseline.as_deref() else {
        // First successful upload of the session; nothing to diff against.
        debug!(%sha, "baseline established");
        *baseline = Some(sha);
        return Ok(());
    };

    let task = reporter.task("Comparing with baseline report...");
    let result = match service.compare(base, &sha, meta) {
        Ok(result) => {
            task.success();
            result
        }
        Err(e) => {
            task.fail();
            return Err(e);
        }
    };
    reporter.info(&format!("\n{}", indent(&result.summary)));

    Ok(())
}
