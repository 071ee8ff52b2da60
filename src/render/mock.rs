//! Mock renderer for unit testing.
//!
//! Replays scripted snapshot sets: `render_once` pops one set per call,
//! `watch` drains everything queued into the channel and closes it,
//! which lets dev-loop tests run a bounded number of cycles.

use std::collections::VecDeque;
use std::sync::mpsc;
use std::sync::Mutex;

use super::Renderer;
use crate::error::{Result, VizError};
use crate::report::{Snapshot, SnapshotSet};

/// Scripted renderer.
#[derive(Default)]
pub struct MockRenderer {
    sets: Mutex<VecDeque<SnapshotSet>>,
    fail_once: Mutex<Option<String>>,
}

impl MockRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a snapshot set for the next render pass.
    pub fn queue_set(&self, set: SnapshotSet) {
        self.sets.lock().unwrap().push_back(set);
    }

    /// Fail the next `render_once` call with the given message.
    pub fn fail_next(&self, message: &str) {
        *self.fail_once.lock().unwrap() = Some(message.to_string());
    }
}

impl Renderer for MockRenderer {
    fn render_once(&self, _only: Option<&str>) -> Result<SnapshotSet> {
        if let Some(message) = self.fail_once.lock().unwrap().take() {
            return Err(VizError::Render(message));
        }
        Ok(self.sets.lock().unwrap().pop_front().unwrap_or_default())
    }

    fn watch(&self, _only: Option<&str>) -> Result<mpsc::Receiver<SnapshotSet>> {
        let (tx, rx) = mpsc::channel();
        for set in self.sets.lock().unwrap().drain(..) {
            // Receiver outlives this loop; a send cannot fail here.
            let _ = tx.send(set);
        }
        Ok(rx)
    }
}

/// Builds a single-snapshot set for tests.
#[must_use]
pub fn snapshot_set(component: &str) -> SnapshotSet {
    vec![Snapshot {
        component: component.to_string(),
        variant: "default".to_string(),
        width: 4,
        height: 4,
        png: vec![1, 2, 3, 4],
    }]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_once_pops_queued_sets() {
        let mock = MockRenderer::new();
        mock.queue_set(snapshot_set("A"));
        mock.queue_set(snapshot_set("B"));

        assert_eq!(mock.render_once(None).unwrap()[0].component, "A");
        assert_eq!(mock.render_once(None).unwrap()[0].component, "B");
        assert!(mock.render_once(None).unwrap().is_empty());
    }

    #[test]
    fn test_watch_drains_and_closes() {
        let mock = MockRenderer::new();
        mock.queue_set(snapshot_set("A"));
        mock.queue_set(snapshot_set("B"));

        let rx = mock.watch(None).unwrap();
        let sets: Vec<_> = rx.iter().collect();
        assert_eq!(sets.len(), 2);
    }

    #[test]
    fn test_scripted_failure() {
        let mock = MockRenderer::new();
        mock.fail_next("renderer exploded");
        assert!(mock.render_once(None).is_err());
        assert!(mock.render_once(None).is_ok());
    }
}
