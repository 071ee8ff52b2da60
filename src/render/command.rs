//! Subprocess renderer driving the configured render command.
//!
//! One-shot mode runs the command to completion and reads the last
//! manifest line from stdout. Watch mode keeps the command running with
//! its watch arguments appended and streams one manifest per completed
//! render pass through an mpsc channel; non-manifest stdout lines are
//! treated as render-tool chatter and ignored.

use std::io::{BufRead, BufReader};
use std::process::{Command, Stdio};
use std::sync::mpsc;
use std::thread;

use image::GenericImageView;
use tracing::{debug, warn};

use super::{Manifest, Renderer};
use crate::config::{Config, RenderConfig};
use crate::error::{Result, VizError};
use crate::report::{Snapshot, SnapshotSet};

/// Renderer that shells out to the configured render command.
pub struct CommandRenderer {
    render: RenderConfig,
}

impl CommandRenderer {
    /// Creates a renderer from loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            render: config.render.clone(),
        }
    }
}

impl Renderer for CommandRenderer {
    fn render_once(&self, only: Option<&str>) -> Result<SnapshotSet> {
        debug!(command = %self.render.command, "running one-shot render");

        let output = Command::new(&self.render.command)
            .args(&self.render.args)
            .stdin(Stdio::null())
            .output()
            .map_err(|e| {
                VizError::Render(format!("failed to spawn {}: {e}", self.render.command))
            })?;

        if !output.status.success() {
            return Err(VizError::RenderCommandFailed {
                status: output.status.code().unwrap_or(-1),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let manifest = last_manifest(&stdout)?;
        load_snapshots(&manifest, only)
    }

    fn watch(&self, only: Option<&str>) -> Result<mpsc::Receiver<SnapshotSet>> {
        debug!(command = %self.render.command, "starting render watcher");

        let mut args = self.render.args.clone();
        args.extend(self.render.watch_args.iter().cloned());

        let mut child = Command::new(&self.render.command)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| {
                VizError::Render(format!("failed to spawn {}: {e}", self.render.command))
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| VizError::Render("failed to capture render output".to_string()))?;

        let only = only.map(str::to_string);
        let (tx, rx) = mpsc::channel();

        // Reader thread: one manifest line per completed render pass.
        // Dropping the receiver ends the watch; the child is reaped here.
        thread::spawn(move || {
            let reader = BufReader::new(stdout);
            for line in reader.lines() {
                let Ok(line) = line else { break };
                let Some(manifest) = parse_manifest_line(&line) else {
                    continue;
                };
                match load_snapshots(&manifest, only.as_deref()) {
                    Ok(snaps) => {
                        if tx.send(snaps).is_err() {
                            break;
                        }
                    }
                    Err(e) => warn!(error = %e, "skipping render pass"),
                }
            }
            let _ = child.kill();
            let _ = child.wait();
        });

        Ok(rx)
    }
}

/// Parses a stdout line as a manifest, ignoring anything else.
fn parse_manifest_line(line: &str) -> Option<Manifest> {
    let trimmed = line.trim();
    if !trimmed.starts_with('{') {
        return None;
    }
    serde_json::from_str(trimmed).ok()
}

/// Picks the last manifest from a one-shot run's stdout.
fn last_manifest(stdout: &str) -> Result<Manifest> {
    stdout
        .lines()
        .rev()
        .find_map(parse_manifest_line)
        .ok_or_else(|| {
            VizError::Manifest("render command produced no snapshot manifest".to_string())
        })
}

/// Loads snapshot files named by the manifest, applying the component
/// filter. Filtering matches the component name exactly.
fn load_snapshots(manifest: &Manifest, only: Option<&str>) -> Result<SnapshotSet> {
    manifest
        .snapshots
        .iter()
        .filter(|entry| only.is_none_or(|component| entry.component == component))
        .map(|entry| {
            let png = std::fs::read(&entry.path).map_err(|e| {
                if e.kind() == std::io::ErrorKind::NotFound {
                    VizError::SnapshotNotFound {
                        path: entry.path.display().to_string(),
                    }
                } else {
                    VizError::Io(e)
                }
            })?;

            let (width, height) = match (entry.width, entry.height) {
                (Some(w), Some(h)) => (w, h),
                _ => probe_dimensions(&png)?,
            };

            Ok(Snapshot {
                component: entry.component.clone(),
                variant: entry.variant.clone(),
                width,
                height,
                png,
            })
        })
        .collect()
}

/// Reads dimensions from PNG bytes when the manifest omits them.
fn probe_dimensions(png: &[u8]) -> Result<(u32, u32)> {
    let img = image::load_from_memory(png)
        .map_err(|e| VizError::Manifest(format!("unreadable snapshot image: {e}")))?;
    Ok(img.dimensions())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::Path;

    fn write_png(path: &Path, width: u32, height: u32) {
        let img = image::RgbImage::new(width, height);
        img.save(path).unwrap();
    }

    fn manifest_line(entries: &[(&str, &Path)]) -> String {
        let snapshots: Vec<serde_json::Value> = entries
            .iter()
            .map(|(component, path)| {
                serde_json::json!({
                    "component": component,
                    "path": path.display().to_string(),
                })
            })
            .collect();
        serde_json::json!({ "snapshots": snapshots }).to_string()
    }

    #[test]
    fn test_parse_manifest_line_ignores_chatter() {
        assert!(parse_manifest_line("webpack compiled in 300ms").is_none());
        assert!(parse_manifest_line("").is_none());
        assert!(parse_manifest_line("{\"not\": \"a manifest\"}").is_none());

        let parsed = parse_manifest_line(r#"{"snapshots": []}"#).unwrap();
        assert!(parsed.snapshots.is_empty());
    }

    #[test]
    fn test_last_manifest_picks_final_pass() {
        let stdout = "\
starting up
{\"snapshots\": [{\"component\": \"Old\", \"path\": \"/tmp/old.png\"}]}
recompiling
{\"snapshots\": []}
";
        let manifest = last_manifest(stdout).unwrap();
        assert!(manifest.snapshots.is_empty());
    }

    #[test]
    fn test_last_manifest_missing_is_error() {
        assert!(matches!(
            last_manifest("just logs\nno manifest here"),
            Err(VizError::Manifest(_))
        ));
    }

    #[test]
    fn test_load_snapshots_probes_dimensions() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("button.png");
        write_png(&png_path, 24, 16);

        let manifest: Manifest =
            serde_json::from_str(&manifest_line(&[("Button", &png_path)])).unwrap();
        let snaps = load_snapshots(&manifest, None).unwrap();

        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].component, "Button");
        assert_eq!(snaps[0].variant, "default");
        assert_eq!((snaps[0].width, snaps[0].height), (24, 16));
    }

    #[test]
    fn test_manifest_dimensions_skip_probe() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("raw.bin");
        let mut file = std::fs::File::create(&path).unwrap();
        file.write_all(b"not a png").unwrap();

        let manifest: Manifest = serde_json::from_str(&format!(
            r#"{{"snapshots": [{{"component": "Card", "variant": "hover",
                "path": "{}", "width": 100, "height": 50}}]}}"#,
            path.display()
        ))
        .unwrap();

        let snaps = load_snapshots(&manifest, None).unwrap();
        assert_eq!((snaps[0].width, snaps[0].height), (100, 50));
        assert_eq!(snaps[0].variant, "hover");
    }

    #[test]
    fn test_only_filter_matches_exactly() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.png");
        write_png(&a, 4, 4);
        write_png(&b, 4, 4);

        let manifest: Manifest =
            serde_json::from_str(&manifest_line(&[("Button", &a), ("ButtonGroup", &b)])).unwrap();

        let snaps = load_snapshots(&manifest, Some("Button")).unwrap();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].component, "Button");
    }

    #[test]
    fn test_missing_snapshot_file_is_typed_error() {
        let manifest: Manifest = serde_json::from_str(
            r#"{"snapshots": [{"component": "X", "path": "/nonexistent/x.png"}]}"#,
        )
        .unwrap();
        assert!(matches!(
            load_snapshots(&manifest, None),
            Err(VizError::SnapshotNotFound { .. })
        ));
    }

    fn shell_renderer(script: String, watch_args: Vec<String>) -> CommandRenderer {
        let config = Config {
            api_key: "k".to_string(),
            api_secret: "s".to_string(),
            endpoint: crate::config::DEFAULT_ENDPOINT.to_string(),
            project: None,
            render: RenderConfig {
                command: "sh".to_string(),
                args: vec!["-c".to_string(), script],
                watch_args,
            },
        };
        CommandRenderer::new(&config)
    }

    #[cfg(unix)]
    #[test]
    fn test_render_once_reads_command_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("nav.png");
        write_png(&png_path, 8, 8);
        let line = manifest_line(&[("Nav", &png_path)]);

        let renderer = shell_renderer(format!("echo rendering...; echo '{line}'"), Vec::new());
        let snaps = renderer.render_once(None).unwrap();
        assert_eq!(snaps.len(), 1);
        assert_eq!(snaps[0].component, "Nav");
    }

    #[cfg(unix)]
    #[test]
    fn test_render_once_failing_command() {
        let renderer = shell_renderer("exit 3".to_string(), Vec::new());
        assert!(matches!(
            renderer.render_once(None),
            Err(VizError::RenderCommandFailed { status: 3 })
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_watch_streams_one_set_per_manifest_line() {
        let dir = tempfile::tempdir().unwrap();
        let png_path = dir.path().join("w.png");
        write_png(&png_path, 4, 4);
        let line = manifest_line(&[("Widget", &png_path)]);

        let renderer =
            shell_renderer(format!("echo '{line}'; echo noise; echo '{line}'"), Vec::new());
        let rx = renderer.watch(None).unwrap();

        let sets: Vec<_> = rx.iter().collect();
        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0][0].component, "Widget");
    }
}
