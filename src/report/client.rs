//! Curl-backed client for the comparison service.
//!
//! All remote calls shell out to `curl`: JSON body on stdin, HTTP status
//! captured through `-w`, transport failures surfaced from curl's own
//! exit status. Keeping the client a thin subprocess wrapper keeps TLS
//! and proxy behavior identical to what the rest of the toolchain sees.

use std::io::Write;
use std::process::{Command, Stdio};

use base64::Engine;
use serde_json::{json, Value};
use tracing::debug;

use super::{ComparisonResult, ReportMeta, ReportService, Snapshot, Uploaded};
use crate::config::Config;
use crate::error::{Result, ResultExt, VizError};

/// Connection timeout passed to curl, in seconds. Response time is the
/// service's business; only connection establishment is bounded here.
const CONNECT_TIMEOUT_SECS: u64 = 15;

/// Report service client talking to the configured endpoint.
pub struct CurlReportClient {
    endpoint: String,
    api_key: String,
    api_secret: String,
}

impl CurlReportClient {
    /// Creates a client from loaded configuration.
    pub fn new(config: &Config) -> Self {
        Self {
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_secret: config.api_secret.clone(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.endpoint)
    }

    fn auth_header(&self) -> String {
        let token = base64::engine::general_purpose::STANDARD
            .encode(format!("{}:{}", self.api_key, self.api_secret));
        format!("Authorization: Basic {token}")
    }

    /// POSTs a JSON body and returns `(status, body)`.
    fn post_json(&self, url: &str, payload: &Value) -> Result<(u16, String)> {
        let timeout = CONNECT_TIMEOUT_SECS.to_string();
        let mut child = Command::new("curl")
            .args([
                "-s",
                "-S",
                "-X",
                "POST",
                url,
                "-H",
                "Content-Type: application/json",
                "-H",
                &self.auth_header(),
                "--data-binary",
                "@-",
                "--connect-timeout",
                &timeout,
                "-w",
                "\n%{http_code}",
            ])
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| VizError::Transport(format!("failed to spawn curl: {e}")))?;

        if let Some(mut stdin) = child.stdin.take() {
            let body = serde_json::to_vec(payload).with_context(|| "payload serialization")?;
            stdin.write_all(&body)?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VizError::Transport(stderr.trim().to_string()));
        }

        split_status(&String::from_utf8_lossy(&output.stdout))
    }

    /// Issues a HEAD request and returns the HTTP status code.
    fn head_status(&self, url: &str) -> Result<u16> {
        let timeout = CONNECT_TIMEOUT_SECS.to_string();
        let output = Command::new("curl")
            .args([
                "-s",
                "-o",
                "/dev/null",
                "-w",
                "%{http_code}",
                "-I",
                url,
                "-H",
                &self.auth_header(),
                "--connect-timeout",
                &timeout,
            ])
            .output()
            .map_err(|e| VizError::Transport(format!("failed to spawn curl: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VizError::Transport(stderr.trim().to_string()));
        }

        let status = String::from_utf8_lossy(&output.stdout);
        status
            .trim()
            .parse()
            .map_err(|_| VizError::Transport(format!("malformed curl status: {status}")))
    }
}

impl ReportService for CurlReportClient {
    fn upload(&self, sha: &str, snapshots: &[Snapshot], meta: &ReportMeta) -> Result<Uploaded> {
        let url = self.url(&format!("/api/reports/{sha}"));
        debug!(%sha, snapshots = snapshots.len(), "uploading report");

        let payload = build_upload_payload(sha, snapshots, meta);
        let (status, body) = self.post_json(&url, &payload)?;
        let body = ok_body(status, body)?;

        serde_json::from_str(&body)
            .map_err(|e| VizError::Upload(format!("unexpected service response: {e}")))
    }

    fn compare(&self, sha1: &str, sha2: &str, meta: &ReportMeta) -> Result<ComparisonResult> {
        let url = self.url(&format!("/api/reports/{sha1}/compare/{sha2}"));
        debug!(%sha1, %sha2, "requesting comparison");

        let payload = build_compare_payload(meta);
        let (status, body) = self.post_json(&url, &payload)?;
        let body = ok_body(status, body)?;

        serde_json::from_str(&body)
            .map_err(|e| VizError::Compare(format!("unexpected service response: {e}")))
    }

    fn exists(&self, sha: &str) -> Result<bool> {
        let url = self.url(&format!("/api/reports/{sha}"));
        let status = self.head_status(&url)?;
        exists_from_status(status)
    }
}

/// Builds the upload body: report metadata plus base64-encoded snapshots.
fn build_upload_payload(sha: &str, snapshots: &[Snapshot], meta: &ReportMeta) -> Value {
    let snaps: Vec<Value> = snapshots
        .iter()
        .map(|s| {
            json!({
                "component": s.component,
                "variant": s.variant,
                "width": s.width,
                "height": s.height,
                "png": base64::engine::general_purpose::STANDARD.encode(&s.png),
            })
        })
        .collect();

    let mut obj = serde_json::Map::new();
    obj.insert("sha".to_string(), json!(sha));
    if let Some(project) = &meta.project {
        obj.insert("project".to_string(), json!(project));
    }
    if let Some(link) = &meta.link {
        obj.insert("link".to_string(), json!(link));
    }
    if let Some(message) = &meta.message {
        obj.insert("message".to_string(), json!(message));
    }
    obj.insert("snaps".to_string(), Value::Array(snaps));
    Value::Object(obj)
}

/// Builds the comparison body from forwarded metadata.
fn build_compare_payload(meta: &ReportMeta) -> Value {
    let mut obj = serde_json::Map::new();
    if let Some(link) = &meta.link {
        obj.insert("link".to_string(), json!(link));
    }
    if let Some(message) = &meta.message {
        obj.insert("message".to_string(), json!(message));
    }
    if let Some(author) = &meta.author {
        obj.insert("author".to_string(), json!(author));
    }
    Value::Object(obj)
}

/// Splits curl output produced with `-w "\n%{http_code}"` into body and
/// status code.
fn split_status(raw: &str) -> Result<(u16, String)> {
    let Some((body, status_line)) = raw.rsplit_once('\n') else {
        return Err(VizError::Transport(format!("malformed curl output: {raw}")));
    };
    let status = status_line
        .trim()
        .parse()
        .map_err(|_| VizError::Transport(format!("malformed curl status: {status_line}")))?;
    Ok((status, body.to_string()))
}

/// Maps an HTTP status onto the response body or a typed error.
fn ok_body(status: u16, body: String) -> Result<String> {
    if (200..300).contains(&status) {
        Ok(body)
    } else {
        Err(VizError::Http {
            status,
            body: body.trim().to_string(),
        })
    }
}

/// Maps a HEAD status onto report existence.
fn exists_from_status(status: u16) -> Result<bool> {
    match status {
        200..=299 => Ok(true),
        404 => Ok(false),
        other => Err(VizError::Http {
            status: other,
            body: String::new(),
        }),
    }
}
