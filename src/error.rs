//! Error types for visual-regression CLI operations.

use thiserror::Error;

/// Primary error type for vizreg operations.
#[derive(Error, Debug)]
pub enum VizError {
    // Configuration errors
    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: String },

    #[error("Configuration parse error: {0}")]
    ConfigParse(String),

    #[error("Missing API credentials (api_key / api_secret)")]
    MissingCredentials,

    // Render errors
    #[error("Render failed: {0}")]
    Render(String),

    #[error("Render command exited with status {status}")]
    RenderCommandFailed { status: i32 },

    #[error("Invalid snapshot manifest: {0}")]
    Manifest(String),

    #[error("Snapshot file not found: {path}")]
    SnapshotNotFound { path: String },

    // Remote service errors
    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Comparison failed: {0}")]
    Compare(String),

    #[error("Service returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("Failed to reach service: {0}")]
    Transport(String),

    // General errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Other(String),
}

impl VizError {
    /// Returns true if the error is recoverable by the user.
    pub const fn is_user_recoverable(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigParse(_)
                | Self::MissingCredentials
                | Self::SnapshotNotFound { .. }
        )
    }

    /// Returns a suggestion for how to fix the error.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            Self::ConfigNotFound { .. } => Some("Create .vizreg.toml or pass --config <path>"),
            Self::MissingCredentials => {
                Some("Set api_key/api_secret in the config file or VIZREG_API_KEY/VIZREG_API_SECRET")
            }
            Self::Transport(_) => Some("Check the endpoint URL and your network connection"),
            Self::RenderCommandFailed { .. } => {
                Some("Run the render command directly to see its output")
            }
            _ => None,
        }
    }
}

/// Convenience type alias for Results using VizError.
pub type Result<T> = std::result::Result<T, VizError>;

/// Extension trait for adding context to errors.
pub trait ResultExt<T> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>;
}

impl<T, E: std::error::Error> ResultExt<T> for std::result::Result<T, E> {
    fn with_context<F, S>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> S,
        S: Into<String>,
    {
        self.map_err(|e| VizError::Other(format!("{}: {e}", f().into())))
    }
}
