use thiserror::Error;

/// Errors surfaced by the grid and viewer components.
///
/// Per-item metric failures are never reported here; they resolve to a
/// fallback footprint instead.
#[derive(Debug, Error)]
pub enum FolioError {
    /// No container was available to lay out into.
    #[error("no rendering surface available for layout")]
    MissingSurface,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// The controller was torn down and can no longer lay out items.
    #[error("layout controller has been destroyed")]
    Destroyed,

    #[error("metrics task failed: {0}")]
    MetricsTask(String),
}

pub type Result<T> = std::result::Result<T, FolioError>;
