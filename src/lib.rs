//! Column grid layout and full-screen viewer for photo collections.
//!
//! The grid packs photos of varying aspect ratio into equal-width columns,
//! always filling the shortest column next. The viewer navigates a series,
//! an author's photos or a whole view, with an optional continuous mode.

pub mod config;
pub mod display;
pub mod error;
pub mod layout;
pub mod metrics;
pub mod models;
pub mod scanner;
pub mod surface;
pub mod viewer;

pub use config::{GridConfig, NewItemPolicy, ViewerConfig};
pub use error::{FolioError, Result};
pub use layout::{GridController, PassOutcome};
pub use models::{LayoutSnapshot, PhotoId, PhotoItem, Placement};
pub use surface::{HeadlessSurface, HostSurface};
pub use viewer::{HostView, Viewer, ViewerState};
