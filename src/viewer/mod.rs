//! Full-screen viewer over a governing collection of photos.
//!
//! - `context` - picks the governing collection on activation
//! - `session` - the open/single/continuous state machine
//! - `input` - key, click and gesture mapping

pub mod context;
pub mod input;
pub mod session;

pub use context::{select, ContextKind, HostView, NavigationContext, Selection};
pub use input::{DragTracker, HitRegion, Key, ViewerInput, ViewerIntent};
pub use session::{Viewer, ViewerAction, ViewerSession, ViewerState};
