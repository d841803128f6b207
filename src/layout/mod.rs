pub mod columns;
pub mod controller;
pub mod debounce;
pub mod engine;

pub use columns::{ColumnHeights, ColumnLayout};
pub use controller::GridController;
pub use debounce::ResizeSubscription;
pub use engine::{LayoutEngine, PassKind, PassOutcome, PassTicket};
