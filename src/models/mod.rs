pub mod photo_item;
pub mod placement;

pub use photo_item::*;
pub use placement::*;
