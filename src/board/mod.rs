//! Drag and drop of tasks between the state columns.

mod error;
mod sync;
mod view;

pub use error::SyncError;
pub use sync::{BoardSynchronizer, Transition, TransitionOutcome};
pub use view::Board;
