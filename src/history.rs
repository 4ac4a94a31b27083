pub mod restore;
pub mod snapshot;
pub mod store;


pub use restore::{rebuild, RestoreError, RestoreOutcome, RestoreState, Restorer};
pub use snapshot::{capture_state, PageSnapshot, Snapshot, TextBoxSnapshot};
pub use store::{HistoryStore, DEFAULT_MAX_ENTRIES};
