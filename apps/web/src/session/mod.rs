// Upload session: the per-visitor view state, the store that owns it, and the
// orchestration of a single analysis call against it.
// Store mutations happen in short critical sections; no lock is held across an await.

pub mod runner;
pub mod state;
pub mod store;

pub use runner::{begin_analysis, run_analysis};
pub use state::{NoticeLevel, Notification, UploadSession, ViewState};
pub use store::SessionStore;
