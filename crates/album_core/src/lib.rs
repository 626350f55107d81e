//! Album core: pure paging state machine for the album export run.
mod effect;
mod msg;
mod state;
mod update;

pub use effect::{Effect, StopReason};
pub use msg::Msg;
pub use state::{Page, PagingState, Phase, Post, TargetLabel, UNKNOWN_ALBUM, UNKNOWN_AUTHOR};
pub use update::update;
