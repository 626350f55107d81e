use crate::{Post, TargetLabel};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Request the next page, starting after `last_rank`.
    FetchPage { last_rank: i64 },
    /// Name and create the export file. Emitted at most once per run.
    ResolveTarget(TargetLabel),
    /// Append posts to the export file, in order.
    AppendPosts(Vec<Post>),
    /// Fixed politeness delay before the next request.
    Pause,
    /// The run is over.
    Finish(StopReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The last page reported no continuation.
    Exhausted,
    /// A page came back without posts.
    EmptyPage,
    /// A fetch, decode or write step failed; earlier output is kept.
    Failed,
}
