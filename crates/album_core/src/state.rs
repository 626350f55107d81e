use crate::StopReason;

/// Fallback album title when the first post carries none.
pub const UNKNOWN_ALBUM: &str = "Unknown Album";
/// Fallback author name when the first post carries none.
pub const UNKNOWN_AUTHOR: &str = "Unknown User";

/// One album post as delivered by the listing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Post {
    pub title: String,
    pub content: String,
    /// Ordering key, doubles as the paging cursor.
    pub rank: Option<i64>,
    pub album_title: Option<String>,
    pub author_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub posts: Vec<Post>,
    pub has_more: bool,
}

/// Album title and author used to name the export file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetLabel {
    pub album_title: String,
    pub author_name: String,
}

impl TargetLabel {
    pub fn from_post(post: &Post) -> Self {
        Self {
            album_title: post
                .album_title
                .clone()
                .unwrap_or_else(|| UNKNOWN_ALBUM.to_string()),
            author_name: post
                .author_name
                .clone()
                .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Fetching,
    Finished(StopReason),
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagingState {
    phase: Phase,
    cursor: i64,
    label: Option<TargetLabel>,
    requests_issued: u32,
    pages_received: u32,
    posts_received: usize,
}

impl PagingState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Rank sent as `lastRank` on the next request.
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    pub fn label(&self) -> Option<&TargetLabel> {
        self.label.as_ref()
    }

    pub fn requests_issued(&self) -> u32 {
        self.requests_issued
    }

    pub fn pages_received(&self) -> u32 {
        self.pages_received
    }

    pub fn posts_received(&self) -> usize {
        self.posts_received
    }

    pub fn stop_reason(&self) -> Option<StopReason> {
        match self.phase {
            Phase::Finished(reason) => Some(reason),
            Phase::Idle | Phase::Fetching => None,
        }
    }

    pub(crate) fn start(&mut self) -> i64 {
        self.phase = Phase::Fetching;
        self.requests_issued += 1;
        self.cursor
    }

    pub(crate) fn next_request(&mut self) -> i64 {
        self.requests_issued += 1;
        self.cursor
    }

    pub(crate) fn finish(&mut self, reason: StopReason) {
        self.phase = Phase::Finished(reason);
    }

    /// Latches the label from the first post; returns it only on the first call.
    pub(crate) fn resolve_label(&mut self, first: &Post) -> Option<TargetLabel> {
        if self.label.is_some() {
            return None;
        }
        let label = TargetLabel::from_post(first);
        self.label = Some(label.clone());
        Some(label)
    }

    pub(crate) fn record_page(&mut self, posts: &[Post]) {
        self.pages_received += 1;
        self.posts_received += posts.len();
        // Posts without a rank leave the cursor where the last ranked post put it.
        for rank in posts.iter().filter_map(|post| post.rank) {
            self.cursor = rank;
        }
    }
}
