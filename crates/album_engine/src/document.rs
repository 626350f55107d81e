use album_core::Post;

/// Heading style for each post in the export file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TocFormat {
    /// `## {title}`
    #[default]
    Markdown,
    /// `{rank}. {title}`, with an empty rank when the post has none.
    ChapterNumber,
}

impl TocFormat {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "markdown" => Some(Self::Markdown),
            "chapter_number" => Some(Self::ChapterNumber),
            _ => None,
        }
    }
}

/// Renders one post as its heading, a blank line, the raw content, then a blank separator line.
pub fn render_post(post: &Post, format: TocFormat) -> String {
    let heading = match format {
        TocFormat::Markdown => format!("## {}", post.title),
        TocFormat::ChapterNumber => {
            let rank = post.rank.map(|rank| rank.to_string()).unwrap_or_default();
            format!("{rank}. {}", post.title)
        }
    };
    format!("{heading}\n\n{content}\n\n\n", content = post.content)
}
