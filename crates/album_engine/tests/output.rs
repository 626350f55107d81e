use std::fs;

use album_engine::{
    ensure_output_dir, export_filename, render_post, sanitize_filename, ExportTarget, Post,
    TargetLabel, TocFormat,
};
use pretty_assertions::assert_eq;
use tempfile::TempDir;

fn label(album: &str, author: &str) -> TargetLabel {
    TargetLabel {
        album_title: album.to_string(),
        author_name: author.to_string(),
    }
}

#[test]
fn filename_joins_album_and_author() {
    assert_eq!(export_filename(&label("Album", "Author")), "Album-Author.txt");
}

#[test]
fn filename_has_no_forbidden_characters() {
    let name = export_filename(&label("A/B:C", "D\"E"));
    assert_eq!(name, "A_B_C-D_E.txt");
    assert!(!name.contains(['<', '>', ':', '"', '/', '\\', '|', '?', '*']));
}

#[test]
fn sanitize_replaces_each_forbidden_character() {
    assert_eq!(sanitize_filename(r#"<>:"/\|?*"#), "_________");
    assert_eq!(sanitize_filename("plain name.txt"), "plain name.txt");
    assert_eq!(sanitize_filename("日本語"), "日本語");
}

#[test]
fn post_renders_heading_content_and_separator() {
    let post = Post {
        title: "Hello".to_string(),
        content: "line one\nline two".to_string(),
        ..Post::default()
    };
    assert_eq!(render_post(&post, TocFormat::Markdown), "## Hello\n\nline one\nline two\n\n\n");
}

#[test]
fn empty_post_still_renders_heading() {
    assert_eq!(render_post(&Post::default(), TocFormat::Markdown), "## \n\n\n\n\n");
}

#[test]
fn chapter_number_heading_uses_rank() {
    let post = Post {
        title: "Hello".to_string(),
        content: "body".to_string(),
        rank: Some(12),
        ..Post::default()
    };
    assert_eq!(
        render_post(&post, TocFormat::ChapterNumber),
        "12. Hello\n\nbody\n\n\n"
    );
}

#[test]
fn chapter_number_heading_without_rank_keeps_title() {
    let post = Post {
        title: "Loose".to_string(),
        content: "body".to_string(),
        ..Post::default()
    };
    assert_eq!(
        render_post(&post, TocFormat::ChapterNumber),
        ". Loose\n\nbody\n\n\n"
    );
}

#[test]
fn toc_format_names_parse_case_insensitively() {
    assert_eq!(TocFormat::parse("markdown"), Some(TocFormat::Markdown));
    assert_eq!(TocFormat::parse(" Chapter_Number "), Some(TocFormat::ChapterNumber));
    assert_eq!(TocFormat::parse("html"), None);
    assert_eq!(TocFormat::default(), TocFormat::Markdown);
}

#[test]
fn chapter_number_target_writes_numbered_headings() {
    let temp = TempDir::new().unwrap();
    let mut target =
        ExportTarget::create(temp.path(), "album.txt", TocFormat::ChapterNumber).unwrap();
    let post = Post {
        title: "Start".to_string(),
        content: "x".to_string(),
        rank: Some(1),
        ..Post::default()
    };
    target.append_post(&post).unwrap();
    target.sync().unwrap();

    assert_eq!(
        fs::read_to_string(target.path()).unwrap(),
        "1. Start\n\nx\n\n\n"
    );
}

#[test]
fn creates_missing_output_dir() {
    let temp = TempDir::new().unwrap();
    let new_dir = temp.path().join("out").join("nested");
    assert!(!new_dir.exists());
    ensure_output_dir(&new_dir).unwrap();
    assert!(new_dir.is_dir());
    assert_eq!(fs::read_dir(&new_dir).unwrap().count(), 0);
}

#[test]
fn output_dir_that_is_a_file_is_rejected() {
    let temp = TempDir::new().unwrap();
    let file_path = temp.path().join("not_a_dir");
    fs::write(&file_path, "x").unwrap();
    assert!(ensure_output_dir(&file_path).is_err());
}

#[test]
fn target_truncates_then_appends() {
    let temp = TempDir::new().unwrap();
    fs::write(temp.path().join("album.txt"), "old").unwrap();

    let mut target = ExportTarget::create(temp.path(), "album.txt", TocFormat::Markdown).unwrap();
    assert_eq!(fs::read_to_string(target.path()).unwrap(), "");

    let first = Post {
        title: "1".to_string(),
        content: "a".to_string(),
        ..Post::default()
    };
    let second = Post {
        title: "2".to_string(),
        content: "b".to_string(),
        ..Post::default()
    };
    target.append_post(&first).unwrap();
    target.append_post(&second).unwrap();
    target.sync().unwrap();

    assert_eq!(
        fs::read_to_string(target.path()).unwrap(),
        "## 1\n\na\n\n\n## 2\n\nb\n\n\n"
    );
}
