use album_core::TargetLabel;

/// Export filename for an album: `{album_title}-{author_name}.txt`, made filesystem-safe.
pub fn export_filename(label: &TargetLabel) -> String {
    sanitize_filename(&format!("{}-{}.txt", label.album_title, label.author_name))
}

/// Replaces every character that Windows forbids in file names with `_`.
pub fn sanitize_filename(input: &str) -> String {
    input
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect()
}

fn is_forbidden(c: char) -> bool {
    matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*')
}
