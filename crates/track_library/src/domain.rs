/// Characters that are rejected by at least one of the filesystems tracks end up on
const ILLEGAL_FILENAME_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Turns a track title into a file stem by dropping characters that are not
/// allowed in file names. Whitespace and unicode are kept as-is.
pub fn sanitize_filename(title: &str) -> String {
    title
        .chars()
        .filter(|c| !ILLEGAL_FILENAME_CHARS.contains(c))
        .collect()
}
