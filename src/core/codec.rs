//! File name convention for managed files.
//!
//! Managed files are named `<title>-<id>.<ext>` where the identifier is
//! [`ID_LEN`] characters and the extension is [`EXTENSION`]. Decoding is
//! purely positional: the identifier is read at a fixed offset from the end
//! of the name and the `-` separator is not checked.

/// Length of an embedded identifier, in characters
pub const ID_LEN: usize = 11;

/// Extension of managed files, without the dot
pub const EXTENSION: &str = "mp3";

const EXT_LEN: usize = 3;

/// Shortest name that can carry an identifier: `-` + id + `.` + ext
pub const MIN_NAME_LEN: usize = ID_LEN + EXT_LEN + 2;

/// Build a file name from its parts
pub fn encode(title: &str, id: &str, extension: &str) -> String {
    format!("{}-{}.{}", title, id, extension)
}

/// Extract the embedded identifier from a file name.
///
/// Returns `None` only when the name is shorter than [`MIN_NAME_LEN`]
/// characters. Any longer name yields an [`ID_LEN`]-character slice, even if
/// it is not a real identifier.
pub fn decode(file_name: &str) -> Option<&str> {
    let offsets: Vec<usize> = file_name.char_indices().map(|(i, _)| i).collect();
    let len = offsets.len();
    if len < MIN_NAME_LEN {
        return None;
    }

    let start = offsets[len - (ID_LEN + EXT_LEN + 1)];
    let end = offsets[len - (EXT_LEN + 1)];
    Some(&file_name[start..end])
}

/// True when the file name carries the managed extension
pub fn has_managed_extension(file_name: &str) -> bool {
    file_name
        .strip_suffix(EXTENSION)
        .is_some_and(|rest| rest.ends_with('.'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_real_name() {
        assert_eq!(
            decode("Elton John Vs Pnau - Phoenix-nL_wHlldFns.mp3"),
            Some("nL_wHlldFns")
        );
    }

    #[test]
    fn test_decode_is_positional() {
        // No separator check: the slice is returned regardless.
        assert_eq!(decode("aaaaaaaaaaaaaaaa.mp3"), Some("aaaaaaaaaaa"));
    }

    #[test]
    fn test_decode_rejects_short_names() {
        assert_eq!(decode("short.mp3"), None);
        assert_eq!(decode("abc12345678.mp3"), None);
        assert_eq!(decode(""), None);
        assert_eq!(decode("-abc12345678.mp3"), Some("abc12345678"));
    }

    #[test]
    fn test_decode_counts_characters_not_bytes() {
        assert_eq!(decode("Café del Mar-xyz98765432.mp3"), Some("xyz98765432"));
        assert_eq!(decode("日本語-abc12345678.mp3"), Some("abc12345678"));
    }

    #[test]
    fn test_encode_decode_inverse() {
        for title in ["", "Song One", "a-b-c", "Ünïcödé ✓"] {
            let name = encode(title, "abc12345678", "mp3");
            assert_eq!(decode(&name), Some("abc12345678"));
        }
        assert_eq!(decode(&encode("Clip", "new00000001", "m4a")), Some("new00000001"));
    }

    #[test]
    fn test_encode_template() {
        assert_eq!(encode("%(title)s", "%(id)s", "%(ext)s"), "%(title)s-%(id)s.%(ext)s");
    }

    #[test]
    fn test_managed_extension() {
        assert!(has_managed_extension("Song-abc12345678.mp3"));
        assert!(!has_managed_extension("Song-abc12345678.mp3.part"));
        assert!(!has_managed_extension("notes.txt"));
        assert!(!has_managed_extension("mp3"));
        assert!(!has_managed_extension("Song.MP3"));
    }
}
