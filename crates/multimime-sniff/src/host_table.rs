//! The host's built-in extension table.
//!
//! One MIME type per key, with pipe-joined alternatives where the host groups
//! several extensions under one type.

use multimime_core::MimeTable;

const DEFAULT_ENTRIES: &[(&str, &str)] = &[
    // Images
    ("jpg|jpeg|jpe", "image/jpeg"),
    ("gif", "image/gif"),
    ("png", "image/png"),
    ("bmp", "image/bmp"),
    ("tiff|tif", "image/tiff"),
    ("webp", "image/webp"),
    ("avif", "image/avif"),
    ("ico", "image/x-icon"),
    ("heic", "image/heic"),
    // Video
    ("asf|asx", "video/x-ms-asf"),
    ("wmv", "video/x-ms-wmv"),
    ("avi", "video/avi"),
    ("mov|qt", "video/quicktime"),
    ("mpeg|mpg|mpe", "video/mpeg"),
    ("mp4|m4v", "video/mp4"),
    ("ogv", "video/ogg"),
    ("webm", "video/webm"),
    ("mkv", "video/x-matroska"),
    ("3gp|3gpp", "video/3gpp"),
    // Text
    ("txt|asc|c|cc|h|srt", "text/plain"),
    ("csv", "text/csv"),
    ("tsv", "text/tab-separated-values"),
    ("ics", "text/calendar"),
    ("rtx", "text/richtext"),
    ("vtt", "text/vtt"),
    // Audio
    ("mp3|m4a|m4b", "audio/mpeg"),
    ("aac", "audio/aac"),
    ("ra|ram", "audio/x-realaudio"),
    ("wav", "audio/wav"),
    ("ogg|oga", "audio/ogg"),
    ("flac", "audio/flac"),
    ("mid|midi", "audio/midi"),
    ("wma", "audio/x-ms-wma"),
    // Documents and archives
    ("rtf", "application/rtf"),
    ("pdf", "application/pdf"),
    ("tar", "application/x-tar"),
    ("zip", "application/zip"),
    ("gz|gzip", "application/x-gzip"),
    ("rar", "application/rar"),
    ("7z", "application/x-7z-compressed"),
    ("psd", "application/octet-stream"),
    ("xcf", "application/octet-stream"),
    ("doc", "application/msword"),
    ("pot|pps|ppt", "application/vnd.ms-powerpoint"),
    ("xla|xls|xlt|xlw", "application/vnd.ms-excel"),
    ("docx", "application/vnd.openxmlformats-officedocument.wordprocessingml.document"),
    ("xlsx", "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
    ("pptx", "application/vnd.openxmlformats-officedocument.presentationml.presentation"),
    ("odt", "application/vnd.oasis.opendocument.text"),
    ("ods", "application/vnd.oasis.opendocument.spreadsheet"),
    ("odp", "application/vnd.oasis.opendocument.presentation"),
    ("key", "application/vnd.apple.keynote"),
    ("numbers", "application/vnd.apple.numbers"),
    ("pages", "application/vnd.apple.pages"),
];

/// The host's default allow-list before any additional MIME types.
pub fn default_host_table() -> MimeTable {
    DEFAULT_ENTRIES.iter().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_table_lookups() {
        let table = default_host_table();
        assert_eq!(table.lookup("jpeg").map(|(_, m)| m), Some("image/jpeg"));
        assert_eq!(table.lookup("pdf").map(|(_, m)| m), Some("application/pdf"));
        assert_eq!(table.lookup("txt").map(|(_, m)| m), Some("text/plain"));
    }

    #[test]
    fn test_default_table_has_no_cad_or_json() {
        let table = default_host_table();
        assert!(table.lookup("dwg").is_none());
        assert!(table.lookup("json").is_none());
    }

    #[test]
    fn test_default_table_keys_are_unique() {
        assert_eq!(default_host_table().len(), DEFAULT_ENTRIES.len());
    }
}
