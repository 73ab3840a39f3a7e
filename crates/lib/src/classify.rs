//! # Format Classifier
//!
//! Decides whether a downloaded document can be sent to the analysis service.
//! The media type is sniffed from the file's leading bytes, falling back to the
//! file name's extension when the content matches no known signature.

use crate::{constants::SUPPORTED_MEDIA_TYPES, keys};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::debug;

/// Enough bytes to cover every signature in `SIGNATURES`.
const SNIFF_LEN: u64 = 16;

/// Magic-byte signatures, checked in order.
const SIGNATURES: &[(&[u8], &str)] = &[
    (b"\x89PNG\r\n\x1a\n", "image/png"),
    (b"\xFF\xD8\xFF", "image/jpeg"),
    (b"II*\x00", "image/tiff"),
    (b"MM\x00*", "image/tiff"),
    (b"%PDF-", "application/pdf"),
    (b"GIF87a", "image/gif"),
    (b"GIF89a", "image/gif"),
    (b"BM", "image/bmp"),
    (b"PK\x03\x04", "application/zip"),
];

/// The standard extension table, used when sniffing is inconclusive.
const EXTENSIONS: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("jpe", "image/jpeg"),
    ("tif", "image/tiff"),
    ("tiff", "image/tiff"),
    ("pdf", "application/pdf"),
    ("gif", "image/gif"),
    ("bmp", "image/bmp"),
    ("webp", "image/webp"),
    ("txt", "text/plain"),
    ("html", "text/html"),
    ("htm", "text/html"),
    ("json", "application/json"),
    ("csv", "text/csv"),
    ("xml", "application/xml"),
    ("zip", "application/zip"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
];

/// The outcome of classifying one fetched document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    /// Whether the detected media type is one the analysis service accepts.
    pub is_supported: bool,
    /// The object key's suffix, e.g. `.pdf`. Reported as-is even when it
    /// disagrees with the detected media type.
    pub file_extension: String,
    /// The detected media type, if any.
    pub media_type: Option<&'static str>,
}

/// Classifies a fetched file. Never fails: unreadable or unrecognised files are
/// simply unsupported.
pub fn classify(fetched_file: &Path, object_key: &str) -> ClassificationResult {
    let media_type = detect_media_type(fetched_file);
    let is_supported = media_type.is_some_and(|m| SUPPORTED_MEDIA_TYPES.contains(&m));
    debug!(
        path = %fetched_file.display(),
        ?media_type,
        is_supported,
        "Classified fetched document"
    );

    ClassificationResult {
        is_supported,
        file_extension: keys::extension(object_key).to_string(),
        media_type,
    }
}

/// Detects the media type of a file on disk.
pub fn detect_media_type(path: &Path) -> Option<&'static str> {
    let mut header = Vec::with_capacity(SNIFF_LEN as usize);
    let file = File::open(path).ok()?;
    file.take(SNIFF_LEN).read_to_end(&mut header).ok()?;

    sniff(&header).or_else(|| guess_from_extension(path))
}

/// Matches leading bytes against known signatures.
pub fn sniff(header: &[u8]) -> Option<&'static str> {
    if header.len() >= 12 && &header[..4] == b"RIFF" && &header[8..12] == b"WEBP" {
        return Some("image/webp");
    }
    SIGNATURES
        .iter()
        .find(|(magic, _)| header.starts_with(magic))
        .map(|(_, media_type)| *media_type)
}

fn guess_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    EXTENSIONS
        .iter()
        .find(|(candidate, _)| *candidate == ext)
        .map(|(_, media_type)| *media_type)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_signatures() {
        assert_eq!(sniff(b"\x89PNG\r\n\x1a\n\0\0"), Some("image/png"));
        assert_eq!(sniff(b"\xFF\xD8\xFF\xE0"), Some("image/jpeg"));
        assert_eq!(sniff(b"II*\x00\x08"), Some("image/tiff"));
        assert_eq!(sniff(b"MM\x00*\x00"), Some("image/tiff"));
        assert_eq!(sniff(b"%PDF-1.7\n"), Some("application/pdf"));
        assert_eq!(sniff(b"GIF89a\x01\x00"), Some("image/gif"));
        assert_eq!(sniff(b"RIFF\0\0\0\0WEBPVP8 "), Some("image/webp"));
        assert_eq!(sniff(b"hello world"), None);
        assert_eq!(sniff(b""), None);
    }
}
