//! Format signatures and magic numbers.
//!
//! Consolidates the archive signatures, short tail markers, end-of-format
//! markers and container header/footer magic used by the analyzers.

/// An archive signature with the weight it carries when found in tail data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArchiveSignature {
    pub magic: &'static [u8],
    pub label: &'static str,
    pub weight: f64,
}

/// Embedded-archive signatures, searched across the whole stream.
pub const ARCHIVE_SIGNATURES: &[ArchiveSignature] = &[
    ArchiveSignature {
        magic: b"PK\x03\x04",
        label: "ZIP local header",
        weight: 0.45,
    },
    ArchiveSignature {
        magic: b"PK\x05\x06",
        label: "ZIP central directory",
        weight: 0.40,
    },
    ArchiveSignature {
        magic: b"PK\x07\x08",
        label: "ZIP data descriptor",
        weight: 0.40,
    },
    ArchiveSignature {
        magic: b"\x1F\x8B\x08",
        label: "GZIP stream",
        weight: 0.42,
    },
    ArchiveSignature {
        magic: b"BZh",
        label: "BZIP2 stream",
        weight: 0.35,
    },
    ArchiveSignature {
        magic: b"7z\xBC\xAF\x27\x1C",
        label: "7-Zip archive",
        weight: 0.35,
    },
];

/// Two-byte archive prefixes looked for only in the second half of a stream.
pub const TAIL_MARKERS: &[(&[u8], &str)] = &[
    (b"PK", "ZIP"),
    (b"\x1F\x8B", "GZIP"),
    (b"BZ", "BZIP2"),
];

/// Markers that terminate a container; anything after the last one is tail data.
pub const END_MARKERS: &[(&[u8], &str)] = &[
    (PNG_IEND_CHUNK, "PNG"),
    (JPEG_EOI, "JPEG"),
    (GIF_TRAILER, "GIF"),
    (b"%EOF", "PDF"),
];

/// Complete zero-length IEND chunk: length, type and CRC.
pub const PNG_IEND_CHUNK: &[u8] = b"\x00\x00\x00\x00IEND\xAEB`\x82";

/// Final eight bytes of a well-formed PNG: IEND type and its CRC.
pub const PNG_FOOTER: &[u8] = b"IEND\xAEB`\x82";

/// Leading bytes of the PNG signature checked by the structural validator.
pub const PNG_HEADER: &[u8] = b"\x89PNG";

pub const JPEG_SOI: &[u8] = b"\xFF\xD8";
pub const JPEG_EOI: &[u8] = b"\xFF\xD9";

pub const GIF87A: &[u8] = b"GIF87a";
pub const GIF89A: &[u8] = b"GIF89a";
pub const GIF_TRAILER: &[u8] = b"\x3B";
