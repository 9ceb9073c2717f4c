/// Input extensions handed to the encoder, without the leading dot.
pub const SUPPORTED_EXTENSIONS: [&str; 14] = [
    "flac", "m3u", "m3u8", "m4a", "m4b", "mp3", "ogg", "opus", "pls", "wav", "aac", "webm", "wma",
    "xspf",
];

/// Whether `extension` (no leading dot) belongs to the supported input set.
///
/// The match is exact; callers that want case-insensitive matching
/// lowercase first.
pub fn is_supported_extension(extension: &str) -> bool {
    SUPPORTED_EXTENSIONS.contains(&extension)
}
