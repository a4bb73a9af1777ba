//! Human-readable byte counts
//!
//! Sizes are rounded *down* to the largest whole binary unit, so `1.9 MiB`
//! renders as `"1 MB"`. Build reports only need an order of magnitude.

const UNITS: [(u64, &str); 6] = [
    (1 << 60, "EB"),
    (1 << 50, "PB"),
    (1 << 40, "TB"),
    (1 << 30, "GB"),
    (1 << 20, "MB"),
    (1 << 10, "KB"),
];

/// Format a byte count using the largest binary unit that fits at least once.
///
/// # Examples
///
/// ```
/// # #[cfg(feature = "foundation")]
/// # {
/// use buildhound_common::utils::bytes::format_byte_count;
///
/// assert_eq!(format_byte_count(512), "512 bytes");
/// assert_eq!(format_byte_count(2_048), "2 KB");
/// assert_eq!(format_byte_count(5 * 1024 * 1024 + 17), "5 MB");
/// # }
/// ```
pub fn format_byte_count(size: u64) -> String {
    UNITS
        .iter()
        .find(|(unit, _)| size / unit > 0)
        .map_or_else(|| format!("{size} bytes"), |(unit, suffix)| format!("{} {suffix}", size / unit))
}
