//! Human-readable file sizes for the listing page.

const UNITS: [&str; 3] = ["kB", "MB", "GB"];

/// Formats a byte count with two decimals.
///
/// Divides by 1024 only while the current value is strictly greater than
/// 1024, so exactly 1024 stays in the lower unit. Never goes past GB.
pub fn format_size(bytes: u64) -> String {
    let mut value = bytes as f64;
    let mut unit = "bytes";

    for name in UNITS {
        if value > 1024.0 {
            value /= 1024.0;
            unit = name;
        } else {
            break;
        }
    }

    format!("{value:.2} {unit}")
}
