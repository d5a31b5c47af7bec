//! Human-readable formatting helpers shared by the views.

/// Format a byte count with binary units, e.g. `1536` -> `1.5 KB`.
pub fn format_bytes(bytes: u64) -> String {
    const UNIT: u64 = 1024;
    if bytes < UNIT {
        return format!("{} B", bytes);
    }

    let mut div = UNIT;
    let mut exp = 0;
    let mut n = bytes / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }
    let unit = b"KMGTPE"[exp] as char;
    format!("{:.1} {}B", bytes as f64 / div as f64, unit)
}

/// Shorten a path from the left, keeping its most specific tail.
pub fn truncate_path(path: &str, max_len: usize) -> String {
    let len = path.chars().count();
    if len <= max_len {
        return path.to_string();
    }
    if max_len < 10 {
        return path.chars().take(max_len).collect();
    }
    let tail: String = path.chars().skip(len - (max_len - 3)).collect();
    format!("...{}", tail)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(1023), "1023 B");
        assert_eq!(format_bytes(1536), "1.5 KB");
        assert_eq!(format_bytes(900 * 1024 * 1024), "900.0 MB");
        assert_eq!(format_bytes(3 * 1024 * 1024 * 1024 * 1024), "3.0 TB");
        assert_eq!(format_bytes(u64::MAX), "16.0 EB");
    }

    #[test]
    fn test_truncate_path() {
        assert_eq!(truncate_path("/dev/sda1", 20), "/dev/sda1");
        assert_eq!(truncate_path("/very/long/mount/point/here", 12), "...oint/here");
        assert_eq!(truncate_path("/abcdefgh", 4), "/abc");
    }
}
