//! Shared utility functions for CSS value parsing and formatting.
//!
//! ## CSS Length Helpers
//!
//! Computed styles arrive as strings (`"16px"`, `"8px 16px"`, `"normal"`).
//! - `parse_px` - Parse a single length into pixels
//! - `extract_px_values` - Pull every pixel length out of a shorthand value
//! - `format_px` - Render a pixel value without trailing `.0`

use std::sync::LazyLock;

use regex::Regex;

static PX_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(-?\d+(?:\.\d+)?)px").expect("pixel length pattern is valid")
});

// =============================================================================
// CSS Length Helpers
// =============================================================================

/// Parse a single CSS length (`"16px"`, `"16"`, `" 1.5px "`) into pixels.
///
/// Keywords such as `normal` or `auto` return `None`.
#[inline]
pub fn parse_px(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let number = trimmed.strip_suffix("px").unwrap_or(trimmed).trim();
    number.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Extract every `Npx` occurrence from a (possibly shorthand) CSS value.
pub fn extract_px_values(value: &str) -> Vec<f64> {
    PX_VALUE
        .captures_iter(value)
        .filter_map(|cap| cap.get(1)?.as_str().parse::<f64>().ok())
        .collect()
}

/// Format a pixel value, dropping the fraction when it is integral.
#[inline]
pub fn format_px(value: f64) -> String {
    if (value - value.round()).abs() < f64::EPSILON {
        format!("{}px", value.round() as i64)
    } else {
        format!("{}px", (value * 100.0).round() / 100.0)
    }
}

/// Sort floats ascending and drop exact duplicates.
pub fn sorted_unique(values: impl IntoIterator<Item = f64>) -> Vec<f64> {
    let mut values: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    values.sort_by(|a, b| a.total_cmp(b));
    values.dedup();
    values
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_px() {
        assert_eq!(parse_px("16px"), Some(16.0));
        assert_eq!(parse_px(" 1.5px "), Some(1.5));
        assert_eq!(parse_px("24"), Some(24.0));
        assert_eq!(parse_px("normal"), None);
        assert_eq!(parse_px(""), None);
    }

    #[test]
    fn test_extract_px_values() {
        assert_eq!(extract_px_values("8px 16px"), vec![8.0, 16.0]);
        assert_eq!(extract_px_values("0px auto"), vec![0.0]);
        assert_eq!(extract_px_values("calc(100% - 12.5px)"), vec![12.5]);
        assert!(extract_px_values("auto").is_empty());
    }

    #[test]
    fn test_format_px() {
        assert_eq!(format_px(16.0), "16px");
        assert_eq!(format_px(2.5), "2.5px");
    }

    #[test]
    fn test_sorted_unique() {
        assert_eq!(sorted_unique([8.0, 4.0, 8.0, 16.0]), vec![4.0, 8.0, 16.0]);
    }
}
