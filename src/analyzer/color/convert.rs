//! Color parsing and RGB/HSL/hex conversion.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

static RGB_FUNCTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^rgba?\(\s*(\d{1,3}(?:\.\d+)?)\s*,\s*(\d{1,3}(?:\.\d+)?)\s*,\s*(\d{1,3}(?:\.\d+)?)\s*(?:,\s*(\d*\.?\d+)(%?)\s*)?\)$",
    )
    .expect("rgb() pattern is valid")
});

/// Named colors recognised by the parser (lowercase)
const NAMED_COLORS: &[(&str, Rgb)] = &[
    ("black", Rgb::new(0, 0, 0)),
    ("white", Rgb::new(255, 255, 255)),
    ("red", Rgb::new(255, 0, 0)),
    ("green", Rgb::new(0, 128, 0)),
    ("blue", Rgb::new(0, 0, 255)),
    ("yellow", Rgb::new(255, 255, 0)),
    ("orange", Rgb::new(255, 165, 0)),
    ("purple", Rgb::new(128, 0, 128)),
    ("gray", Rgb::new(128, 128, 128)),
    ("grey", Rgb::new(128, 128, 128)),
    ("cyan", Rgb::new(0, 255, 255)),
    ("magenta", Rgb::new(255, 0, 255)),
    ("navy", Rgb::new(0, 0, 128)),
    ("teal", Rgb::new(0, 128, 128)),
    ("silver", Rgb::new(192, 192, 192)),
];

/// 8-bit sRGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Uppercase `#RRGGBB`
    pub fn to_hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }

    pub fn to_hsl(&self) -> Hsl {
        Hsl::from_rgb(*self)
    }

    /// WCAG 2.x relative luminance (0.0 - 1.0)
    pub fn relative_luminance(&self) -> f64 {
        fn channel(c: u8) -> f64 {
            let c = c as f64 / 255.0;
            if c <= 0.03928 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        0.2126 * channel(self.r) + 0.7152 * channel(self.g) + 0.0722 * channel(self.b)
    }

    /// Arithmetic mean of a set of colors, `None` when empty
    pub fn mean(colors: &[Rgb]) -> Option<Rgb> {
        if colors.is_empty() {
            return None;
        }
        let n = colors.len() as f64;
        let avg = |f: fn(&Rgb) -> u8| {
            (colors.iter().map(|c| f(c) as f64).sum::<f64>() / n).round() as u8
        };
        Some(Rgb::new(avg(|c| c.r), avg(|c| c.g), avg(|c| c.b)))
    }
}

/// HSL color with hue in degrees and saturation/lightness in percent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hsl {
    /// 0 - 360
    pub h: f64,
    /// 0 - 100
    pub s: f64,
    /// 0 - 100
    pub l: f64,
}

impl Hsl {
    pub const fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn from_rgb(rgb: Rgb) -> Self {
        let r = rgb.r as f64 / 255.0;
        let g = rgb.g as f64 / 255.0;
        let b = rgb.b as f64 / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        if max == min {
            return Self::new(0.0, 0.0, l * 100.0);
        }

        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };

        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };

        Self::new(h * 60.0, s * 100.0, l * 100.0)
    }

    pub fn to_rgb(&self) -> Rgb {
        let h = self.h.rem_euclid(360.0) / 360.0;
        let s = (self.s / 100.0).clamp(0.0, 1.0);
        let l = (self.l / 100.0).clamp(0.0, 1.0);

        if s == 0.0 {
            let v = (l * 255.0).round() as u8;
            return Rgb::new(v, v, v);
        }

        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;

        let to_byte = |t: f64| (hue_to_rgb(p, q, t) * 255.0).round() as u8;
        Rgb::new(
            to_byte(h + 1.0 / 3.0),
            to_byte(h),
            to_byte(h - 1.0 / 3.0),
        )
    }

    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }
    }
}

fn hue_to_rgb(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}

// =============================================================================
// Parsing
// =============================================================================

/// Parse a CSS color string. Hex, `rgb()`/`rgba()` and a small named table
/// are tried in that order; anything else (including fully transparent
/// colors) yields `None`.
pub fn parse_color(input: &str) -> Option<Rgb> {
    let value = input.trim();
    parse_hex(value)
        .or_else(|| parse_rgb_function(value))
        .or_else(|| parse_named(value))
}

fn parse_hex(value: &str) -> Option<Rgb> {
    let digits = value.strip_prefix('#')?;
    if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    match digits.len() {
        3 => {
            let mut channels = digits
                .chars()
                .map(|c| u8::from_str_radix(&format!("{c}{c}"), 16).ok());
            Some(Rgb::new(
                channels.next()??,
                channels.next()??,
                channels.next()??,
            ))
        }
        6 => {
            let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
            Some(Rgb::new(channel(0)?, channel(2)?, channel(4)?))
        }
        _ => None,
    }
}

fn parse_rgb_function(value: &str) -> Option<Rgb> {
    let caps = RGB_FUNCTION.captures(value)?;
    let channel = |i: usize| -> Option<u8> {
        let v: f64 = caps.get(i)?.as_str().parse().ok()?;
        (v <= 255.0).then(|| v.round() as u8)
    };

    if let Some(alpha) = caps.get(4) {
        let alpha: f64 = alpha.as_str().parse().ok()?;
        if alpha == 0.0 {
            return None;
        }
    }

    Some(Rgb::new(channel(1)?, channel(2)?, channel(3)?))
}

fn parse_named(value: &str) -> Option<Rgb> {
    let lower = value.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, rgb)| *rgb)
}

// =============================================================================
// Similarity
// =============================================================================

/// Circular hue distance in degrees (0 - 180)
pub fn hue_distance(a: f64, b: f64) -> f64 {
    let direct = (a - b).abs();
    direct.min(360.0 - direct)
}

/// Two colors are similar when hue (circular), saturation and lightness each
/// differ by at most `threshold`.
pub fn are_colors_similar(a: &Hsl, b: &Hsl, threshold: f64) -> bool {
    hue_distance(a.h, b.h) <= threshold
        && (a.s - b.s).abs() <= threshold
        && (a.l - b.l).abs() <= threshold
}
