//! Typography Analysis
//!
//! Derives a type system from rendered text samples:
//! - Font family ranking by element usage (top N)
//! - Size scale (distinct sizes ≥ 14px, largest first)
//! - Heading hierarchy from observed tags, falling back to the scale
//! - Line-height / letter-spacing / weight metrics
//! - Modular scale fitting against common ratios

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::TypographyConfig;
use crate::types::utils::{format_px, parse_px};
use crate::types::{ElementRef, TypographySample};

/// Candidate ratios, tried in this order (earlier ratios win ties)
pub const MODULAR_RATIOS: [f64; 7] = [1.125, 1.2, 1.25, 1.333, 1.414, 1.5, 1.618];

/// Named scale slots, assigned from the largest size down
pub const SCALE_SLOTS: [&str; 8] = ["xs", "sm", "base", "lg", "xl", "2xl", "3xl", "4xl"];

/// Generic family keywords that are not real font names
const GENERIC_FAMILIES: &[&str] = &[
    "serif",
    "sans-serif",
    "monospace",
    "cursive",
    "fantasy",
    "system-ui",
];

const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

const DEFAULT_FONT_FAMILY: &str = "system-ui";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FontFamily {
    pub name: String,
    /// Stack the family was first seen in, fallback order
    pub stack: Vec<String>,
    /// Not the first choice of that stack
    pub fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeScaleEntry {
    pub size: String,
    pub line_height: f64,
    pub font_family: String,
    pub font_weight: u16,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TypeHierarchy {
    pub h1: Option<String>,
    pub h2: Option<String>,
    pub h3: Option<String>,
    pub h4: Option<String>,
    pub h5: Option<String>,
    pub h6: Option<String>,
    pub body: String,
    pub small: String,
}

impl TypeHierarchy {
    pub fn headings(&self) -> [(&'static str, Option<&str>); 6] {
        [
            ("h1", self.h1.as_deref()),
            ("h2", self.h2.as_deref()),
            ("h3", self.h3.as_deref()),
            ("h4", self.h4.as_deref()),
            ("h5", self.h5.as_deref()),
            ("h6", self.h6.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypeMetrics {
    /// size → first observed line-height
    pub line_heights: IndexMap<String, String>,
    /// size → first observed non-`normal` letter-spacing
    pub letter_spacing: IndexMap<String, String>,
    pub font_weights: Vec<u16>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModularScale {
    pub ratio: f64,
    pub base_size: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TypographyAnalysis {
    pub scale: IndexMap<String, TypeScaleEntry>,
    pub fonts: Vec<FontFamily>,
    pub hierarchy: TypeHierarchy,
    pub metrics: TypeMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modular_scale: Option<ModularScale>,
}

impl TypographyAnalysis {
    /// Scale sizes in pixels, slot order
    pub fn scale_sizes(&self) -> Vec<f64> {
        self.scale
            .values()
            .filter_map(|entry| parse_px(&entry.size))
            .collect()
    }
}

/// Samples merged by exact (family, size, weight) key
struct FontGroup<'a> {
    family: &'a str,
    size: Option<f64>,
    weight: &'a str,
    line_height: &'a str,
    letter_spacing: &'a str,
    elements: Vec<&'a ElementRef>,
}

/// Split a CSS `font-family` value into concrete font names
pub fn parse_font_stack(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|name| name.trim().trim_matches(|c| c == '"' || c == '\'').trim())
        .filter(|name| !name.is_empty())
        .filter(|name| !GENERIC_FAMILIES.contains(&name.to_ascii_lowercase().as_str()))
        .map(str::to_string)
        .collect()
}

/// Numeric font weight (`bold` → 700, `normal` → 400)
pub fn parse_font_weight(value: &str) -> Option<u16> {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        "lighter" => Some(300),
        "bolder" => Some(800),
        other => other.parse::<f64>().ok().map(|w| w.round() as u16),
    }
}

/// Line height multiplier for a given font size
pub fn line_height_for(size: f64) -> f64 {
    match size {
        s if s <= 14.0 => 1.5,
        s if s <= 18.0 => 1.6,
        s if s <= 24.0 => 1.4,
        s if s <= 32.0 => 1.3,
        _ => 1.2,
    }
}

/// Fit a modular scale to a set of sizes.
///
/// Uses the smallest size as base and compares each candidate ratio's
/// generated scale (`round(base * ratio^i)`) elementwise. The best ratio is
/// returned if its similarity exceeds `min_similarity`; fewer than three
/// sizes never produce a scale.
pub fn detect_modular_scale(sizes: &[f64], min_similarity: f64) -> Option<ModularScale> {
    if sizes.len() < 3 {
        return None;
    }

    let mut sorted = sizes.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let base = sorted[0];

    let mut best: Option<(f64, f64)> = None;
    for ratio in MODULAR_RATIOS {
        let similarity = scale_similarity(&sorted, base, ratio);
        debug!("Modular ratio {} similarity {:.3}", ratio, similarity);
        if best.is_none_or(|(_, s)| similarity > s) {
            best = Some((ratio, similarity));
        }
    }

    best.filter(|(_, similarity)| *similarity > min_similarity)
        .map(|(ratio, _)| ModularScale {
            ratio,
            base_size: base,
        })
}

fn scale_similarity(actual: &[f64], base: f64, ratio: f64) -> f64 {
    let total: f64 = actual
        .iter()
        .enumerate()
        .map(|(i, &a)| {
            let generated = (base * ratio.powi(i as i32)).round();
            let max = a.max(generated);
            if max > 0.0 {
                (a - generated).abs() / max
            } else {
                0.0
            }
        })
        .sum();
    1.0 - total / actual.len() as f64
}

/// Typography analyzer
#[derive(Debug, Clone, Default)]
pub struct TypographyAnalyzer {
    config: TypographyConfig,
}

impl TypographyAnalyzer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: TypographyConfig) -> Self {
        Self { config }
    }

    /// Analyze rendered text samples
    pub fn analyze(&self, samples: &[TypographySample]) -> TypographyAnalysis {
        let groups = Self::group_samples(samples);

        let fonts = self.rank_families(&groups);
        let scale_sizes = self.scale_sizes(&groups);
        let hierarchy = self.hierarchy(&groups, &scale_sizes);
        let metrics = Self::metrics(&groups);
        let modular_scale =
            detect_modular_scale(&scale_sizes, self.config.modular_similarity_threshold);

        let family = fonts
            .first()
            .map(|f| f.name.clone())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

        let scale: IndexMap<String, TypeScaleEntry> = scale_sizes
            .iter()
            .zip(SCALE_SLOTS)
            .enumerate()
            .map(|(i, (&size, slot))| {
                (
                    slot.to_string(),
                    TypeScaleEntry {
                        size: format_px(size),
                        line_height: line_height_for(size),
                        font_family: family.clone(),
                        font_weight: if i < 3 { 700 } else { 400 },
                    },
                )
            })
            .collect();

        info!(
            "Typography: {} groups, {} families, {} scale sizes, modular scale {:?}",
            groups.len(),
            fonts.len(),
            scale.len(),
            modular_scale.map(|m| m.ratio)
        );

        TypographyAnalysis {
            scale,
            fonts,
            hierarchy,
            metrics,
            modular_scale,
        }
    }

    /// Merge samples by exact key, keeping only elements with rendered text
    fn group_samples(samples: &[TypographySample]) -> Vec<FontGroup<'_>> {
        let mut index: IndexMap<(&str, &str, &str), FontGroup<'_>> = IndexMap::new();

        for sample in samples {
            let texted: Vec<&ElementRef> =
                sample.elements.iter().filter(|e| e.has_text()).collect();
            if texted.is_empty() {
                continue;
            }

            let key = (
                sample.font_family.as_str(),
                sample.font_size.as_str(),
                sample.font_weight.as_str(),
            );
            index
                .entry(key)
                .or_insert_with(|| FontGroup {
                    family: &sample.font_family,
                    size: parse_px(&sample.font_size),
                    weight: &sample.font_weight,
                    line_height: &sample.line_height,
                    letter_spacing: &sample.letter_spacing,
                    elements: Vec::new(),
                })
                .elements
                .extend(texted);
        }

        index.into_values().collect()
    }

    fn rank_families(&self, groups: &[FontGroup<'_>]) -> Vec<FontFamily> {
        // name → (usage, first-seen stack, position in that stack)
        let mut usage: IndexMap<String, (usize, Vec<String>, usize)> = IndexMap::new();

        for group in groups {
            let stack = parse_font_stack(group.family);
            for (position, name) in stack.iter().enumerate() {
                usage
                    .entry(name.clone())
                    .or_insert_with(|| (0, stack.clone(), position))
                    .0 += group.elements.len();
            }
        }

        let mut ranked: Vec<(String, (usize, Vec<String>, usize))> = usage.into_iter().collect();
        ranked.sort_by(|a, b| b.1.0.cmp(&a.1.0));
        ranked
            .into_iter()
            .take(self.config.max_families)
            .map(|(name, (_, stack, position))| FontFamily {
                name,
                stack,
                fallback: position > 0,
            })
            .collect()
    }

    /// Distinct rounded sizes at or above the minimum, largest first
    fn scale_sizes(&self, groups: &[FontGroup<'_>]) -> Vec<f64> {
        let mut sizes: Vec<f64> = groups
            .iter()
            .filter_map(|g| g.size)
            .filter(|&s| s >= self.config.min_scale_size)
            .map(f64::round)
            .collect();
        sizes.sort_by(|a, b| b.total_cmp(a));
        sizes.dedup();
        sizes.truncate(self.config.max_scale_sizes);
        sizes
    }

    fn hierarchy(&self, groups: &[FontGroup<'_>], scale_sizes: &[f64]) -> TypeHierarchy {
        let mut headings: [Option<String>; 6] = Default::default();
        for (i, tag) in HEADING_TAGS.iter().enumerate() {
            let observed: Vec<f64> = groups
                .iter()
                .filter_map(|g| g.size.map(|size| (g, size)))
                .flat_map(|(g, size)| {
                    g.elements
                        .iter()
                        .filter(|e| e.tag_name.eq_ignore_ascii_case(tag))
                        .map(move |_| size)
                })
                .collect();

            headings[i] = if observed.is_empty() {
                scale_sizes.get(i).map(|&s| format_px(s))
            } else {
                let mean = observed.iter().sum::<f64>() / observed.len() as f64;
                Some(format_px(mean.round()))
            };
        }

        let mut body_sizes: Vec<f64> = groups
            .iter()
            .filter_map(|g| g.size)
            .map(f64::round)
            .filter(|&s| s <= self.config.body_max_size)
            .collect();
        body_sizes.sort_by(|a, b| b.total_cmp(a));
        body_sizes.dedup();

        let [h1, h2, h3, h4, h5, h6] = headings;
        TypeHierarchy {
            h1,
            h2,
            h3,
            h4,
            h5,
            h6,
            body: body_sizes
                .first()
                .map(|&s| format_px(s))
                .unwrap_or_else(|| "16px".to_string()),
            small: body_sizes
                .get(1)
                .map(|&s| format_px(s))
                .unwrap_or_else(|| "14px".to_string()),
        }
    }

    fn metrics(groups: &[FontGroup<'_>]) -> TypeMetrics {
        let mut metrics = TypeMetrics::default();
        let mut weights: Vec<u16> = Vec::new();

        for group in groups {
            if let Some(weight) = parse_font_weight(group.weight) {
                weights.push(weight);
            }

            let Some(size) = group.size else {
                continue;
            };
            let key = format_px(size.round());

            if !group.line_height.trim().is_empty() {
                metrics
                    .line_heights
                    .entry(key.clone())
                    .or_insert_with(|| group.line_height.to_string());
            }
            let spacing = group.letter_spacing.trim();
            if !spacing.is_empty() && !spacing.eq_ignore_ascii_case("normal") {
                metrics
                    .letter_spacing
                    .entry(key)
                    .or_insert_with(|| spacing.to_string());
            }
        }

        weights.sort_unstable();
        weights.dedup();
        metrics.font_weights = weights;
        metrics
    }
}
