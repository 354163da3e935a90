//! Spacing Detection
//!
//! Infers the spacing system from box-model samples:
//! - Base unit selection over fixed candidates (4, 8, 12, 16)
//! - Deterministic scale generated from the base unit
//! - Grid inference (gutter, container, breakpoints, columns)
//! - Usage buckets and consistency recommendations

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::SpacingConfig;
use crate::types::BoxModelSample;
use crate::types::utils::{extract_px_values, format_px, sorted_unique};

pub const BASE_CANDIDATES: [f64; 4] = [4.0, 8.0, 12.0, 16.0];

pub const PREFERRED_BASE: f64 = 8.0;

/// Scale multipliers applied to the base unit
pub const SCALE_MULTIPLIERS: [f64; 20] = [
    0.5, 1.0, 1.5, 2.0, 2.5, 3.0, 3.5, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0, 13.0, 14.0,
    15.0, 16.0,
];

pub const STANDARD_BREAKPOINTS: [(&str, f64); 5] = [
    ("sm", 640.0),
    ("md", 768.0),
    ("lg", 1024.0),
    ("xl", 1280.0),
    ("2xl", 1536.0),
];

const BREAKPOINT_TOLERANCE: f64 = 20.0;
const COLUMN_CANDIDATES: [u32; 5] = [2, 3, 4, 6, 12];
const GUTTER_RANGE: (f64, f64) = (8.0, 32.0);
const CONTAINER_RANGE: (f64, f64) = (600.0, 1600.0);
const LARGE_VALUE: f64 = 100.0;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacingSystem {
    pub base: f64,
    pub scale: Vec<f64>,
    /// `small` / `medium` / `large` / `xlarge` → distinct values
    pub usage: IndexMap<String, Vec<f64>>,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GridSystem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gutter: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoints: Option<IndexMap<String, String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SpacingAnalysis {
    /// Multiplier → px value, generated only from `recommended_base`
    pub scale: IndexMap<String, String>,
    pub system: SpacingSystem,
    pub grid: GridSystem,
    /// Distinct spacing values, ascending
    pub detected_values: Vec<f64>,
    pub recommended_base: f64,
}

fn is_spacing_property(name: &str) -> bool {
    let name = name.to_ascii_lowercase();
    name.contains("margin")
        || name.contains("padding")
        || name.contains("gap")
        || name.starts_with("inset")
}

fn is_exact_multiple(value: f64, base: f64) -> bool {
    let quotient = value / base;
    (quotient - quotient.round()).abs() < 1e-9
}

fn distance_to_multiple(value: f64, base: f64) -> f64 {
    let remainder = value.rem_euclid(base);
    remainder.min(base - remainder)
}

fn score_candidate(values: &[f64], candidate: f64) -> u32 {
    let mut exact = 0usize;
    let mut score = 0u32;
    for &value in values {
        if is_exact_multiple(value, candidate) {
            exact += 1;
            score += 2;
        } else if distance_to_multiple(value, candidate) <= 1.0 {
            score += 1;
        }
    }
    if exact as f64 / values.len() as f64 > 0.7 {
        score += 5;
    }
    score
}

/// Pick the base unit that best explains `values`.
///
/// Each candidate scores +2 per exact multiple, +1 per value within 1px of a
/// multiple, and +5 when more than 70% of values are exact multiples. Ties
/// resolve to 8 when it is among the best, otherwise to the smallest
/// candidate. Empty input yields 8.
pub fn determine_base_unit(values: &[f64]) -> f64 {
    if values.is_empty() {
        return PREFERRED_BASE;
    }

    let scores: Vec<(f64, u32)> = BASE_CANDIDATES
        .iter()
        .map(|&c| (c, score_candidate(values, c)))
        .collect();
    debug!("Base unit scores: {:?}", scores);

    let best = scores.iter().map(|(_, s)| *s).max().unwrap_or(0);
    let tied: Vec<f64> = scores
        .iter()
        .filter(|(_, s)| *s == best)
        .map(|(c, _)| *c)
        .collect();

    if tied.contains(&PREFERRED_BASE) {
        PREFERRED_BASE
    } else {
        tied.first().copied().unwrap_or(PREFERRED_BASE)
    }
}

/// Scale key for a multiplier (`0.5` → `"0.5"`, `2.0` → `"2"`)
fn multiplier_key(multiplier: f64) -> String {
    if multiplier.fract() == 0.0 {
        format!("{}", multiplier as i64)
    } else {
        format!("{}", multiplier)
    }
}

/// Generate the spacing scale from a base unit
pub fn generate_scale(base: f64) -> IndexMap<String, String> {
    SCALE_MULTIPLIERS
        .iter()
        .map(|&m| (multiplier_key(m), format_px(m * base)))
        .collect()
}

/// Spacing detector
#[derive(Debug, Clone, Default)]
pub struct SpacingDetector {
    config: SpacingConfig,
}

impl SpacingDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: SpacingConfig) -> Self {
        Self { config }
    }

    /// Analyze box-model samples
    pub fn detect(&self, samples: &[BoxModelSample]) -> SpacingAnalysis {
        let (spacing_values, layout_values) = self.collect_values(samples);
        let detected = sorted_unique(spacing_values.iter().copied());

        let base = determine_base_unit(&detected);
        let scale = generate_scale(base);
        let grid = Self::infer_grid(&spacing_values, &layout_values);
        let recommendations = self.recommendations(&detected, base);

        info!(
            "Spacing: {} distinct values, base {}px, {} recommendations",
            detected.len(),
            base,
            recommendations.len()
        );

        SpacingAnalysis {
            system: SpacingSystem {
                base,
                scale: SCALE_MULTIPLIERS.iter().map(|m| m * base).collect(),
                usage: Self::usage(&detected),
                recommendations,
            },
            scale,
            grid,
            detected_values: detected,
            recommended_base: base,
        }
    }

    /// Spacing values (with duplicates) and every positive layout length
    fn collect_values(&self, samples: &[BoxModelSample]) -> (Vec<f64>, Vec<f64>) {
        let mut spacing = Vec::new();
        let mut layout = Vec::new();

        for sample in samples {
            for (property, value) in &sample.properties {
                let lengths = extract_px_values(value);
                layout.extend(lengths.iter().copied().filter(|&v| v > 0.0));

                if is_spacing_property(property) {
                    spacing.extend(
                        lengths
                            .into_iter()
                            .filter(|&v| v > 0.0 && v <= self.config.max_value),
                    );
                }
            }
        }

        (spacing, layout)
    }

    fn infer_grid(spacing_values: &[f64], layout_values: &[f64]) -> GridSystem {
        let mut frequency: Vec<(f64, usize)> = Vec::new();
        for &value in spacing_values
            .iter()
            .filter(|&&v| (GUTTER_RANGE.0..=GUTTER_RANGE.1).contains(&v))
        {
            match frequency.iter_mut().find(|(v, _)| *v == value) {
                Some((_, count)) => *count += 1,
                None => frequency.push((value, 1)),
            }
        }
        let gutter = frequency
            .into_iter()
            .max_by(|a, b| a.1.cmp(&b.1).then(b.0.total_cmp(&a.0)))
            .map(|(value, _)| value);

        let container = layout_values
            .iter()
            .copied()
            .filter(|v| (CONTAINER_RANGE.0..=CONTAINER_RANGE.1).contains(v))
            .max_by(|a, b| a.total_cmp(b));

        let breakpoints: IndexMap<String, String> = STANDARD_BREAKPOINTS
            .iter()
            .filter(|(_, px)| {
                layout_values
                    .iter()
                    .any(|v| (v - px).abs() <= BREAKPOINT_TOLERANCE)
            })
            .map(|(name, px)| (name.to_string(), format_px(*px)))
            .collect();

        let columns = COLUMN_CANDIDATES.iter().copied().find(|&c| {
            let (min, max) = (f64::from(c) * 100.0, f64::from(c) * 300.0);
            layout_values.iter().any(|v| (min..=max).contains(v))
        });

        GridSystem {
            columns,
            gutter,
            container,
            breakpoints: (!breakpoints.is_empty()).then_some(breakpoints),
        }
    }

    fn usage(values: &[f64]) -> IndexMap<String, Vec<f64>> {
        let mut usage: IndexMap<String, Vec<f64>> = ["small", "medium", "large", "xlarge"]
            .iter()
            .map(|k| (k.to_string(), Vec::new()))
            .collect();

        for &value in values {
            let bucket = match value {
                v if v <= 8.0 => "small",
                v if v <= 32.0 => "medium",
                v if v <= 96.0 => "large",
                _ => "xlarge",
            };
            if let Some(list) = usage.get_mut(bucket) {
                list.push(value);
            }
        }
        usage
    }

    fn recommendations(&self, values: &[f64], base: f64) -> Vec<String> {
        let mut recommendations = Vec::new();
        let total = values.len();

        if total > self.config.max_distinct_values {
            recommendations.push(format!(
                "Consolidate spacing: {} distinct values found, aim for {} or fewer",
                total, self.config.max_distinct_values
            ));
        }

        if total > 0 {
            let exact = values.iter().filter(|&&v| is_exact_multiple(v, base)).count();
            let ratio = exact as f64 / total as f64;
            if ratio < 0.5 {
                recommendations.push(format!(
                    "Standardize spacing to multiples of {}: only {:.0}% of values align",
                    format_px(base),
                    ratio * 100.0
                ));
            }
        }

        if base != PREFERRED_BASE {
            recommendations.push(format!(
                "Consider an 8px base unit instead of {}",
                format_px(base)
            ));
        }

        if total > 0 {
            let large = values.iter().filter(|&&v| v > LARGE_VALUE).count();
            let ratio = large as f64 / total as f64;
            if ratio > 0.3 {
                recommendations.push(format!(
                    "Review large spacing values: {:.0}% exceed 100px",
                    ratio * 100.0
                ));
            }
        }

        recommendations
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn margins(values: &[&str]) -> Vec<BoxModelSample> {
        values
            .iter()
            .map(|v| BoxModelSample::new([("margin-top", *v)]))
            .collect()
    }

    #[test]
    fn test_reference_eight_point_scale() {
        let analysis = SpacingDetector::new().detect(&margins(&["8px", "16px", "24px", "32px", "40px"]));

        assert_eq!(analysis.recommended_base, 8.0);
        assert_eq!(analysis.detected_values, vec![8.0, 16.0, 24.0, 32.0, 40.0]);
        assert!(
            !analysis
                .system
                .recommendations
                .iter()
                .any(|r| r.starts_with("Standardize"))
        );
        assert!(analysis.system.recommendations.is_empty());
    }

    #[test]
    fn test_base_unit_determinism() {
        assert_eq!(determine_base_unit(&[]), 8.0);
        // 4, 8 and 16 all score 11; 8 wins the tie
        assert_eq!(determine_base_unit(&[16.0, 32.0, 48.0]), 8.0);
    }

    #[test]
    fn test_base_unit_prefers_smallest_without_eight() {
        // 4 and 12 tie at 11, 8 scores lower
        assert_eq!(score_candidate(&[12.0, 36.0, 60.0], 4.0), 11);
        assert_eq!(score_candidate(&[12.0, 36.0, 60.0], 12.0), 11);
        assert_eq!(determine_base_unit(&[12.0, 36.0, 60.0]), 4.0);
    }

    #[test]
    fn test_near_multiples_score() {
        // 15 and 17 are within 1px of 16 but not exact
        assert_eq!(score_candidate(&[15.0, 17.0], 8.0), 2);
        assert_eq!(score_candidate(&[15.0, 17.0], 4.0), 2);
    }

    #[test]
    fn test_scale_generated_from_base() {
        let scale = generate_scale(4.0);
        assert_eq!(scale.len(), 20);
        assert_eq!(scale["0.5"], "2px");
        assert_eq!(scale["1"], "4px");
        assert_eq!(scale["2.5"], "10px");
        assert_eq!(scale["16"], "64px");
    }

    #[test]
    fn test_spacing_filters_non_spacing_and_out_of_range() {
        let samples = vec![BoxModelSample::new([
            ("padding", "8px 16px"),
            ("width", "320px"),
            ("margin-bottom", "0px"),
            ("gap", "240px"),
            ("inset-inline-start", "12px"),
            ("row-gap", "normal"),
        ])];

        let analysis = SpacingDetector::new().detect(&samples);
        assert_eq!(analysis.detected_values, vec![8.0, 12.0, 16.0]);
    }

    #[test]
    fn test_empty_input_defaults() {
        let analysis = SpacingDetector::new().detect(&[]);
        assert_eq!(analysis.recommended_base, 8.0);
        assert!(analysis.detected_values.is_empty());
        assert_eq!(analysis.scale.len(), 20);
        assert!(analysis.system.recommendations.is_empty());
        assert_eq!(analysis.grid, GridSystem::default());
        assert!(analysis.system.usage.values().all(Vec::is_empty));
    }

    #[test]
    fn test_grid_inference() {
        let samples = vec![
            BoxModelSample::new([("max-width", "1200px"), ("padding-left", "24px")]),
            BoxModelSample::new([("width", "770px"), ("gap", "24px")]),
            BoxModelSample::new([("width", "380px"), ("gap", "16px")]),
            BoxModelSample::new([("min-width", "1030px"), ("margin", "16px 24px")]),
        ];

        let grid = SpacingDetector::new().detect(&samples).grid;
        assert_eq!(grid.gutter, Some(24.0));
        assert_eq!(grid.container, Some(1200.0));
        let breakpoints = grid.breakpoints.unwrap();
        assert_eq!(breakpoints.keys().collect::<Vec<_>>(), vec!["md", "lg"]);
        assert_eq!(breakpoints["md"], "768px");
        assert_eq!(grid.columns, Some(2));
    }

    #[test]
    fn test_gutter_tie_prefers_smallest() {
        let samples = margins(&["16px", "24px", "24px", "16px", "4px", "4px", "4px"]);
        let grid = SpacingDetector::new().detect(&samples).grid;
        assert_eq!(grid.gutter, Some(16.0));
    }

    #[test]
    fn test_usage_buckets() {
        let analysis = SpacingDetector::new().detect(&margins(&["4px", "8px", "24px", "64px", "120px"]));
        let usage = &analysis.system.usage;
        assert_eq!(usage["small"], vec![4.0, 8.0]);
        assert_eq!(usage["medium"], vec![24.0]);
        assert_eq!(usage["large"], vec![64.0]);
        assert_eq!(usage["xlarge"], vec![120.0]);
    }

    #[test]
    fn test_irregular_values_recommendations() {
        let values: Vec<String> = (0..25).map(|i| format!("{}px", 101 + i * 3)).collect();
        let refs: Vec<&str> = values.iter().map(String::as_str).collect();
        let recs = SpacingDetector::new().detect(&margins(&refs)).system.recommendations;

        assert!(recs.iter().any(|r| r.starts_with("Consolidate")));
        assert!(recs.iter().any(|r| r.starts_with("Standardize")));
        assert!(recs.iter().any(|r| r.starts_with("Review large")));
    }
}
