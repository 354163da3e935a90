//! Visual effect tokens: border radius, box shadow and layout primitives.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::types::utils::{extract_px_values, format_px};
use crate::types::{EffectSample, EffectTokens};

const RADIUS_SLOTS: [&str; 4] = ["sm", "md", "lg", "xl"];
const SHADOW_SLOTS: [&str; 4] = ["sm", "md", "lg", "xl"];

/// Radii at or above this are pill/circle shapes
const FULL_RADIUS: f64 = 999.0;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EffectsAnalysis {
    pub tokens: EffectTokens,
    /// `grid` / `flex` when those display modes are in use
    pub layout: IndexMap<String, String>,
}

/// Count occurrences, most frequent first (ties keep first appearance)
fn rank_by_frequency<T: PartialEq + Clone>(values: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| *v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts.into_iter().map(|(v, _)| v).collect()
}

/// Total extent of a shadow declaration, used to order shadows by size
fn shadow_extent(shadow: &str) -> f64 {
    extract_px_values(shadow).iter().map(|v| v.abs()).sum()
}

#[derive(Debug, Clone, Default)]
pub struct EffectsExtractor;

impl EffectsExtractor {
    pub fn new() -> Self {
        Self
    }

    pub fn extract(&self, samples: &[EffectSample]) -> EffectsAnalysis {
        let mut full = false;
        let radii = samples
            .iter()
            .filter_map(|s| s.border_radius.as_deref())
            .filter_map(|value| {
                if value.trim_end().ends_with('%') {
                    full |= value.trim().trim_end_matches('%').parse::<f64>().is_ok_and(|p| p >= 50.0);
                    return None;
                }
                let first = extract_px_values(value).into_iter().next()?;
                if first >= FULL_RADIUS {
                    full = true;
                    None
                } else {
                    (first > 0.0).then_some(first)
                }
            })
            .collect::<Vec<f64>>();

        let mut top_radii: Vec<f64> = rank_by_frequency(radii)
            .into_iter()
            .take(RADIUS_SLOTS.len())
            .collect();
        top_radii.sort_by(|a, b| a.total_cmp(b));

        let mut border_radius: IndexMap<String, String> = top_radii
            .iter()
            .zip(RADIUS_SLOTS)
            .map(|(&r, slot)| (format!("radius-{}", slot), format_px(r)))
            .collect();
        if full {
            border_radius.insert("radius-full".to_string(), "9999px".to_string());
        }

        let shadows = samples
            .iter()
            .filter_map(|s| s.box_shadow.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
            .map(str::to_string);
        let mut top_shadows: Vec<String> = rank_by_frequency(shadows)
            .into_iter()
            .take(SHADOW_SLOTS.len())
            .collect();
        top_shadows.sort_by(|a, b| shadow_extent(a).total_cmp(&shadow_extent(b)));

        let shadows: IndexMap<String, String> = top_shadows
            .into_iter()
            .zip(SHADOW_SLOTS)
            .map(|(shadow, slot)| (format!("shadow-{}", slot), shadow))
            .collect();

        let mut layout = IndexMap::new();
        for display in samples.iter().filter_map(|s| s.display.as_deref()) {
            match display.trim().to_ascii_lowercase().as_str() {
                "grid" | "inline-grid" => {
                    layout.entry("grid".to_string()).or_insert_with(|| "grid".to_string());
                }
                "flex" | "inline-flex" => {
                    layout.entry("flex".to_string()).or_insert_with(|| "flex".to_string());
                }
                _ => {}
            }
        }

        info!(
            "Effects: {} radius tokens, {} shadow tokens, layout {:?}",
            border_radius.len(),
            shadows.len(),
            layout.keys().collect::<Vec<_>>()
        );

        EffectsAnalysis {
            tokens: EffectTokens {
                border_radius,
                shadows,
            },
            layout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn radius(value: &str) -> EffectSample {
        EffectSample {
            border_radius: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn shadow(value: &str) -> EffectSample {
        EffectSample {
            box_shadow: Some(value.to_string()),
            ..Default::default()
        }
    }

    fn display(value: &str) -> EffectSample {
        EffectSample {
            display: Some(value.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_radius_tokens_ranked_then_sorted() {
        let samples = vec![
            radius("8px"),
            radius("8px"),
            radius("4px"),
            radius("16px 16px 0 0"),
            radius("2px"),
            radius("24px"),
            radius("0px"),
            radius("50%"),
        ];

        let tokens = EffectsExtractor::new().extract(&samples).tokens;
        // 8 is most frequent; 4, 16, 2 follow in appearance order, 24 is cut
        assert_eq!(tokens.border_radius["radius-sm"], "2px");
        assert_eq!(tokens.border_radius["radius-md"], "4px");
        assert_eq!(tokens.border_radius["radius-lg"], "8px");
        assert_eq!(tokens.border_radius["radius-xl"], "16px");
        assert_eq!(tokens.border_radius["radius-full"], "9999px");
        assert_eq!(tokens.border_radius.len(), 5);
    }

    #[test]
    fn test_shadow_tokens_ordered_by_extent() {
        let samples = vec![
            shadow("0 10px 30px rgba(0,0,0,0.2)"),
            shadow("none"),
            shadow("0 1px 2px rgba(0,0,0,0.1)"),
            shadow("0 1px 2px rgba(0,0,0,0.1)"),
        ];

        let tokens = EffectsExtractor::new().extract(&samples).tokens;
        assert_eq!(tokens.shadows.len(), 2);
        assert_eq!(tokens.shadows["shadow-sm"], "0 1px 2px rgba(0,0,0,0.1)");
        assert_eq!(tokens.shadows["shadow-md"], "0 10px 30px rgba(0,0,0,0.2)");
    }

    #[test]
    fn test_layout_tokens() {
        let samples = vec![display("block"), display("inline-flex"), display("grid"), display("flex")];
        let layout = EffectsExtractor::new().extract(&samples).layout;
        assert_eq!(layout.keys().collect::<Vec<_>>(), vec!["flex", "grid"]);
    }

    #[test]
    fn test_empty_input() {
        let analysis = EffectsExtractor::new().extract(&[]);
        assert!(analysis.tokens.is_empty());
        assert!(analysis.layout.is_empty());
    }
}
