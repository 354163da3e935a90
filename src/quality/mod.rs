//! Design Quality Scoring
//!
//! Seven-factor assessment of an extracted token set:
//! - color_consistency: semantic roles, neutral ramp, palette size
//! - typography_hierarchy: scale depth, family count, ordered sizes
//! - spacing_regularity: progression, 8px alignment, scale size
//! - accessibility_compliance: base colors, body size, focus color
//! - pattern_consistency: recognizable, confident UI patterns
//! - performance_optimization: font loading, token counts
//! - modernity_score: effects, modern layout, dark mode
//!
//! Every factor starts at 0.5, collects bonuses/penalties and is clamped to
//! [0, 1]. Also provides a markdown report and a one-line summary.

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::patterns::{PatternType, UiPattern};
use crate::types::utils::{parse_px, sorted_unique};
use crate::types::{DesignTokens, FontLoading};

const BASE_SCORE: f64 = 0.5;

/// Factors below this get a recommendation
pub const RECOMMENDATION_THRESHOLD: f64 = 0.7;

/// Relative weight of each factor in the overall score
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ScoreWeights {
    pub color_consistency: f64,
    pub typography_hierarchy: f64,
    pub spacing_regularity: f64,
    pub accessibility_compliance: f64,
    pub pattern_consistency: f64,
    pub performance_optimization: f64,
    pub modernity_score: f64,
}

impl Default for ScoreWeights {
    fn default() -> Self {
        Self {
            color_consistency: 0.15,
            typography_hierarchy: 0.15,
            spacing_regularity: 0.15,
            accessibility_compliance: 0.25,
            pattern_consistency: 0.10,
            performance_optimization: 0.10,
            modernity_score: 0.10,
        }
    }
}

impl ScoreWeights {
    fn as_array(&self) -> [f64; 7] {
        [
            self.color_consistency,
            self.typography_hierarchy,
            self.spacing_regularity,
            self.accessibility_compliance,
            self.pattern_consistency,
            self.performance_optimization,
            self.modernity_score,
        ]
    }

    pub fn total(&self) -> f64 {
        self.as_array().iter().sum()
    }
}

/// Individual factor scores (0.0 - 1.0)
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    pub color_consistency: f64,
    pub typography_hierarchy: f64,
    pub spacing_regularity: f64,
    pub accessibility_compliance: f64,
    pub pattern_consistency: f64,
    pub performance_optimization: f64,
    pub modernity_score: f64,
}

impl QualityBreakdown {
    /// (label, score, recommendation) in fixed order
    pub fn entries(&self) -> [(&'static str, f64, &'static str); 7] {
        [
            (
                "Color consistency",
                self.color_consistency,
                "Consolidate the color palette around primary, secondary and accent roles with a full neutral ramp",
            ),
            (
                "Typography hierarchy",
                self.typography_hierarchy,
                "Define a type scale of at least three ordered sizes using no more than three font families",
            ),
            (
                "Spacing regularity",
                self.spacing_regularity,
                "Adopt a regular spacing scale built on an 8px base unit",
            ),
            (
                "Accessibility compliance",
                self.accessibility_compliance,
                "Define primary and background colors, keep body text at 14px or larger and add a visible focus color",
            ),
            (
                "Pattern consistency",
                self.pattern_consistency,
                "Use recognizable UI patterns such as navigation, hero and form sections consistently",
            ),
            (
                "Performance optimization",
                self.performance_optimization,
                "Use non-blocking font loading and trim the number of color and spacing tokens",
            ),
            (
                "Modernity",
                self.modernity_score,
                "Introduce radius and shadow tokens, grid or flex layouts and a dark mode palette",
            ),
        ]
    }

    fn as_array(&self) -> [f64; 7] {
        [
            self.color_consistency,
            self.typography_hierarchy,
            self.spacing_regularity,
            self.accessibility_compliance,
            self.pattern_consistency,
            self.performance_optimization,
            self.modernity_score,
        ]
    }

    /// Weighted average, normalized by the weight sum
    pub fn weighted_average(&self, weights: &ScoreWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        let sum: f64 = self
            .as_array()
            .iter()
            .zip(weights.as_array())
            .map(|(score, weight)| score * weight)
            .sum();
        (sum / total).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct QualityScore {
    /// Overall weighted score (0.0 - 1.0)
    pub overall: f64,
    pub breakdown: QualityBreakdown,
    pub recommendations: Vec<String>,
}

impl QualityScore {
    /// Generate summary string
    pub fn summary(&self) -> String {
        let b = &self.breakdown;
        format!(
            "Quality: {:.1}% | Color: {:.0}% | Type: {:.0}% | Spacing: {:.0}% | A11y: {:.0}% | Patterns: {:.0}% | Perf: {:.0}% | Modern: {:.0}%",
            self.overall * 100.0,
            b.color_consistency * 100.0,
            b.typography_hierarchy * 100.0,
            b.spacing_regularity * 100.0,
            b.accessibility_compliance * 100.0,
            b.pattern_consistency * 100.0,
            b.performance_optimization * 100.0,
            b.modernity_score * 100.0
        )
    }

    /// Format as markdown report
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str("# Design Quality Report\n\n");
        md.push_str(&format!(
            "**Overall Score:** {:.1}%\n\n",
            self.overall * 100.0
        ));

        md.push_str("## Breakdown\n\n");
        md.push_str("| Factor | Score | Status |\n");
        md.push_str("|--------|-------|--------|\n");

        let status = |score: f64| {
            if score >= 0.8 {
                "✅ Good"
            } else if score >= 0.6 {
                "⚠️ Fair"
            } else {
                "❌ Needs Work"
            }
        };

        for (label, score, _) in self.breakdown.entries() {
            md.push_str(&format!(
                "| {} | {:.1}% | {} |\n",
                label,
                score * 100.0,
                status(score)
            ));
        }

        if !self.recommendations.is_empty() {
            md.push_str("\n## Recommendations\n\n");
            for (i, rec) in self.recommendations.iter().enumerate() {
                md.push_str(&format!("{}. {}\n", i + 1, rec));
            }
        }

        md
    }
}

/// Arithmetic: every step within 50% of the mean step
fn is_arithmetic(values: &[f64]) -> bool {
    let diffs: Vec<f64> = values.windows(2).map(|w| w[1] - w[0]).collect();
    if diffs.is_empty() {
        return false;
    }
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    mean > 0.0 && diffs.iter().all(|d| (d - mean).abs() < mean * 0.5)
}

/// Geometric: every ratio within 20% of the mean ratio
fn is_geometric(values: &[f64]) -> bool {
    if values.iter().any(|v| *v <= 0.0) {
        return false;
    }
    let ratios: Vec<f64> = values.windows(2).map(|w| w[1] / w[0]).collect();
    if ratios.is_empty() {
        return false;
    }
    let mean = ratios.iter().sum::<f64>() / ratios.len() as f64;
    ratios.iter().all(|r| (r - mean).abs() < mean * 0.2)
}

fn is_monotonic(values: &[f64]) -> bool {
    values.windows(2).all(|w| w[0] <= w[1]) || values.windows(2).all(|w| w[0] >= w[1])
}

fn is_multiple_of_eight(value: f64) -> bool {
    value > 0.0 && (value / 8.0).fract().abs() < 1e-9
}

/// Quality scorer
#[derive(Debug, Clone, Default)]
pub struct QualityScorer {
    weights: ScoreWeights,
}

impl QualityScorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_weights(weights: ScoreWeights) -> Self {
        Self { weights }
    }

    /// Score a token set together with the detected patterns
    pub fn calculate_score(&self, tokens: &DesignTokens, patterns: &[UiPattern]) -> QualityScore {
        let breakdown = QualityBreakdown {
            color_consistency: Self::color_consistency(tokens),
            typography_hierarchy: Self::typography_hierarchy(tokens),
            spacing_regularity: Self::spacing_regularity(tokens),
            accessibility_compliance: Self::accessibility_compliance(tokens),
            pattern_consistency: Self::pattern_consistency(patterns),
            performance_optimization: Self::performance_optimization(tokens),
            modernity_score: Self::modernity(tokens),
        };

        let overall = breakdown.weighted_average(&self.weights);
        let recommendations: Vec<String> = breakdown
            .entries()
            .iter()
            .filter(|(_, score, _)| *score < RECOMMENDATION_THRESHOLD)
            .map(|(_, _, rec)| rec.to_string())
            .collect();

        info!(
            "Quality: overall {:.2}, {} recommendations",
            overall,
            recommendations.len()
        );

        QualityScore {
            overall,
            breakdown,
            recommendations,
        }
    }

    fn color_consistency(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;
        let colors = &tokens.colors;

        if ["primary", "secondary", "accent"]
            .iter()
            .all(|role| colors.contains_key(*role))
        {
            score += 0.2;
        }
        if colors.keys().filter(|k| k.contains("neutral")).count() >= 5 {
            score += 0.15;
        }
        if colors.len() <= 10 {
            score += 0.1;
        } else if colors.len() > 15 {
            score -= 0.1;
        }

        score.clamp(0.0, 1.0)
    }

    fn typography_hierarchy(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;
        let sizes = tokens.typography.scale_sizes();

        if sizes.len() >= 3 {
            score += 0.2;
        }
        if tokens.typography.font_families.len() <= 3 {
            score += 0.15;
        }
        if is_monotonic(&sizes) {
            score += 0.15;
        }

        score.clamp(0.0, 1.0)
    }

    fn spacing_regularity(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;
        let values = sorted_unique(tokens.spacing.values().filter_map(|v| parse_px(v)));

        if is_arithmetic(&values) || is_geometric(&values) {
            score += 0.2;
        }
        if values.iter().any(|v| is_multiple_of_eight(*v)) {
            score += 0.15;
        }
        if (6..=12).contains(&values.len()) {
            score += 0.15;
        }

        score.clamp(0.0, 1.0)
    }

    fn accessibility_compliance(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;

        if tokens.colors.contains_key("primary") && tokens.colors.contains_key("background") {
            score += 0.2;
        }
        if tokens
            .typography
            .body_size
            .as_deref()
            .and_then(parse_px)
            .is_some_and(|size| size >= 14.0)
        {
            score += 0.15;
        }
        if tokens.colors.keys().any(|k| k.contains("focus")) {
            score += 0.15;
        }

        score.clamp(0.0, 1.0)
    }

    fn pattern_consistency(patterns: &[UiPattern]) -> f64 {
        let mut score = BASE_SCORE;

        let mut types: Vec<PatternType> = patterns.iter().map(|p| p.pattern_type).collect();
        types.sort_by_key(|t| t.as_str());
        types.dedup();

        if types.len() >= 3 {
            score += 0.15;
        }
        if patterns.iter().any(|p| p.confidence > 0.8) {
            score += 0.2;
        }
        if types.iter().any(|t| {
            matches!(
                t,
                PatternType::Navigation | PatternType::Hero | PatternType::Form
            )
        }) {
            score += 0.15;
        }

        score.clamp(0.0, 1.0)
    }

    fn performance_optimization(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;

        if tokens.typography.loading == Some(FontLoading::Optimized) {
            score += 0.15;
        }
        if tokens.colors.len() <= 12 {
            score += 0.15;
        }
        if tokens.spacing.len() <= 10 {
            score += 0.2;
        }

        score.clamp(0.0, 1.0)
    }

    fn modernity(tokens: &DesignTokens) -> f64 {
        let mut score = BASE_SCORE;

        if !tokens.effects.is_empty() {
            score += 0.15;
        }
        if tokens.has_modern_layout() {
            score += 0.15;
        }
        if tokens.dark_mode_colors.is_some() {
            score += 0.2;
        }

        score.clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorToken;
    use indexmap::IndexMap;
    use proptest::prelude::*;

    fn colors(names: &[&str]) -> IndexMap<String, ColorToken> {
        names
            .iter()
            .map(|n| (n.to_string(), ColorToken::new("#123456")))
            .collect()
    }

    fn px_map(values: &[f64]) -> IndexMap<String, String> {
        values
            .iter()
            .enumerate()
            .map(|(i, v)| (i.to_string(), format!("{}px", v)))
            .collect()
    }

    fn pattern(pattern_type: PatternType, confidence: f64) -> UiPattern {
        UiPattern {
            pattern_type,
            variant: "default".to_string(),
            confidence,
            selector: "x".to_string(),
            properties: IndexMap::new(),
            accessibility: Default::default(),
            content: Default::default(),
        }
    }

    #[test]
    fn test_empty_tokens_baseline() {
        let score = QualityScorer::new().calculate_score(&DesignTokens::default(), &[]);
        let b = score.breakdown;
        // only the small-palette bonus applies
        assert!((b.color_consistency - 0.6).abs() < 1e-9);
        // no sizes is trivially monotonic, 0 families ≤ 3
        assert!((b.typography_hierarchy - 0.8).abs() < 1e-9);
        assert!((b.spacing_regularity - 0.5).abs() < 1e-9);
        assert!((b.accessibility_compliance - 0.5).abs() < 1e-9);
        assert!((b.pattern_consistency - 0.5).abs() < 1e-9);
        assert!((b.performance_optimization - 0.85).abs() < 1e-9);
        assert!((b.modernity_score - 0.5).abs() < 1e-9);
        assert_eq!(score.recommendations.len(), 5);
        assert!(score.recommendations[0].starts_with("Consolidate the color palette"));
    }

    #[test]
    fn test_full_marks() {
        let mut tokens = DesignTokens {
            colors: colors(&[
                "primary",
                "secondary",
                "accent",
                "neutral-100",
                "neutral-200",
                "neutral-300",
                "neutral-400",
                "neutral-500",
                "background",
                "focus",
            ]),
            spacing: px_map(&[4.0, 8.0, 12.0, 16.0, 20.0, 24.0]),
            ..Default::default()
        };
        tokens.dark_mode_colors = Some(colors(&["primary"]));
        tokens.typography.scale = px_map(&[32.0, 24.0, 16.0]);
        tokens.typography.font_families = vec!["Inter".to_string()];
        tokens.typography.body_size = Some("16px".to_string());
        tokens.typography.loading = Some(FontLoading::Optimized);
        tokens
            .effects
            .border_radius
            .insert("radius-sm".to_string(), "4px".to_string());
        tokens.layout.insert("grid".to_string(), "grid".to_string());

        let patterns = vec![
            pattern(PatternType::Navigation, 1.0),
            pattern(PatternType::Hero, 0.9),
            pattern(PatternType::Footer, 0.75),
        ];

        let score = QualityScorer::new().calculate_score(&tokens, &patterns);
        let b = score.breakdown;
        assert!((b.color_consistency - 0.95).abs() < 1e-9);
        assert!((b.typography_hierarchy - 1.0).abs() < 1e-9);
        assert!((b.spacing_regularity - 1.0).abs() < 1e-9);
        assert!((b.accessibility_compliance - 1.0).abs() < 1e-9);
        assert!((b.pattern_consistency - 1.0).abs() < 1e-9);
        assert!((b.performance_optimization - 1.0).abs() < 1e-9);
        assert!((b.modernity_score - 1.0).abs() < 1e-9);
        assert!(score.recommendations.is_empty());
        assert!(score.overall > 0.99);
    }

    #[test]
    fn test_large_palette_penalty() {
        let names: Vec<String> = (0..16).map(|i| format!("c{}", i)).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let tokens = DesignTokens {
            colors: colors(&refs),
            ..Default::default()
        };
        let b = QualityScorer::new().calculate_score(&tokens, &[]).breakdown;
        assert!((b.color_consistency - 0.4).abs() < 1e-9);
        assert!((b.performance_optimization - 0.7).abs() < 1e-9);
    }

    #[test]
    fn test_progressions() {
        assert!(is_arithmetic(&[4.0, 8.0, 12.0, 16.0]));
        assert!(!is_arithmetic(&[4.0, 8.0, 40.0]));
        assert!(is_geometric(&[4.0, 8.0, 16.0, 32.0]));
        assert!(!is_geometric(&[4.0, 5.0, 40.0]));
        assert!(is_monotonic(&[48.0, 32.0, 16.0]));
        assert!(!is_monotonic(&[16.0, 32.0, 24.0]));
    }

    #[test]
    fn test_two_spacing_values_form_a_progression() {
        let tokens = DesignTokens {
            spacing: px_map(&[8.0, 16.0]),
            ..Default::default()
        };
        let b = QualityScorer::new().calculate_score(&tokens, &[]).breakdown;
        assert!((b.spacing_regularity - 0.85).abs() < 1e-9);

        // a single value has no step to measure
        let tokens = DesignTokens {
            spacing: px_map(&[8.0]),
            ..Default::default()
        };
        let b = QualityScorer::new().calculate_score(&tokens, &[]).breakdown;
        assert!((b.spacing_regularity - 0.65).abs() < 1e-9);
    }

    #[test]
    fn test_unsorted_scale_not_monotonic() {
        let mut tokens = DesignTokens::default();
        tokens.typography.scale = px_map(&[16.0, 32.0, 24.0]);
        let b = QualityScorer::new().calculate_score(&tokens, &[]).breakdown;
        assert!((b.typography_hierarchy - 0.85).abs() < 1e-9);
    }

    #[test]
    fn test_weighted_average_normalized() {
        let breakdown = QualityBreakdown {
            color_consistency: 1.0,
            typography_hierarchy: 1.0,
            spacing_regularity: 1.0,
            accessibility_compliance: 0.0,
            pattern_consistency: 1.0,
            performance_optimization: 1.0,
            modernity_score: 1.0,
        };
        assert!((breakdown.weighted_average(&ScoreWeights::default()) - 0.75).abs() < 1e-9);

        let doubled = ScoreWeights {
            accessibility_compliance: 0.5,
            ..ScoreWeights::default()
        };
        // 0.75 / 1.25
        assert!((breakdown.weighted_average(&doubled) - 0.6).abs() < 1e-9);
    }

    #[test]
    fn test_markdown_report() {
        let score = QualityScorer::new().calculate_score(&DesignTokens::default(), &[]);
        let md = score.to_markdown();
        assert!(md.starts_with("# Design Quality Report"));
        assert!(md.contains("| Accessibility compliance | 50.0% |"));
        assert!(md.contains("## Recommendations"));
        assert!(score.summary().starts_with("Quality: "));
    }

    fn arb_tokens() -> impl Strategy<Value = DesignTokens> {
        (
            0usize..30,
            0usize..20,
            prop::collection::vec(1.0f64..200.0, 0..25),
            prop::collection::vec(1.0f64..100.0, 0..10),
            0usize..6,
            any::<bool>(),
            any::<bool>(),
        )
            .prop_map(|(n_colors, n_neutral, spacing, sizes, n_fonts, dark, optimized)| {
                let mut names: Vec<String> = (0..n_colors).map(|i| format!("c{}", i)).collect();
                names.extend((0..n_neutral).map(|i| format!("neutral-{}", i)));
                names.push("primary".to_string());
                let refs: Vec<&str> = names.iter().map(String::as_str).collect();
                let mut tokens = DesignTokens {
                    colors: colors(&refs),
                    spacing: px_map(&spacing),
                    ..Default::default()
                };
                tokens.typography.scale = px_map(&sizes);
                tokens.typography.font_families = (0..n_fonts).map(|i| format!("F{}", i)).collect();
                tokens.typography.body_size = sizes.first().map(|s| format!("{}px", s));
                tokens.typography.loading = optimized.then_some(FontLoading::Optimized);
                tokens.dark_mode_colors = dark.then(|| colors(&["primary"]));
                tokens
            })
    }

    fn arb_patterns() -> impl Strategy<Value = Vec<UiPattern>> {
        let types = prop::sample::select(vec![
            PatternType::Navigation,
            PatternType::Hero,
            PatternType::Cards,
            PatternType::Form,
            PatternType::Table,
            PatternType::Pricing,
            PatternType::Footer,
        ]);
        prop::collection::vec(
            (types, 0.0f64..=1.0).prop_map(|(t, c)| pattern(t, c)),
            0..8,
        )
    }

    proptest! {
        #[test]
        fn prop_scores_bounded(tokens in arb_tokens(), patterns in arb_patterns()) {
            let score = QualityScorer::new().calculate_score(&tokens, &patterns);
            prop_assert!((0.0..=1.0).contains(&score.overall));
            for (_, value, _) in score.breakdown.entries() {
                prop_assert!((0.0..=1.0).contains(&value));
            }
        }
    }
}
