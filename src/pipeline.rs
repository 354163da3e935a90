//! Extraction Pipeline
//!
//! Runs every analyzer over one page's samples and bundles the results into
//! a `DesignSpec`. Batches of sample files are processed on the blocking
//! pool with a concurrency limit.

use std::path::PathBuf;
use std::sync::Arc;

use futures::StreamExt;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

use crate::analyzer::{
    AccessibilityChecker, AccessibilityReport, ColorNormalizer, EffectsAnalysis, EffectsExtractor,
    NormalizedColorSystem, SpacingAnalysis, SpacingDetector, TypographyAnalysis,
    TypographyAnalyzer,
};
use crate::config::Config;
use crate::patterns::{PatternDetector, UiPattern};
use crate::quality::{QualityScore, QualityScorer};
use crate::types::{DesignTokens, FontLoading, PageSamples, Result};

/// Complete design specification for one source
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DesignSpec {
    pub source: String,
    pub generated_at: String,
    pub tokens: DesignTokens,
    pub colors: NormalizedColorSystem,
    pub typography: TypographyAnalysis,
    pub spacing: SpacingAnalysis,
    pub effects: EffectsAnalysis,
    pub patterns: Vec<UiPattern>,
    pub accessibility: AccessibilityReport,
    pub quality: QualityScore,
}

/// Runs all analyzers with a shared configuration
#[derive(Debug, Clone)]
pub struct Extractor {
    colors: ColorNormalizer,
    typography: TypographyAnalyzer,
    spacing: SpacingDetector,
    effects: EffectsExtractor,
    accessibility: AccessibilityChecker,
    patterns: PatternDetector,
    scorer: QualityScorer,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(&Config::default())
    }
}

impl Extractor {
    pub fn new(config: &Config) -> Self {
        Self {
            colors: ColorNormalizer::with_config(config.color.clone()),
            typography: TypographyAnalyzer::with_config(config.typography.clone()),
            spacing: SpacingDetector::with_config(config.spacing.clone()),
            effects: EffectsExtractor::new(),
            accessibility: AccessibilityChecker::new(),
            patterns: PatternDetector::with_config(config.patterns.clone()),
            scorer: QualityScorer::new(),
        }
    }

    /// Analyze one page's samples
    #[instrument(skip(self, samples), fields(source = %samples.source_label(), samples = samples.sample_count()))]
    pub fn extract(&self, samples: &PageSamples) -> DesignSpec {
        let colors = self.colors.normalize(&samples.colors);
        let typography = self.typography.analyze(&samples.typography);
        let spacing = self.spacing.detect(&samples.box_model);
        let effects = self.effects.extract(&samples.effects);
        let accessibility = self.accessibility.check(&samples.accessibility);

        let patterns = match &samples.dom {
            Some(dom) => self.patterns.detect(dom),
            None => Vec::new(),
        };

        let tokens = DesignTokens::from_analyses(
            &colors,
            &typography,
            &spacing,
            &effects,
            FontLoading::from_font_display(&samples.font_display),
        );
        let quality = self.scorer.calculate_score(&tokens, &patterns);

        info!("Extracted design spec: {}", quality.summary());

        DesignSpec {
            source: samples.source_label(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            tokens,
            colors,
            typography,
            spacing,
            effects,
            patterns,
            accessibility,
            quality,
        }
    }

    /// Load and analyze sample files, at most `max_concurrency` at a time.
    ///
    /// Results come back in completion order, each paired with its path.
    #[instrument(skip(self, paths), fields(file_count = paths.len()))]
    pub async fn extract_files(
        self: &Arc<Self>,
        paths: Vec<PathBuf>,
        max_concurrency: usize,
    ) -> Vec<(PathBuf, Result<DesignSpec>)> {
        let mut results = Vec::with_capacity(paths.len());

        let mut stream = futures::stream::iter(paths)
            .map(|path| {
                let extractor = Arc::clone(self);
                async move {
                    let task_path = path.clone();
                    let outcome = tokio::task::spawn_blocking(move || -> Result<DesignSpec> {
                        let samples = PageSamples::from_file(&task_path)?;
                        Ok(extractor.extract(&samples))
                    })
                    .await;
                    let result = match outcome {
                        Ok(result) => result,
                        Err(e) => Err(e.into()),
                    };
                    (path, result)
                }
            })
            .buffer_unordered(max_concurrency.max(1));

        while let Some((path, result)) = stream.next().await {
            if let Err(e) = &result {
                warn!("Failed to analyze {}: {}", path.display(), e);
            }
            results.push((path, result));
        }

        results
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::{DomNode, DomSnapshot};
    use crate::types::{BoxModelSample, EffectSample, ElementRef, TypographySample};

    fn sample_page() -> PageSamples {
        let typography = ["16px", "19px", "23px", "28px", "33px"]
            .iter()
            .map(|size| TypographySample {
                font_family: "Inter, sans-serif".to_string(),
                font_size: size.to_string(),
                font_weight: "400".to_string(),
                line_height: "1.5".to_string(),
                letter_spacing: "normal".to_string(),
                elements: vec![ElementRef::new("p", "Hello")],
            })
            .collect();

        PageSamples {
            url: Some("https://acme.test/".to_string()),
            colors: ["#FF0000", "#FE0101", "#0000FF", "#111111", "#F9F9F9"]
                .iter()
                .map(|c| c.to_string())
                .collect(),
            typography,
            box_model: ["8px", "16px", "24px", "32px", "40px"]
                .iter()
                .map(|v| BoxModelSample::new([("padding-top", *v)]))
                .collect(),
            effects: vec![EffectSample {
                border_radius: Some("8px".to_string()),
                box_shadow: None,
                display: Some("flex".to_string()),
            }],
            font_display: vec!["swap".to_string()],
            dom: Some(DomSnapshot::new(
                DomNode::new("body").child(
                    DomNode::new("nav")
                        .child(DomNode::new("a").with_text("A"))
                        .child(DomNode::new("a").with_text("B"))
                        .child(DomNode::new("a").with_text("C")),
                ),
            )),
            ..Default::default()
        }
    }

    #[test]
    fn test_extract_bundles_all_analyses() {
        let spec = Extractor::default().extract(&sample_page());

        assert_eq!(spec.source, "acme.test");
        assert_eq!(spec.colors.tokens["primary"].value, "#FF0000");
        assert_eq!(spec.typography.modular_scale.map(|m| m.ratio), Some(1.2));
        assert_eq!(spec.spacing.recommended_base, 8.0);
        assert_eq!(spec.patterns.len(), 1);

        assert_eq!(spec.tokens.colors.len(), spec.colors.tokens.len());
        assert!(spec.tokens.dark_mode_colors.is_some());
        assert_eq!(spec.tokens.typography.loading, Some(FontLoading::Optimized));
        assert_eq!(spec.tokens.typography.font_families, vec!["Inter"]);
        assert_eq!(spec.tokens.effects.border_radius["radius-sm"], "8px");
        assert!(spec.tokens.has_modern_layout());
        assert_eq!(spec.accessibility.score, 1.0);
        assert!((0.0..=1.0).contains(&spec.quality.overall));
    }

    #[test]
    fn test_extract_empty_samples() {
        let spec = Extractor::default().extract(&PageSamples::default());
        assert_eq!(spec.source, "unknown source");
        assert!(spec.patterns.is_empty());
        assert_eq!(spec.spacing.recommended_base, 8.0);
        assert_eq!(spec.tokens.typography.body_size.as_deref(), Some("16px"));
        assert!((0.0..=1.0).contains(&spec.quality.overall));
    }

    #[test]
    fn test_spec_serializes() {
        let spec = Extractor::default().extract(&sample_page());
        let json = serde_json::to_value(&spec).unwrap();
        assert_eq!(json["tokens"]["colors"]["primary"]["$type"], "color");
        assert_eq!(json["patterns"][0]["type"], "navigation");
        assert!(json["generatedAt"].is_string());
        assert!(serde_yaml::to_string(&spec).is_ok());
    }

    #[tokio::test]
    async fn test_extract_files_reports_failures() {
        let dir = tempfile::TempDir::new().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, serde_json::to_string(&sample_page()).unwrap()).unwrap();
        std::fs::write(&bad, "[1, 2").unwrap();

        let extractor = Arc::new(Extractor::default());
        let mut results = extractor
            .extract_files(vec![good.clone(), bad.clone(), dir.path().join("missing.json")], 2)
            .await;
        results.sort_by(|a, b| a.0.cmp(&b.0));

        assert_eq!(results.len(), 3);
        let ok: Vec<&PathBuf> = results.iter().filter(|(_, r)| r.is_ok()).map(|(p, _)| p).collect();
        assert_eq!(ok, vec![&good]);
    }
}
