//! Accessibility Checks
//!
//! Minimal WCAG 2.x checks over collected samples:
//! - Text contrast against AA thresholds (4.5:1, 3:1 for large text)
//! - Images missing alternative text
//!
//! Not an audit; the score only reflects what was sampled.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::analyzer::color::{Rgb, parse_color};
use crate::analyzer::typography::parse_font_weight;
use crate::types::utils::parse_px;
use crate::types::{AccessibilitySamples, ContrastSample, ImageSample};

/// WCAG AA minimum for normal text
pub const AA_NORMAL_TEXT: f64 = 4.5;

/// WCAG AA minimum for large text
pub const AA_LARGE_TEXT: f64 = 3.0;

const LARGE_TEXT_PX: f64 = 24.0;
const LARGE_BOLD_TEXT_PX: f64 = 18.66;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    LowContrast,
    MissingAlt,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessibilityIssue {
    pub kind: IssueKind,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContrastResult {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
    pub foreground: String,
    pub background: String,
    pub ratio: f64,
    pub required: f64,
    pub passes: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct AccessibilityReport {
    /// passed / checked, 1.0 when nothing was checked
    pub score: f64,
    pub checked: usize,
    pub passed: usize,
    pub contrast: Vec<ContrastResult>,
    pub issues: Vec<AccessibilityIssue>,
}

/// WCAG contrast ratio, always ≥ 1
pub fn contrast_ratio(a: Rgb, b: Rgb) -> f64 {
    let (la, lb) = (a.relative_luminance(), b.relative_luminance());
    let (lighter, darker) = if la >= lb { (la, lb) } else { (lb, la) };
    (lighter + 0.05) / (darker + 0.05)
}

fn is_large_text(sample: &ContrastSample) -> bool {
    let Some(size) = sample.font_size.as_deref().and_then(parse_px) else {
        return false;
    };
    let bold = sample
        .font_weight
        .as_deref()
        .and_then(parse_font_weight)
        .is_some_and(|w| w >= 700);
    size >= LARGE_TEXT_PX || (bold && size >= LARGE_BOLD_TEXT_PX)
}

fn is_decorative(image: &ImageSample) -> bool {
    image.aria_hidden
        || image
            .role
            .as_deref()
            .is_some_and(|r| r.eq_ignore_ascii_case("presentation") || r.eq_ignore_ascii_case("none"))
}

#[derive(Debug, Clone, Default)]
pub struct AccessibilityChecker;

impl AccessibilityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, samples: &AccessibilitySamples) -> AccessibilityReport {
        let mut issues = Vec::new();

        let contrast: Vec<ContrastResult> = samples
            .text_contrast
            .iter()
            .filter_map(|sample| {
                let (Some(fg), Some(bg)) =
                    (parse_color(&sample.foreground), parse_color(&sample.background))
                else {
                    debug!(
                        "Skipping contrast sample with unparseable colors: {} on {}",
                        sample.foreground, sample.background
                    );
                    return None;
                };
                let ratio = contrast_ratio(fg, bg);
                let required = if is_large_text(sample) {
                    AA_LARGE_TEXT
                } else {
                    AA_NORMAL_TEXT
                };
                Some(ContrastResult {
                    selector: sample.selector.clone(),
                    foreground: fg.to_hex(),
                    background: bg.to_hex(),
                    ratio: (ratio * 100.0).round() / 100.0,
                    required,
                    passes: ratio >= required,
                })
            })
            .collect();

        for result in contrast.iter().filter(|r| !r.passes) {
            issues.push(AccessibilityIssue {
                kind: IssueKind::LowContrast,
                message: format!(
                    "Contrast {:.2}:1 between {} and {} is below {}:1",
                    result.ratio, result.foreground, result.background, result.required
                ),
                target: result.selector.clone(),
            });
        }

        let images: Vec<&ImageSample> = samples
            .images
            .iter()
            .filter(|image| !is_decorative(image))
            .collect();
        let mut images_passed = 0;
        for image in &images {
            if image.alt.as_deref().is_some_and(|alt| !alt.trim().is_empty()) {
                images_passed += 1;
            } else {
                issues.push(AccessibilityIssue {
                    kind: IssueKind::MissingAlt,
                    message: "Image has no alternative text".to_string(),
                    target: Some(image.src.clone()),
                });
            }
        }

        let checked = contrast.len() + images.len();
        let passed = contrast.iter().filter(|r| r.passes).count() + images_passed;
        let score = if checked == 0 {
            1.0
        } else {
            passed as f64 / checked as f64
        };

        info!(
            "Accessibility: {}/{} checks passed, {} issues",
            passed,
            checked,
            issues.len()
        );

        AccessibilityReport {
            score,
            checked,
            passed,
            contrast,
            issues,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pair(fg: &str, bg: &str, size: &str, weight: &str) -> ContrastSample {
        ContrastSample {
            selector: Some("p".to_string()),
            foreground: fg.to_string(),
            background: bg.to_string(),
            font_size: Some(size.to_string()),
            font_weight: Some(weight.to_string()),
        }
    }

    fn image(alt: Option<&str>) -> ImageSample {
        ImageSample {
            src: "/hero.png".to_string(),
            alt: alt.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_contrast_ratio_extremes() {
        let ratio = contrast_ratio(Rgb::new(0, 0, 0), Rgb::new(255, 255, 255));
        assert!((ratio - 21.0).abs() < 0.01);
        assert_eq!(contrast_ratio(Rgb::new(10, 20, 30), Rgb::new(10, 20, 30)), 1.0);
    }

    #[test]
    fn test_large_text_threshold() {
        // #777777 on white is about 4.48:1
        let samples = AccessibilitySamples {
            text_contrast: vec![
                pair("#777777", "#FFFFFF", "16px", "400"),
                pair("#777777", "#FFFFFF", "24px", "400"),
                pair("#777777", "#FFFFFF", "19px", "bold"),
            ],
            images: vec![],
        };

        let report = AccessibilityChecker::new().check(&samples);
        let passes: Vec<bool> = report.contrast.iter().map(|r| r.passes).collect();
        assert_eq!(passes, vec![false, true, true]);
        assert_eq!(report.issues.len(), 1);
        assert_eq!(report.issues[0].kind, IssueKind::LowContrast);
    }

    #[test]
    fn test_images_alt_text() {
        let decorative = ImageSample {
            role: Some("presentation".to_string()),
            ..image(None)
        };
        let hidden = ImageSample {
            aria_hidden: true,
            ..image(Some(""))
        };
        let samples = AccessibilitySamples {
            text_contrast: vec![],
            images: vec![image(Some("Team photo")), image(Some("  ")), image(None), decorative, hidden],
        };

        let report = AccessibilityChecker::new().check(&samples);
        assert_eq!(report.checked, 3);
        assert_eq!(report.passed, 1);
        assert!((report.score - 1.0 / 3.0).abs() < 1e-9);
        assert!(report.issues.iter().all(|i| i.kind == IssueKind::MissingAlt));
    }

    #[test]
    fn test_nothing_checked_scores_one() {
        let samples = AccessibilitySamples {
            text_contrast: vec![pair("not-a-color", "#FFFFFF", "16px", "400")],
            images: vec![],
        };
        let report = AccessibilityChecker::new().check(&samples);
        assert_eq!(report.checked, 0);
        assert_eq!(report.score, 1.0);
        assert!(report.issues.is_empty());
    }
}
