//! Raw Style Samples
//!
//! Records supplied by the external page-rendering collaborator. A browser
//! automation script walks every visible element, reads its computed style
//! and dumps the result as one `PageSamples` JSON document per page/viewport.
//!
//! Field names follow the collaborator's camelCase JSON.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::patterns::DomSnapshot;
use crate::types::{Result, TokenError};

/// Everything harvested from a single rendered page
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PageSamples {
    /// Page URL the samples were taken from
    pub url: Option<String>,
    /// Viewport the page was rendered at
    pub viewport: Option<Viewport>,
    /// One entry per observed color declaration (duplicates encode frequency)
    pub colors: Vec<String>,
    /// Font metrics per rendered text element
    pub typography: Vec<TypographySample>,
    /// Box-model distances per element
    pub box_model: Vec<BoxModelSample>,
    /// Border radius, shadow and display per element
    pub effects: Vec<EffectSample>,
    /// `font-display` descriptor of every `@font-face` rule
    pub font_display: Vec<String>,
    /// Contrast pairs and images for the accessibility check
    pub accessibility: AccessibilitySamples,
    /// Structural DOM snapshot for pattern detection
    pub dom: Option<DomSnapshot>,
}

impl PageSamples {
    /// Load samples from a JSON file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| TokenError::invalid_samples(path.display().to_string(), e.to_string()))
    }

    /// Human readable label for reports: URL host when available
    pub fn source_label(&self) -> String {
        match self.url.as_deref() {
            Some(raw) => match url::Url::parse(raw) {
                Ok(parsed) => parsed
                    .host_str()
                    .map(str::to_string)
                    .unwrap_or_else(|| raw.to_string()),
                Err(_) => raw.to_string(),
            },
            None => "unknown source".to_string(),
        }
    }

    /// Total number of raw samples across all categories
    pub fn sample_count(&self) -> usize {
        self.colors.len()
            + self.typography.len()
            + self.box_model.len()
            + self.effects.len()
            + self.accessibility.text_contrast.len()
            + self.accessibility.images.len()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// Typography
// =============================================================================

/// Computed font metrics for one (fontFamily, fontSize, fontWeight) combination
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypographySample {
    pub font_family: String,
    pub font_size: String,
    pub font_weight: String,
    pub line_height: String,
    pub letter_spacing: String,
    pub elements: Vec<ElementRef>,
}

/// Element that rendered a typography sample
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementRef {
    pub tag_name: String,
    pub class_name: String,
    pub text: String,
}

impl ElementRef {
    pub fn new(tag_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            class_name: String::new(),
            text: text.into(),
        }
    }

    /// Whether the element actually rendered text
    pub fn has_text(&self) -> bool {
        !self.text.trim().is_empty()
    }
}

// =============================================================================
// Box Model & Effects
// =============================================================================

/// Computed box-model properties of one element (`margin-top` → `"16px"`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BoxModelSample {
    pub tag_name: Option<String>,
    pub properties: IndexMap<String, String>,
}

impl BoxModelSample {
    pub fn new<K: Into<String>, V: Into<String>>(properties: impl IntoIterator<Item = (K, V)>) -> Self {
        Self {
            tag_name: None,
            properties: properties
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// Visual effect properties of one element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectSample {
    pub border_radius: Option<String>,
    pub box_shadow: Option<String>,
    pub display: Option<String>,
}

// =============================================================================
// Accessibility
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AccessibilitySamples {
    pub text_contrast: Vec<ContrastSample>,
    pub images: Vec<ImageSample>,
}

/// Foreground/background pair of a text element
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContrastSample {
    pub selector: Option<String>,
    pub foreground: String,
    pub background: String,
    pub font_size: Option<String>,
    pub font_weight: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageSample {
    pub src: String,
    pub alt: Option<String>,
    pub role: Option<String>,
    pub aria_hidden: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_camel_case() {
        let json = r##"{
            "url": "https://example.com/pricing",
            "colors": ["#fff", "rgb(0, 0, 0)"],
            "typography": [{
                "fontFamily": "Inter, sans-serif",
                "fontSize": "16px",
                "fontWeight": "400",
                "lineHeight": "24px",
                "letterSpacing": "normal",
                "elements": [{"tagName": "p", "className": "lead", "text": "Hello"}]
            }],
            "boxModel": [{"properties": {"margin-top": "16px"}}]
        }"##;

        let samples: PageSamples = serde_json::from_str(json).unwrap();
        assert_eq!(samples.colors.len(), 2);
        assert_eq!(samples.typography[0].font_family, "Inter, sans-serif");
        assert_eq!(samples.typography[0].elements[0].tag_name, "p");
        assert_eq!(samples.box_model[0].properties["margin-top"], "16px");
        assert!(samples.dom.is_none());
        assert_eq!(samples.source_label(), "example.com");
        assert_eq!(samples.sample_count(), 4);
    }

    #[test]
    fn test_element_has_text() {
        assert!(ElementRef::new("p", "Hi").has_text());
        assert!(!ElementRef::new("div", "   ").has_text());
    }

    #[test]
    fn test_from_file_reports_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        let err = PageSamples::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("broken.json"));
    }
}
