//! Design Tokens
//!
//! The flat token record consumed by the quality scorer and written to token
//! files. Color tokens use the Design Tokens Community Group shape
//! (`$value` / `$type`).

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::analyzer::{EffectsAnalysis, NormalizedColorSystem, SpacingAnalysis, TypographyAnalysis};
use crate::types::utils::{format_px, parse_px};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorToken {
    #[serde(rename = "$value")]
    pub value: String,
    #[serde(rename = "$type", default = "color_type")]
    pub token_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

fn color_type() -> String {
    "color".to_string()
}

impl ColorToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            token_type: color_type(),
            description: None,
        }
    }
}

/// How web fonts are delivered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontLoading {
    /// Every `@font-face` declares a non-blocking `font-display`
    Optimized,
    Standard,
}

impl FontLoading {
    /// Classify from observed `font-display` descriptors; `None` without web fonts
    pub fn from_font_display(values: &[String]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let non_blocking = values.iter().all(|v| {
            matches!(
                v.trim().to_ascii_lowercase().as_str(),
                "swap" | "optional" | "fallback"
            )
        });
        Some(if non_blocking {
            FontLoading::Optimized
        } else {
            FontLoading::Standard
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TypographyTokens {
    /// Scale slot → size (`"base"` → `"24px"`)
    pub scale: IndexMap<String, String>,
    pub font_families: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub body_size: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loading: Option<FontLoading>,
}

impl TypographyTokens {
    /// Scale sizes in pixels, slot order
    pub fn scale_sizes(&self) -> Vec<f64> {
        self.scale.values().filter_map(|v| parse_px(v)).collect()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EffectTokens {
    pub border_radius: IndexMap<String, String>,
    pub shadows: IndexMap<String, String>,
}

impl EffectTokens {
    pub fn is_empty(&self) -> bool {
        self.border_radius.is_empty() && self.shadows.is_empty()
    }
}

/// Complete token set for one source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DesignTokens {
    pub colors: IndexMap<String, ColorToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode_colors: Option<IndexMap<String, ColorToken>>,
    pub typography: TypographyTokens,
    /// Scale multiplier → px value
    pub spacing: IndexMap<String, String>,
    pub effects: EffectTokens,
    pub layout: IndexMap<String, String>,
}

impl DesignTokens {
    /// Assemble tokens from the individual analyses
    pub fn from_analyses(
        colors: &NormalizedColorSystem,
        typography: &TypographyAnalysis,
        spacing: &SpacingAnalysis,
        effects: &EffectsAnalysis,
        loading: Option<FontLoading>,
    ) -> Self {
        let typography_tokens = TypographyTokens {
            scale: typography
                .scale
                .iter()
                .map(|(slot, entry)| (slot.clone(), entry.size.clone()))
                .collect(),
            font_families: typography.fonts.iter().map(|f| f.name.clone()).collect(),
            body_size: Some(typography.hierarchy.body.clone()),
            loading,
        };

        let mut layout = effects.layout.clone();
        let grid = &spacing.grid;
        if let Some(columns) = grid.columns {
            layout.insert("columns".to_string(), columns.to_string());
        }
        if let Some(gutter) = grid.gutter {
            layout.insert("gutter".to_string(), format_px(gutter));
        }
        if let Some(container) = grid.container {
            layout.insert("container".to_string(), format_px(container));
        }
        if let Some(breakpoints) = &grid.breakpoints {
            for (name, value) in breakpoints {
                layout.insert(format!("breakpoint-{}", name), value.clone());
            }
        }

        Self {
            colors: colors.tokens.clone(),
            dark_mode_colors: colors.dark_mode.clone(),
            typography: typography_tokens,
            spacing: spacing.scale.clone(),
            effects: effects.tokens.clone(),
            layout,
        }
    }

    /// Whether any `grid`/`flex` layout token exists
    pub fn has_modern_layout(&self) -> bool {
        self.layout
            .keys()
            .any(|k| k.contains("grid") || k.contains("flex"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_token_dtcg_shape() {
        let token = ColorToken::new("#FF0000");
        let json = serde_json::to_value(&token).unwrap();
        assert_eq!(json["$value"], "#FF0000");
        assert_eq!(json["$type"], "color");
        assert!(json.get("description").is_none());

        let parsed: ColorToken = serde_json::from_str(r##"{"$value": "#000000"}"##).unwrap();
        assert_eq!(parsed.token_type, "color");
    }

    #[test]
    fn test_font_loading_classification() {
        assert_eq!(FontLoading::from_font_display(&[]), None);
        assert_eq!(
            FontLoading::from_font_display(&["swap".to_string(), "optional".to_string()]),
            Some(FontLoading::Optimized)
        );
        assert_eq!(
            FontLoading::from_font_display(&["swap".to_string(), "block".to_string()]),
            Some(FontLoading::Standard)
        );
    }

    #[test]
    fn test_design_tokens_deserialize_partial() {
        let json = r##"{
            "colors": {"primary": {"$value": "#FF0000", "$type": "color"}},
            "typography": {"scale": {"xs": "32px"}, "loading": "optimized"},
            "layout": {"flex": "flex"}
        }"##;
        let tokens: DesignTokens = serde_json::from_str(json).unwrap();
        assert_eq!(tokens.colors["primary"].value, "#FF0000");
        assert_eq!(tokens.typography.loading, Some(FontLoading::Optimized));
        assert_eq!(tokens.typography.scale_sizes(), vec![32.0]);
        assert!(tokens.has_modern_layout());
        assert!(tokens.effects.is_empty());
        assert!(tokens.dark_mode_colors.is_none());
    }
}
