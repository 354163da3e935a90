//! Color Normalization
//!
//! Turns the raw color strings harvested from a page into a bounded palette:
//! - Greedy single-pass clustering of similar colors (HSL box distance)
//! - Truncation to the dominant groups
//! - Semantic role assignment via an ordered rule list
//! - Neutral scale, token emission and dark-mode derivation

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::convert::{Hsl, Rgb, are_colors_similar, parse_color};
use crate::config::ColorConfig;
use crate::types::ColorToken;

/// Lightness steps of the generated neutral scale (lightest first)
pub const NEUTRAL_LIGHTNESS_STEPS: [f64; 11] =
    [95.0, 86.0, 77.0, 68.0, 59.0, 50.0, 41.0, 32.0, 23.0, 14.0, 5.0];

/// Fallbacks used when no palette group carries a role
pub const FALLBACK_PRIMARY: &str = "#3B82F6";
pub const FALLBACK_SECONDARY: &str = "#6B7280";
pub const FALLBACK_ACCENT: &str = "#10B981";
pub const FALLBACK_SUCCESS: &str = "#10B981";
pub const FALLBACK_WARNING: &str = "#F59E0B";
pub const FALLBACK_ERROR: &str = "#EF4444";
pub const FALLBACK_INFO: &str = "#3B82F6";

/// Purpose-based label of a palette group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemanticRole {
    Primary,
    Secondary,
    Accent,
    Neutral,
    Success,
    Warning,
    Error,
    Info,
}

impl SemanticRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Accent => "accent",
            Self::Neutral => "neutral",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Info => "info",
        }
    }
}

impl std::fmt::Display for SemanticRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cluster of mutually similar colors
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColorGroup {
    /// Original color strings, in input order
    pub colors: Vec<String>,
    /// RGB mean of the members
    pub average_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_role: Option<SemanticRole>,
}

impl ColorGroup {
    /// The first member, used for comparisons and token values
    pub fn representative(&self) -> &str {
        self.colors.first().map(String::as_str).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusColors {
    pub success: String,
    pub warning: String,
    pub error: String,
    pub info: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SemanticColors {
    pub primary: String,
    pub secondary: String,
    pub accent: String,
    pub neutral: Vec<String>,
    pub semantic: StatusColors,
}

/// Final output of color normalization
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedColorSystem {
    pub tokens: IndexMap<String, ColorToken>,
    pub palette: Vec<ColorGroup>,
    pub semantic: SemanticColors,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dark_mode: Option<IndexMap<String, ColorToken>>,
}

// =============================================================================
// Role Rules
// =============================================================================

/// One entry of the ordered role chain; the first matching rule wins
struct RoleRule {
    matches: fn(&Hsl) -> bool,
    role: fn(&Hsl) -> SemanticRole,
}

const ROLE_RULES: &[RoleRule] = &[
    RoleRule {
        matches: is_vivid,
        role: vivid_role,
    },
    RoleRule {
        matches: is_desaturated,
        role: neutral_role,
    },
    RoleRule {
        matches: is_deep,
        role: secondary_role,
    },
    RoleRule {
        matches: is_light,
        role: neutral_role,
    },
];

fn is_vivid(c: &Hsl) -> bool {
    c.s > 60.0 && c.l > 30.0 && c.l < 70.0
}

fn vivid_role(c: &Hsl) -> SemanticRole {
    if c.h < 30.0 || c.h > 330.0 {
        SemanticRole::Primary
    } else if c.h > 90.0 && c.h < 150.0 {
        SemanticRole::Success
    } else if c.h > 30.0 && c.h < 90.0 {
        SemanticRole::Warning
    } else {
        SemanticRole::Accent
    }
}

fn is_desaturated(c: &Hsl) -> bool {
    c.s < 20.0
}

fn is_deep(c: &Hsl) -> bool {
    c.s > 40.0 && c.l < 30.0
}

fn is_light(c: &Hsl) -> bool {
    c.l > 70.0
}

fn neutral_role(_: &Hsl) -> SemanticRole {
    SemanticRole::Neutral
}

fn secondary_role(_: &Hsl) -> SemanticRole {
    SemanticRole::Secondary
}

/// Assign a semantic role from a single color. `Error` and `Info` are never
/// produced here; they always come from the fallbacks.
pub fn assign_role(color: &Hsl) -> Option<SemanticRole> {
    ROLE_RULES
        .iter()
        .find(|rule| (rule.matches)(color))
        .map(|rule| (rule.role)(color))
}

/// Generate the 11-step neutral scale, lightest first.
///
/// With a base color the hue is kept and saturation drops to 30% (minimum 5);
/// without one the scale is pure gray.
pub fn generate_neutral_scale(base: Option<&Hsl>) -> Vec<Hsl> {
    let (h, s) = match base {
        Some(c) => (c.h, (c.s * 0.3).max(5.0)),
        None => (0.0, 0.0),
    };
    NEUTRAL_LIGHTNESS_STEPS
        .iter()
        .map(|&l| Hsl::new(h, s, l))
        .collect()
}

// =============================================================================
// Normalizer
// =============================================================================

/// A parsed input color kept alongside its original spelling
struct ParsedColor<'a> {
    raw: &'a str,
    rgb: Rgb,
    hsl: Hsl,
}

/// Color normalizer
#[derive(Debug, Clone, Default)]
pub struct ColorNormalizer {
    config: ColorConfig,
}

impl ColorNormalizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ColorConfig) -> Self {
        Self { config }
    }

    /// Normalize raw color strings into a palette, tokens and semantic bundle
    pub fn normalize(&self, colors: &[String]) -> NormalizedColorSystem {
        let parsed: Vec<ParsedColor<'_>> = colors
            .iter()
            .filter_map(|raw| match parse_color(raw) {
                Some(rgb) => Some(ParsedColor {
                    raw: raw.as_str(),
                    rgb,
                    hsl: rgb.to_hsl(),
                }),
                None => {
                    debug!("Dropping unparseable color '{}'", raw);
                    None
                }
            })
            .collect();

        let hsls: Vec<Hsl> = parsed.iter().map(|p| p.hsl).collect();
        let mut clusters = self.cluster(&hsls);

        // Stable: equal-sized groups keep first-seen order
        clusters.sort_by(|a, b| b.len().cmp(&a.len()));
        let dropped = clusters.len().saturating_sub(self.config.max_groups);
        clusters.truncate(self.config.max_groups);

        let palette: Vec<ColorGroup> = clusters
            .iter()
            .map(|members| {
                let rgbs: Vec<Rgb> = members.iter().map(|&i| parsed[i].rgb).collect();
                ColorGroup {
                    colors: members.iter().map(|&i| parsed[i].raw.to_string()).collect(),
                    average_color: Rgb::mean(&rgbs).map(|c| c.to_hex()).unwrap_or_default(),
                    semantic_role: assign_role(&parsed[members[0]].hsl),
                }
            })
            .collect();

        let neutral_base = clusters
            .iter()
            .zip(&palette)
            .find(|(_, group)| group.semantic_role == Some(SemanticRole::Neutral))
            .map(|(members, _)| parsed[members[0]].hsl);
        let neutral_scale = generate_neutral_scale(neutral_base.as_ref());

        let tokens = Self::emit_tokens(&palette, &neutral_scale);
        let semantic = Self::semantic_bundle(&palette, &neutral_scale);
        let dark_mode = self
            .config
            .dark_mode
            .then(|| self.derive_dark_mode(&tokens));

        info!(
            "Normalized {} colors ({} parsed) into {} groups, {} tokens ({} rare groups dropped)",
            colors.len(),
            parsed.len(),
            palette.len(),
            tokens.len(),
            dropped
        );

        NormalizedColorSystem {
            tokens,
            palette,
            semantic,
            dark_mode,
        }
    }

    /// Greedy single-pass clustering.
    ///
    /// Returns an arena of groups, each a list of indices into `colors`. A
    /// color joins the first group whose first member is similar to it,
    /// otherwise it opens a new group. The result depends on input order.
    pub fn cluster(&self, colors: &[Hsl]) -> Vec<Vec<usize>> {
        let mut groups: Vec<Vec<usize>> = Vec::new();

        for (index, color) in colors.iter().enumerate() {
            let target = groups.iter().position(|members| {
                are_colors_similar(&colors[members[0]], color, self.config.similarity_threshold)
            });
            match target {
                Some(g) => groups[g].push(index),
                None => groups.push(vec![index]),
            }
        }

        groups
    }

    fn emit_tokens(palette: &[ColorGroup], neutral_scale: &[Hsl]) -> IndexMap<String, ColorToken> {
        let mut tokens = IndexMap::new();
        let mut role_counts: IndexMap<SemanticRole, usize> = IndexMap::new();

        for group in palette {
            let Some(role) = group.semantic_role else {
                continue;
            };
            if role == SemanticRole::Neutral {
                continue;
            }
            let count = role_counts.entry(role).or_insert(0);
            *count += 1;
            let name = if *count == 1 {
                role.to_string()
            } else {
                format!("{}-{}", role, count)
            };
            tokens.insert(name, ColorToken::new(group.representative()));
        }

        let neutral_hex: Vec<String> = neutral_scale.iter().map(Hsl::to_hex).collect();
        for (i, hex) in neutral_hex.iter().enumerate() {
            tokens.insert(format!("neutral-{}", (i + 1) * 100), ColorToken::new(hex));
        }

        if let [lightest, second, ..] = neutral_hex.as_slice() {
            tokens.insert("background".to_string(), ColorToken::new(lightest));
            tokens.insert("background-secondary".to_string(), ColorToken::new(second));
        }
        if let [.., second_darkest, darkest] = neutral_hex.as_slice() {
            tokens.insert("text".to_string(), ColorToken::new(darkest));
            tokens.insert("text-secondary".to_string(), ColorToken::new(second_darkest));
        }

        tokens
    }

    fn semantic_bundle(palette: &[ColorGroup], neutral_scale: &[Hsl]) -> SemanticColors {
        let first_with = |role: SemanticRole, fallback: &str| {
            palette
                .iter()
                .find(|g| g.semantic_role == Some(role))
                .map(|g| g.representative().to_string())
                .unwrap_or_else(|| fallback.to_string())
        };

        let mut neutral: Vec<String> = palette
            .iter()
            .filter(|g| g.semantic_role == Some(SemanticRole::Neutral))
            .map(|g| g.representative().to_string())
            .collect();
        if neutral.is_empty() {
            neutral = neutral_scale.iter().map(Hsl::to_hex).collect();
        }

        SemanticColors {
            primary: first_with(SemanticRole::Primary, FALLBACK_PRIMARY),
            secondary: first_with(SemanticRole::Secondary, FALLBACK_SECONDARY),
            accent: first_with(SemanticRole::Accent, FALLBACK_ACCENT),
            neutral,
            semantic: StatusColors {
                success: first_with(SemanticRole::Success, FALLBACK_SUCCESS),
                warning: first_with(SemanticRole::Warning, FALLBACK_WARNING),
                error: first_with(SemanticRole::Error, FALLBACK_ERROR),
                info: first_with(SemanticRole::Info, FALLBACK_INFO),
            },
        }
    }

    /// Lighten every token independently; not palette-aware.
    fn derive_dark_mode(&self, tokens: &IndexMap<String, ColorToken>) -> IndexMap<String, ColorToken> {
        tokens
            .iter()
            .filter_map(|(name, token)| {
                let hsl = parse_color(&token.value)?.to_hsl();
                let lifted = (hsl.l + self.config.dark_mode_lift).min(self.config.dark_mode_max_lightness);
                Some((name.clone(), ColorToken::new(hsl.with_lightness(lifted).to_hex())))
            })
            .collect()
    }
}
