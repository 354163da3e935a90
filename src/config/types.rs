//! Configuration Types
//!
//! All configuration structures with sensible defaults.
//! Supports global (~/.config/tokenlens/) and project (.tokenlens/) level configuration.

use serde::{Deserialize, Serialize};

use crate::types::{Result, TokenError};

/// Root configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Configuration version
    pub version: String,

    /// Color normalization settings
    pub color: ColorConfig,

    /// Typography analysis settings
    pub typography: TypographyConfig,

    /// Spacing detection settings
    pub spacing: SpacingConfig,

    /// UI pattern detection settings
    pub patterns: PatternConfig,

    /// Batch analysis settings
    pub analysis: AnalysisConfig,

    /// Report output settings
    pub output: OutputConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            color: ColorConfig::default(),
            typography: TypographyConfig::default(),
            spacing: SpacingConfig::default(),
            patterns: PatternConfig::default(),
            analysis: AnalysisConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl Config {
    /// Validate configuration values are within acceptable ranges.
    /// Returns `TokenError::Config` on validation failure.
    pub fn validate(&self) -> Result<()> {
        if !(0.0..=100.0).contains(&self.color.similarity_threshold) {
            return Err(TokenError::Config(format!(
                "color.similarity_threshold must be between 0 and 100, got {}",
                self.color.similarity_threshold
            )));
        }

        if self.color.max_groups == 0 {
            return Err(TokenError::Config(
                "color.max_groups must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=100.0).contains(&self.color.dark_mode_max_lightness) {
            return Err(TokenError::Config(format!(
                "color.dark_mode_max_lightness must be between 0 and 100, got {}",
                self.color.dark_mode_max_lightness
            )));
        }

        if self.typography.max_families == 0 || self.typography.max_scale_sizes == 0 {
            return Err(TokenError::Config(
                "typography.max_families and typography.max_scale_sizes must be greater than 0"
                    .to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.typography.modular_similarity_threshold) {
            return Err(TokenError::Config(format!(
                "typography.modular_similarity_threshold must be between 0.0 and 1.0, got {}",
                self.typography.modular_similarity_threshold
            )));
        }

        if self.spacing.max_value <= 0.0 {
            return Err(TokenError::Config(
                "spacing.max_value must be greater than 0".to_string(),
            ));
        }

        if !(0.0..=1.0).contains(&self.patterns.min_confidence) {
            return Err(TokenError::Config(format!(
                "patterns.min_confidence must be between 0.0 and 1.0, got {}",
                self.patterns.min_confidence
            )));
        }

        if self.analysis.concurrency == 0 {
            return Err(TokenError::Config(
                "analysis.concurrency must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

// =============================================================================
// Color Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Max HSL distance for two colors to share a group
    pub similarity_threshold: f64,

    /// Palette size cap (groups beyond are dropped)
    pub max_groups: usize,

    /// Emit a dark-mode token set
    pub dark_mode: bool,

    /// Lightness added to every token in dark mode
    pub dark_mode_lift: f64,

    /// Lightness ceiling for dark-mode tokens
    pub dark_mode_max_lightness: f64,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            similarity_threshold: 5.0,
            max_groups: 12,
            dark_mode: true,
            dark_mode_lift: 20.0,
            dark_mode_max_lightness: 95.0,
        }
    }
}

// =============================================================================
// Typography Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TypographyConfig {
    /// Number of ranked font families kept
    pub max_families: usize,

    /// Smallest size (px) admitted to the type scale
    pub min_scale_size: f64,

    /// Number of distinct sizes in the type scale
    pub max_scale_sizes: usize,

    /// Largest size (px) considered body text
    pub body_max_size: f64,

    /// Minimum similarity for a modular scale match (0.0-1.0)
    pub modular_similarity_threshold: f64,
}

impl Default for TypographyConfig {
    fn default() -> Self {
        Self {
            max_families: 3,
            min_scale_size: 14.0,
            max_scale_sizes: 8,
            body_max_size: 18.0,
            modular_similarity_threshold: 0.8,
        }
    }
}

// =============================================================================
// Spacing Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SpacingConfig {
    /// Largest spacing value (px) kept; larger ones are layout, not rhythm
    pub max_value: f64,

    /// Distinct value count above which consolidation is recommended
    pub max_distinct_values: usize,
}

impl Default for SpacingConfig {
    fn default() -> Self {
        Self {
            max_value: 200.0,
            max_distinct_values: 20,
        }
    }
}

// =============================================================================
// Pattern Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternConfig {
    /// Patterns below this confidence are discarded
    pub min_confidence: f64,

    /// Max characters of captured text per pattern
    pub max_text_chars: usize,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.7,
            max_text_chars: 200,
        }
    }
}

// =============================================================================
// Analysis Configuration
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Maximum sample files analyzed concurrently
    pub concurrency: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self { concurrency: 4 }
    }
}

// =============================================================================
// Output Configuration
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
    Markdown,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Yaml => write!(f, "yaml"),
            OutputFormat::Markdown => write!(f, "markdown"),
        }
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "yaml" | "yml" => Ok(OutputFormat::Yaml),
            "markdown" | "md" => Ok(OutputFormat::Markdown),
            _ => Err(format!(
                "Unknown output format: {}. Valid values: json, yaml, markdown",
                s
            )),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default format when `--format` is not given
    pub format: OutputFormat,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Json,
            pretty: true,
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
