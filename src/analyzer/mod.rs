//! Style Analyzers
//!
//! Turn raw computed-style samples into normalized design sub-systems:
//! - Color palette, semantic roles, neutral scale and dark mode
//! - Typography scale, families and hierarchy
//! - Spacing base unit, scale and grid
//! - Border radius, shadow and layout effects
//! - Minimal accessibility checks
//!
//! Every analyzer is a pure function of its input and holds only its config.

pub mod accessibility;
pub mod color;
pub mod effects;
pub mod spacing;
pub mod typography;

pub use accessibility::{AccessibilityChecker, AccessibilityIssue, AccessibilityReport, IssueKind};
pub use color::{ColorNormalizer, NormalizedColorSystem, SemanticRole};
pub use effects::{EffectsAnalysis, EffectsExtractor};
pub use spacing::{GridSystem, SpacingAnalysis, SpacingDetector, SpacingSystem};
pub use typography::{FontFamily, ModularScale, TypographyAnalysis, TypographyAnalyzer};
