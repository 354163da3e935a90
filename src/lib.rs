//! tokenlens - Design Token Extraction
//!
//! Turns raw computed-style samples harvested from a rendered web page into
//! normalized design tokens, detected UI patterns and a weighted quality score.
//!
//! ## Quick Start
//!
//! ```ignore
//! use tokenlens::{Config, Extractor, PageSamples};
//!
//! let samples = PageSamples::from_file(Path::new("page.json"))?;
//! let spec = Extractor::new(&Config::default()).extract(&samples);
//! println!("{}", spec.quality.to_markdown());
//! ```
//!
//! ## Modules
//!
//! - [`analyzer`]: color, typography, spacing, effects and contrast analysis
//! - [`patterns`]: DOM snapshot, selector engine and UI pattern detection
//! - [`quality`]: weighted design quality score
//! - [`pipeline`]: runs every analyzer and bundles a `DesignSpec`
//! - [`config`]: layered configuration

pub mod analyzer;
pub mod cli;
pub mod config;
pub mod patterns;
pub mod pipeline;
pub mod quality;
pub mod types;

// =============================================================================
// Core Re-exports
// =============================================================================

pub use config::{Config, ConfigLoader};
pub use types::error::{ErrorCategory, Result, ResultExt, TokenError};
pub use types::{DesignTokens, PageSamples};

pub use pipeline::{DesignSpec, Extractor};
pub use quality::{QualityScore, QualityScorer};
