//! UI Pattern Detection
//!
//! - `page`: `PageHandle` seam, DOM snapshot and selector engine
//! - `registry`: static probe definitions per pattern type
//! - `detector`: confidence scoring and content capture

mod detector;
mod page;
mod registry;

pub use detector::{
    PatternAccessibility, PatternContent, PatternDetector, PatternImage, PatternLink, UiPattern,
};
pub use page::{DomNode, DomSnapshot, PageHandle, Selector};
pub use registry::{PATTERN_REGISTRY, PatternDef, PatternType};
