pub mod error;
pub mod samples;
pub mod tokens;
pub mod utils;

pub use error::{ErrorCategory, Result, ResultExt, TokenError};
pub use samples::{
    AccessibilitySamples, BoxModelSample, ContrastSample, EffectSample, ElementRef, ImageSample,
    PageSamples, TypographySample, Viewport,
};
pub use tokens::{ColorToken, DesignTokens, EffectTokens, FontLoading, TypographyTokens};
pub use utils::{extract_px_values, format_px, parse_px, sorted_unique};
