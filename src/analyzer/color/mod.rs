//! Color normalization: parsing, clustering, semantic roles and dark mode.

mod convert;
mod normalizer;

pub use convert::{Hsl, Rgb, are_colors_similar, hue_distance, parse_color};
pub use normalizer::{
    ColorGroup, ColorNormalizer, FALLBACK_ACCENT, FALLBACK_ERROR, FALLBACK_INFO,
    FALLBACK_PRIMARY, FALLBACK_SECONDARY, FALLBACK_SUCCESS, FALLBACK_WARNING,
    NEUTRAL_LIGHTNESS_STEPS, NormalizedColorSystem, SemanticColors, SemanticRole, StatusColors,
    assign_role, generate_neutral_scale,
};
