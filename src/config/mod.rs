//! Configuration Management
//!
//! Unified configuration system with hierarchical resolution:
//! 1. Built-in defaults
//! 2. Global config (~/.config/tokenlens/config.toml)
//! 3. Project config (.tokenlens/config.toml)
//! 4. Explicit `--config` file
//! 5. Environment variables (TOKENLENS_*)

mod loader;
mod types;

pub use loader::ConfigLoader;
pub use types::*;
