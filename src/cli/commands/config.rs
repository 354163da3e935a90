//! Config Command
//!
//! Manage tokenlens configuration.
//!
//! Usage:
//!   tokenlens config show [-f toml|json]
//!   tokenlens config path
//!   tokenlens config init [-g] [--force]

use crate::cli::ui::Output;
use crate::config::{Config, ConfigLoader};
use crate::types::{Result, TokenError};

/// Print the effective (merged) configuration
pub fn show(config: &Config, format: &str) -> Result<()> {
    let rendered = match format {
        "json" => serde_json::to_string_pretty(config)?,
        "toml" => ConfigLoader::render(config)?,
        other => {
            return Err(TokenError::Config(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// Show configuration file locations and whether they exist
pub fn path() -> Result<()> {
    let out = Output::new();
    out.section("Configuration files");

    let exists = |p: &std::path::Path| if p.exists() { "" } else { " (not found)" };

    match ConfigLoader::global_config_path() {
        Some(global) => out.field("global", format!("{}{}", global.display(), exists(global.as_path()))),
        None => out.field("global", "unavailable"),
    }
    let project = ConfigLoader::project_config_path();
    out.field("project", format!("{}{}", project.display(), exists(project.as_path())));
    out.info("TOKENLENS_* environment variables override both, e.g. TOKENLENS_COLOR__MAX_GROUPS=8");
    Ok(())
}

/// Write a default config file
pub fn init(global: bool, force: bool) -> Result<()> {
    let path = ConfigLoader::init(global, force)?;
    let scope = if global { "global" } else { "project" };
    Output::new().success(&format!(
        "Initialized {} configuration: {}",
        scope,
        path.display()
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_formats() {
        let config = Config::default();
        assert!(show(&config, "toml").is_ok());
        assert!(show(&config, "json").is_ok());
        assert!(matches!(show(&config, "xml"), Err(TokenError::Config(_))));
    }
}
