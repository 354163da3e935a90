//! Score Command
//!
//! Scores an existing token document, optionally with detected patterns.
//!
//! Usage:
//!   tokenlens score tokens.json [--patterns patterns.json] [-f markdown|json|yaml]

use std::fs;
use std::path::Path;

use serde::de::DeserializeOwned;

use crate::config::OutputFormat;
use crate::patterns::UiPattern;
use crate::quality::{QualityScore, QualityScorer};
use crate::types::{DesignTokens, Result, ResultExt, TokenError};

pub fn run(tokens: &Path, patterns: Option<&Path>, format: OutputFormat) -> Result<()> {
    let score = score_files(tokens, patterns)?;

    let document = match format {
        OutputFormat::Markdown => score.to_markdown(),
        OutputFormat::Json => serde_json::to_string_pretty(&score)?,
        OutputFormat::Yaml => serde_yaml::to_string(&score)?,
    };
    println!("{}", document);

    Ok(())
}

/// Load a `DesignTokens` document and pattern list and score them
pub fn score_files(tokens: &Path, patterns: Option<&Path>) -> Result<QualityScore> {
    let tokens: DesignTokens = read_json(tokens)?;
    let patterns: Vec<UiPattern> = match patterns {
        Some(path) => read_json(path)?,
        None => Vec::new(),
    };
    Ok(QualityScorer::new().calculate_score(&tokens, &patterns))
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content =
        fs::read_to_string(path).with_context_fn(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content)
        .map_err(|e| TokenError::invalid_samples(path.display().to_string(), e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::Extractor;
    use crate::types::PageSamples;
    use tempfile::TempDir;

    #[test]
    fn test_score_matches_pipeline() {
        let samples = PageSamples {
            colors: vec!["#336699".to_string(), "#EEEEEE".to_string()],
            ..Default::default()
        };
        let spec = Extractor::default().extract(&samples);

        let dir = TempDir::new().unwrap();
        let tokens = dir.path().join("tokens.json");
        fs::write(&tokens, serde_json::to_string(&spec.tokens).unwrap()).unwrap();

        let score = score_files(&tokens, None).unwrap();
        assert_eq!(score, spec.quality);
    }

    #[test]
    fn test_invalid_tokens_rejected() {
        let dir = TempDir::new().unwrap();
        let tokens = dir.path().join("tokens.json");
        fs::write(&tokens, "{\"colors\": 3}").unwrap();

        let err = score_files(&tokens, None).unwrap_err();
        assert!(matches!(err, TokenError::InvalidSamples { .. }));
    }

    #[test]
    fn test_missing_patterns_file() {
        let dir = TempDir::new().unwrap();
        let tokens = dir.path().join("tokens.json");
        fs::write(&tokens, "{}").unwrap();

        let missing = dir.path().join("nope.json");
        let err = score_files(&tokens, Some(&missing)).unwrap_err();
        assert!(matches!(err, TokenError::Context { .. }));
        assert!(err.to_string().starts_with(&format!("reading {}", missing.display())));
    }
}
