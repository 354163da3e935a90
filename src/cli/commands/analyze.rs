//! Analyze Command
//!
//! Extracts a design spec from one or more page sample files.
//!
//! Usage:
//!   tokenlens analyze page.json [more.json ...] [-f json|yaml|markdown] [-o spec.json]

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tracing::info;

use crate::cli::ui::Output;
use crate::config::{Config, OutputFormat};
use crate::pipeline::{DesignSpec, Extractor};
use crate::types::{Result, ResultExt, TokenError};

pub struct AnalyzeOptions {
    pub files: Vec<PathBuf>,
    /// Overrides `output.format` from the config
    pub format: Option<OutputFormat>,
    pub output: Option<PathBuf>,
}

pub async fn run(config: &Config, options: AnalyzeOptions) -> Result<()> {
    let out = Output::new();
    let format = options.format.unwrap_or(config.output.format);
    let extractor = Arc::new(Extractor::new(config));

    let mut results = extractor
        .extract_files(options.files.clone(), config.analysis.concurrency)
        .await;
    // completion order -> argument order
    results.sort_by_key(|(path, _)| options.files.iter().position(|p| p == path));

    let mut specs = Vec::with_capacity(results.len());
    for (path, result) in results {
        match result {
            Ok(spec) => specs.push(spec),
            Err(e) => out.error(&format!("{}: {}", path.display(), e)),
        }
    }

    if specs.is_empty() {
        return Err(TokenError::invalid_samples(
            join_paths(&options.files),
            "no sample file could be analyzed",
        ));
    }

    let failed = options.files.len() - specs.len();
    if failed > 0 {
        out.warning(&format!("{} of {} files failed", failed, options.files.len()));
    }

    let document = render(&specs, format, config.output.pretty)?;

    match &options.output {
        Some(path) => {
            fs::write(path, &document)
                .with_context_fn(|| format!("writing {}", path.display()))?;
            out.success(&format!(
                "Wrote {} spec(s) as {} to {}",
                specs.len(),
                format,
                path.display()
            ));
        }
        None => println!("{}", document),
    }

    for spec in &specs {
        info!("{}: {}", spec.source, spec.quality.summary());
    }

    Ok(())
}

/// Serialize specs; a single spec is emitted bare, several as a list
pub fn render(specs: &[DesignSpec], format: OutputFormat, pretty: bool) -> Result<String> {
    let document = match (format, specs) {
        (OutputFormat::Json, [spec]) if pretty => serde_json::to_string_pretty(spec)?,
        (OutputFormat::Json, [spec]) => serde_json::to_string(spec)?,
        (OutputFormat::Json, _) if pretty => serde_json::to_string_pretty(specs)?,
        (OutputFormat::Json, _) => serde_json::to_string(specs)?,
        (OutputFormat::Yaml, [spec]) => serde_yaml::to_string(spec)?,
        (OutputFormat::Yaml, _) => serde_yaml::to_string(specs)?,
        (OutputFormat::Markdown, _) => specs
            .iter()
            .map(|spec| format!("_Source: {}_\n\n{}", spec.source, spec.quality.to_markdown()))
            .collect::<Vec<_>>()
            .join("\n---\n\n"),
    };
    Ok(document)
}

fn join_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageSamples;

    fn spec(url: &str) -> DesignSpec {
        let samples = PageSamples {
            url: Some(url.to_string()),
            colors: vec!["#336699".to_string(), "#FFFFFF".to_string()],
            ..Default::default()
        };
        Extractor::default().extract(&samples)
    }

    #[test]
    fn test_render_single_json_is_object() {
        let doc = render(&[spec("https://a.test/")], OutputFormat::Json, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["source"], "a.test");
        assert!(doc.contains('\n'));
    }

    #[test]
    fn test_render_many_json_is_list() {
        let specs = [spec("https://a.test/"), spec("https://b.test/")];
        let doc = render(&specs, OutputFormat::Json, false).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value.as_array().map(Vec::len), Some(2));
        assert!(!doc.contains('\n'));
    }

    #[test]
    fn test_render_markdown_per_source() {
        let specs = [spec("https://a.test/"), spec("https://b.test/")];
        let doc = render(&specs, OutputFormat::Markdown, true).unwrap();
        assert_eq!(doc.matches("# Design Quality Report").count(), 2);
        assert!(doc.contains("_Source: b.test_"));
    }

    #[test]
    fn test_render_yaml() {
        let doc = render(&[spec("https://a.test/")], OutputFormat::Yaml, true).unwrap();
        let value: serde_yaml::Value = serde_yaml::from_str(&doc).unwrap();
        assert_eq!(value["source"].as_str(), Some("a.test"));
    }

    #[tokio::test]
    async fn test_run_writes_output_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let input = dir.path().join("page.json");
        let output = dir.path().join("spec.yaml");
        fs::write(&input, r##"{"url": "https://a.test/", "colors": ["#336699"]}"##).unwrap();

        let options = AnalyzeOptions {
            files: vec![input],
            format: Some(OutputFormat::Yaml),
            output: Some(output.clone()),
        };
        run(&Config::default(), options).await.unwrap();

        let written = fs::read_to_string(&output).unwrap();
        assert!(written.contains("source: a.test"));
    }

    #[tokio::test]
    async fn test_run_fails_when_nothing_analyzed() {
        let dir = tempfile::TempDir::new().unwrap();
        let options = AnalyzeOptions {
            files: vec![dir.path().join("missing.json")],
            format: None,
            output: None,
        };
        let err = run(&Config::default(), options).await.unwrap_err();
        assert!(err.to_string().contains("no sample file could be analyzed"));
    }
}
