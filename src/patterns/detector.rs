//! UI Pattern Detection
//!
//! Probes a page with the static registry and scores each pattern type:
//! `confidence = min(evidence / min_evidence, 1)`. Only the first accepted
//! candidate selector per type is kept. Repeated patterns (cards) only
//! count matches that share a parent.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::page::{DomNode, PageHandle};
use super::registry::{PATTERN_REGISTRY, PatternDef, PatternType};
use crate::config::PatternConfig;

const SEMANTIC_TAGS: &[&str] = &[
    "nav", "header", "footer", "main", "section", "article", "aside", "form", "table",
];

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PatternAccessibility {
    pub has_aria_labels: bool,
    pub has_roles: bool,
    pub keyboard_navigable: bool,
    #[serde(rename = "semanticHTML")]
    pub semantic_html: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternLink {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternImage {
    pub src: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alt: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PatternContent {
    pub headings: Vec<String>,
    pub text: String,
    pub links: Vec<PatternLink>,
    pub images: Vec<PatternImage>,
}

/// A classified page region
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UiPattern {
    #[serde(rename = "type")]
    pub pattern_type: PatternType,
    pub variant: String,
    pub confidence: f64,
    /// Candidate selector that matched
    pub selector: String,
    pub properties: IndexMap<String, serde_json::Value>,
    pub accessibility: PatternAccessibility,
    pub content: PatternContent,
}

/// Truncate to at most `max` characters on a char boundary
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PatternDetector {
    config: PatternConfig,
}

impl PatternDetector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: PatternConfig) -> Self {
        Self { config }
    }

    /// Detect patterns at or above the configured confidence
    pub fn detect(&self, page: &dyn PageHandle) -> Vec<UiPattern> {
        let candidates = self.candidates(page);
        let total = candidates.len();
        let patterns: Vec<UiPattern> = candidates
            .into_iter()
            .filter(|p| p.confidence >= self.config.min_confidence)
            .collect();

        info!(
            "Patterns: {} candidates, {} above confidence {}",
            total,
            patterns.len(),
            self.config.min_confidence
        );
        patterns
    }

    /// Every probed pattern, before confidence filtering
    pub fn candidates(&self, page: &dyn PageHandle) -> Vec<UiPattern> {
        PATTERN_REGISTRY
            .iter()
            .filter_map(|def| self.probe(page, def))
            .collect()
    }

    fn probe(&self, page: &dyn PageHandle, def: &PatternDef) -> Option<UiPattern> {
        let (selector, matches) = def.selectors.iter().find_map(|selector| {
            let matches = if def.min_matches > 1 {
                page.query_siblings(selector)
                    .into_iter()
                    .find(|group| group.len() >= def.min_matches)?
            } else {
                page.query_all(selector)
            };
            (matches.len() >= def.min_matches).then_some((*selector, matches))
        })?;

        let element = matches[0];
        let evidence = element.query_all(def.evidence).len();
        let confidence = (evidence as f64 / def.min_evidence as f64).min(1.0);
        debug!(
            "{} matched '{}' ({} elements, {} evidence)",
            def.pattern_type,
            selector,
            matches.len(),
            evidence
        );

        let mut properties = IndexMap::new();
        properties.insert("tag".to_string(), serde_json::json!(element.tag));
        properties.insert("matches".to_string(), serde_json::json!(matches.len()));
        properties.insert("evidence".to_string(), serde_json::json!(evidence));
        if def.pattern_type == PatternType::Cards {
            properties.insert("columns".to_string(), serde_json::json!(matches.len().min(4)));
        }

        Some(UiPattern {
            pattern_type: def.pattern_type,
            variant: (def.variant)(element, matches.len()),
            confidence,
            selector: selector.to_string(),
            properties,
            accessibility: Self::accessibility(element),
            content: self.content(element),
        })
    }

    fn accessibility(element: &DomNode) -> PatternAccessibility {
        let has_attr = |name: &str| {
            element.has_attribute(name) || !element.query_all(&format!("[{}]", name)).is_empty()
        };

        PatternAccessibility {
            has_aria_labels: has_attr("aria-label") || has_attr("aria-labelledby"),
            has_roles: has_attr("role"),
            keyboard_navigable: has_attr("tabindex")
                || !element.query_all("a, button, input, select, textarea").is_empty(),
            semantic_html: SEMANTIC_TAGS.iter().any(|tag| element.is_tag(tag)),
        }
    }

    fn content(&self, element: &DomNode) -> PatternContent {
        let headings = element
            .query_all("h1, h2, h3, h4, h5, h6")
            .into_iter()
            .map(DomNode::text_content)
            .filter(|t| !t.is_empty())
            .collect();

        let links = element
            .query_all("a")
            .into_iter()
            .map(|a| PatternLink {
                text: a.text_content(),
                href: a.attribute("href").map(str::to_string),
            })
            .collect();

        let images = element
            .query_all("img")
            .into_iter()
            .map(|img| PatternImage {
                src: img.attribute("src").unwrap_or_default().to_string(),
                alt: img.attribute("alt").map(str::to_string),
            })
            .collect();

        PatternContent {
            headings,
            text: truncate_chars(&element.text_content(), self.config.max_text_chars),
            links,
            images,
        }
    }
}
