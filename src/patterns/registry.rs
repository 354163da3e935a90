//! Pattern Registry
//!
//! Static probe definitions, one per UI pattern type. Candidate selectors
//! are tried in order and the first that matches (enough elements) wins.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::page::DomNode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternType {
    Navigation,
    Hero,
    Cards,
    Form,
    Table,
    Pricing,
    Footer,
}

impl PatternType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatternType::Navigation => "navigation",
            PatternType::Hero => "hero",
            PatternType::Cards => "cards",
            PatternType::Form => "form",
            PatternType::Table => "table",
            PatternType::Pricing => "pricing",
            PatternType::Footer => "footer",
        }
    }
}

impl fmt::Display for PatternType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Probe definition for one pattern type
pub struct PatternDef {
    pub pattern_type: PatternType,
    /// Candidate selectors, most specific first
    pub selectors: &'static [&'static str],
    /// Descendants that count as evidence
    pub evidence: &'static str,
    /// Evidence count for full confidence
    pub min_evidence: usize,
    /// Matches a candidate selector needs before it is accepted; above one,
    /// the matches must be siblings
    pub min_matches: usize,
    /// Variant of the first matched element, given the match count
    pub variant: fn(&DomNode, usize) -> String,
}

pub const PATTERN_REGISTRY: &[PatternDef] = &[
    PatternDef {
        pattern_type: PatternType::Navigation,
        selectors: &[
            "nav",
            "header nav",
            "[role=navigation]",
            ".nav",
            ".navbar",
            ".navigation",
        ],
        evidence: "a, button, [role=menuitem]",
        min_evidence: 3,
        min_matches: 1,
        variant: navigation_variant,
    },
    PatternDef {
        pattern_type: PatternType::Hero,
        selectors: &[".hero", "[class*=hero]", ".banner", ".jumbotron", "main section"],
        evidence: "h1, h2, [class*=title]",
        min_evidence: 1,
        min_matches: 1,
        variant: hero_variant,
    },
    PatternDef {
        pattern_type: PatternType::Cards,
        selectors: &[".card", "[class*=card]", ".tile", "article"],
        evidence: "h3, h4, img, a",
        min_evidence: 1,
        min_matches: 3,
        variant: cards_variant,
    },
    PatternDef {
        pattern_type: PatternType::Form,
        selectors: &["form"],
        evidence: "input, select, textarea, button",
        min_evidence: 2,
        min_matches: 1,
        variant: form_variant,
    },
    PatternDef {
        pattern_type: PatternType::Table,
        selectors: &["table"],
        evidence: "th, td, tr",
        min_evidence: 3,
        min_matches: 1,
        variant: default_variant,
    },
    PatternDef {
        pattern_type: PatternType::Pricing,
        selectors: &[".pricing", "[class*=pricing]", "[class*=plan]"],
        evidence: "[class*=price], button, a, li",
        min_evidence: 2,
        min_matches: 1,
        variant: default_variant,
    },
    PatternDef {
        pattern_type: PatternType::Footer,
        selectors: &["footer", "[role=contentinfo]", ".footer"],
        evidence: "a, p, nav",
        min_evidence: 2,
        min_matches: 1,
        variant: default_variant,
    },
];

// =============================================================================
// Variants
// =============================================================================

fn default_variant(_: &DomNode, _: usize) -> String {
    "default".to_string()
}

fn navigation_variant(node: &DomNode, _: usize) -> String {
    let vertical_hint = node
        .attribute("aria-orientation")
        .is_some_and(|o| o.eq_ignore_ascii_case("vertical"))
        || node.classes().any(|c| {
            let c = c.to_ascii_lowercase();
            c.contains("vertical") || c.contains("sidebar") || c.contains("side-nav")
        });
    let variant = if vertical_hint { "vertical" } else { "horizontal" };
    variant.to_string()
}

fn hero_variant(node: &DomNode, _: usize) -> String {
    let has_image = !node
        .query_all("img, picture, video, [style*=background-image]")
        .is_empty()
        || node
            .attribute("style")
            .is_some_and(|s| s.contains("background-image"));
    let variant = if has_image { "with-image" } else { "text-only" };
    variant.to_string()
}

fn cards_variant(_: &DomNode, count: usize) -> String {
    format!("grid-{}", count.min(4))
}

/// Form kinds, first match wins
const FORM_RULES: &[(&str, &str)] = &[
    ("[type=search], [role=search], [name=q], [name*=search]", "search"),
    ("[type=password]", "login"),
    ("textarea, [type=email]", "contact"),
];

fn form_variant(node: &DomNode, _: usize) -> String {
    if node
        .attribute("role")
        .is_some_and(|r| r.eq_ignore_ascii_case("search"))
    {
        return "search".to_string();
    }
    FORM_RULES
        .iter()
        .find(|(selector, _)| !node.query_all(selector).is_empty())
        .map(|(_, variant)| variant.to_string())
        .unwrap_or_else(|| "generic".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patterns::page::Selector;

    #[test]
    fn test_registry_selectors_parse() {
        for def in PATTERN_REGISTRY {
            for selector in def.selectors {
                assert!(Selector::parse(selector).is_ok(), "{}", selector);
            }
            assert!(Selector::parse(def.evidence).is_ok(), "{}", def.evidence);
            assert!(def.min_evidence > 0);
        }
        for (selector, _) in FORM_RULES {
            assert!(Selector::parse(selector).is_ok(), "{}", selector);
        }
    }

    #[test]
    fn test_registry_covers_every_type() {
        assert_eq!(PATTERN_REGISTRY.len(), 7);
        let def = |t: PatternType| PATTERN_REGISTRY.iter().find(|d| d.pattern_type == t).unwrap();
        assert_eq!(def(PatternType::Cards).min_matches, 3);
        assert_eq!(def(PatternType::Table).min_evidence, 3);
    }

    #[test]
    fn test_form_variants() {
        let login = DomNode::new("form")
            .child(DomNode::new("input").attr("type", "email"))
            .child(DomNode::new("input").attr("type", "password"));
        assert_eq!(form_variant(&login, 1), "login");

        let contact = DomNode::new("form")
            .child(DomNode::new("input").attr("type", "email"))
            .child(DomNode::new("textarea"));
        assert_eq!(form_variant(&contact, 1), "contact");

        let search = DomNode::new("form").attr("role", "search");
        assert_eq!(form_variant(&search, 1), "search");

        let generic = DomNode::new("form").child(DomNode::new("select"));
        assert_eq!(form_variant(&generic, 1), "generic");
    }

    #[test]
    fn test_navigation_and_hero_variants() {
        let side = DomNode::new("nav").attr("class", "app-sidebar");
        assert_eq!(navigation_variant(&side, 1), "vertical");
        assert_eq!(navigation_variant(&DomNode::new("nav"), 1), "horizontal");

        let hero = DomNode::new("section").child(DomNode::new("img").attr("src", "/a.png"));
        assert_eq!(hero_variant(&hero, 1), "with-image");
        assert_eq!(hero_variant(&DomNode::new("section"), 1), "text-only");

        assert_eq!(cards_variant(&DomNode::new("div"), 9), "grid-4");
        assert_eq!(cards_variant(&DomNode::new("div"), 3), "grid-3");
    }
}
