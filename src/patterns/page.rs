//! Page Access & Selector Engine
//!
//! `PageHandle` is the seam to whatever renders the page. The crate ships
//! `DomSnapshot`, a serialized element tree captured by the browser
//! collaborator, together with a small CSS selector engine covering:
//! - type selectors and `*`
//! - `.class`, `#id`
//! - `[attr]`, `[attr=v]`, `[attr*=v]`, `[attr^=v]`, `[attr$=v]`
//! - comma-separated lists and the descendant combinator

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::types::{Result, TokenError};

/// Structural access to a rendered page.
///
/// Element-level work (evidence, variants, content) runs on `DomNode`, so a
/// live page implements this by materializing its tree as `DomNode`s.
pub trait PageHandle: Send + Sync {
    /// All elements matching `selector`, in document order
    fn query_all(&self, selector: &str) -> Vec<&DomNode>;

    /// Matches grouped by shared parent, parents in document order
    fn query_siblings(&self, selector: &str) -> Vec<Vec<&DomNode>>;
}

/// One element of a captured DOM tree
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct DomNode {
    pub tag: String,
    pub attributes: IndexMap<String, String>,
    /// Text directly inside this element
    pub text: String,
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn child(mut self, child: DomNode) -> Self {
        self.children.push(child);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn has_attribute(&self, name: &str) -> bool {
        self.attribute(name).is_some()
    }

    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attribute("class").unwrap_or_default().split_whitespace()
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }

    /// Whitespace-normalized text of this element and its descendants
    pub fn text_content(&self) -> String {
        let mut parts = Vec::new();
        self.collect_text(&mut parts);
        parts.join(" ")
    }

    fn collect_text<'a>(&'a self, parts: &mut Vec<&'a str>) {
        parts.extend(self.text.split_whitespace());
        for child in &self.children {
            child.collect_text(parts);
        }
    }

    /// Descendants (not self) matching a parsed selector, in document order
    pub fn select(&self, selector: &Selector) -> Vec<&DomNode> {
        let mut found = Vec::new();
        let mut ancestors = vec![self];
        for child in &self.children {
            Self::walk(child, selector, &mut ancestors, &mut found);
        }
        found
    }

    fn walk<'a>(
        node: &'a DomNode,
        selector: &Selector,
        ancestors: &mut Vec<&'a DomNode>,
        found: &mut Vec<&'a DomNode>,
    ) {
        if selector.matches(node, ancestors) {
            found.push(node);
        }
        ancestors.push(node);
        for child in &node.children {
            Self::walk(child, selector, ancestors, found);
        }
        ancestors.pop();
    }

    fn walk_siblings<'a>(
        node: &'a DomNode,
        selector: &Selector,
        ancestors: &mut Vec<&'a DomNode>,
        groups: &mut Vec<Vec<&'a DomNode>>,
    ) {
        ancestors.push(node);
        let path: &[&'a DomNode] = ancestors;
        let group: Vec<&'a DomNode> = node
            .children
            .iter()
            .filter(|child| selector.matches(child, path))
            .collect();
        if !group.is_empty() {
            groups.push(group);
        }
        for child in &node.children {
            Self::walk_siblings(child, selector, ancestors, groups);
        }
        ancestors.pop();
    }

    /// Descendants matching `selector`; invalid selectors match nothing
    pub fn query_all(&self, selector: &str) -> Vec<&DomNode> {
        match parse_logged(selector) {
            Some(parsed) => self.select(&parsed),
            None => Vec::new(),
        }
    }
}

fn parse_logged(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            warn!("{}", e);
            None
        }
    }
}

/// Captured page: the document root element
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct DomSnapshot {
    pub root: DomNode,
}

impl DomSnapshot {
    pub fn new(root: DomNode) -> Self {
        Self { root }
    }
}

impl PageHandle for DomSnapshot {
    /// The root itself is matchable, unlike element-scoped queries
    fn query_all(&self, selector: &str) -> Vec<&DomNode> {
        let Some(parsed) = parse_logged(selector) else {
            return Vec::new();
        };
        let mut found = Vec::new();
        let mut ancestors = Vec::new();
        DomNode::walk(&self.root, &parsed, &mut ancestors, &mut found);
        found
    }

    fn query_siblings(&self, selector: &str) -> Vec<Vec<&DomNode>> {
        let Some(parsed) = parse_logged(selector) else {
            return Vec::new();
        };
        let mut groups = Vec::new();
        let mut ancestors = Vec::new();
        DomNode::walk_siblings(&self.root, &parsed, &mut ancestors, &mut groups);
        groups
    }
}

// =============================================================================
// Selectors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
enum AttrOp {
    Exists,
    Equals(String),
    Contains(String),
    Prefix(String),
    Suffix(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct AttrSelector {
    name: String,
    op: AttrOp,
}

/// Type, id, classes and attribute tests for one element
#[derive(Debug, Clone, Default, PartialEq, Eq)]
struct Compound {
    tag: Option<String>,
    id: Option<String>,
    classes: Vec<String>,
    attrs: Vec<AttrSelector>,
}

impl Compound {
    fn is_empty(&self) -> bool {
        self.tag.is_none() && self.id.is_none() && self.classes.is_empty() && self.attrs.is_empty()
    }

    fn matches(&self, node: &DomNode) -> bool {
        if let Some(tag) = &self.tag
            && !node.is_tag(tag)
        {
            return false;
        }
        if let Some(id) = &self.id
            && node.attribute("id") != Some(id.as_str())
        {
            return false;
        }
        if !self.classes.iter().all(|c| node.classes().any(|nc| nc == c)) {
            return false;
        }
        self.attrs.iter().all(|attr| {
            let Some(value) = node.attribute(&attr.name) else {
                return false;
            };
            match &attr.op {
                AttrOp::Exists => true,
                AttrOp::Equals(v) => value == v,
                AttrOp::Contains(v) => !v.is_empty() && value.contains(v.as_str()),
                AttrOp::Prefix(v) => !v.is_empty() && value.starts_with(v.as_str()),
                AttrOp::Suffix(v) => !v.is_empty() && value.ends_with(v.as_str()),
            }
        })
    }
}

/// Parsed selector list (`a, nav .item`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Alternatives; each is a chain of compounds joined by descendant combinators
    alternatives: Vec<Vec<Compound>>,
}

impl Selector {
    pub fn parse(input: &str) -> Result<Self> {
        let alternatives = input
            .split(',')
            .map(|part| Self::parse_complex(input, part.trim()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { alternatives })
    }

    fn parse_complex(full: &str, part: &str) -> Result<Vec<Compound>> {
        if part.is_empty() {
            return Err(TokenError::selector(full, "empty selector in list"));
        }

        let chars: Vec<char> = part.chars().collect();
        let mut pos = 0;
        let mut chain = Vec::new();
        let mut current = Compound::default();

        while pos < chars.len() {
            let c = chars[pos];
            match c {
                c if c.is_whitespace() => {
                    if !current.is_empty() {
                        chain.push(std::mem::take(&mut current));
                    }
                    pos += 1;
                }
                '>' | '+' | '~' => {
                    return Err(TokenError::selector(
                        full,
                        format!("unsupported combinator '{}'", c),
                    ));
                }
                '.' => {
                    let (name, next) = Self::read_ident(&chars, pos + 1);
                    if name.is_empty() {
                        return Err(TokenError::selector(full, "expected class name after '.'"));
                    }
                    current.classes.push(name);
                    pos = next;
                }
                '#' => {
                    let (name, next) = Self::read_ident(&chars, pos + 1);
                    if name.is_empty() {
                        return Err(TokenError::selector(full, "expected id after '#'"));
                    }
                    current.id = Some(name);
                    pos = next;
                }
                '[' => {
                    let close = chars[pos..]
                        .iter()
                        .position(|&ch| ch == ']')
                        .map(|offset| pos + offset)
                        .ok_or_else(|| TokenError::selector(full, "unclosed '['"))?;
                    let body: String = chars[pos + 1..close].iter().collect();
                    current.attrs.push(Self::parse_attr(full, &body)?);
                    pos = close + 1;
                }
                '*' => {
                    pos += 1;
                }
                c if c.is_alphanumeric() || c == '-' || c == '_' => {
                    if !current.is_empty() {
                        return Err(TokenError::selector(full, "type selector must come first"));
                    }
                    let (name, next) = Self::read_ident(&chars, pos);
                    current.tag = Some(name);
                    pos = next;
                }
                other => {
                    return Err(TokenError::selector(
                        full,
                        format!("unexpected character '{}'", other),
                    ));
                }
            }
        }

        if !current.is_empty() || part.ends_with('*') {
            chain.push(current);
        }
        if chain.is_empty() {
            return Err(TokenError::selector(full, "no element selector"));
        }
        Ok(chain)
    }

    fn read_ident(chars: &[char], start: usize) -> (String, usize) {
        let mut end = start;
        while end < chars.len()
            && (chars[end].is_alphanumeric() || chars[end] == '-' || chars[end] == '_')
        {
            end += 1;
        }
        (chars[start..end].iter().collect(), end)
    }

    fn parse_attr(full: &str, body: &str) -> Result<AttrSelector> {
        let body = body.trim();
        let Some(eq) = body.find('=') else {
            if body.is_empty() {
                return Err(TokenError::selector(full, "empty attribute selector"));
            }
            return Ok(AttrSelector {
                name: body.to_string(),
                op: AttrOp::Exists,
            });
        };

        let (lhs, value) = (&body[..eq], &body[eq + 1..]);
        let value = value
            .trim()
            .trim_matches(|c| c == '"' || c == '\'')
            .to_string();
        let (name, op) = match lhs.chars().last() {
            Some('*') => (&lhs[..lhs.len() - 1], AttrOp::Contains(value)),
            Some('^') => (&lhs[..lhs.len() - 1], AttrOp::Prefix(value)),
            Some('$') => (&lhs[..lhs.len() - 1], AttrOp::Suffix(value)),
            Some('~') | Some('|') => {
                return Err(TokenError::selector(full, "unsupported attribute operator"));
            }
            _ => (lhs, AttrOp::Equals(value)),
        };

        let name = name.trim();
        if name.is_empty() {
            return Err(TokenError::selector(full, "missing attribute name"));
        }
        Ok(AttrSelector {
            name: name.to_string(),
            op,
        })
    }

    /// Whether `node`, with the given ancestor chain (root first), matches
    pub fn matches(&self, node: &DomNode, ancestors: &[&DomNode]) -> bool {
        self.alternatives.iter().any(|chain| {
            let Some((last, rest)) = chain.split_last() else {
                return false;
            };
            if !last.matches(node) {
                return false;
            }
            // Right-to-left, each compound takes the nearest matching ancestor
            let mut remaining = ancestors.iter().rev();
            rest.iter()
                .rev()
                .all(|compound| remaining.any(|ancestor| compound.matches(ancestor)))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page() -> DomSnapshot {
        DomSnapshot::new(
            DomNode::new("body")
                .child(
                    DomNode::new("header").child(
                        DomNode::new("nav")
                            .attr("class", "navbar main-nav")
                            .child(DomNode::new("a").attr("href", "/").with_text("Home"))
                            .child(DomNode::new("a").attr("href", "/docs").with_text("Docs")),
                    ),
                )
                .child(
                    DomNode::new("section")
                        .attr("id", "intro")
                        .attr("class", "hero-banner")
                        .child(DomNode::new("h1").with_text("  Build   faster ")),
                ),
        )
    }

    #[test]
    fn test_type_class_id_queries() {
        let page = page();
        assert_eq!(page.query_all("a").len(), 2);
        assert_eq!(page.query_all(".navbar").len(), 1);
        assert_eq!(page.query_all("nav.main-nav").len(), 1);
        assert_eq!(page.query_all("#intro").len(), 1);
        assert_eq!(page.query_all("body").len(), 1);
        assert!(page.query_all(".nav").is_empty());
    }

    #[test]
    fn test_attribute_operators() {
        let page = page();
        assert_eq!(page.query_all("[href]").len(), 2);
        assert_eq!(page.query_all("[href=\"/docs\"]").len(), 1);
        assert_eq!(page.query_all("[class*=hero]").len(), 1);
        assert_eq!(page.query_all("[class^=navbar]").len(), 1);
        assert_eq!(page.query_all("[href$=docs]").len(), 1);
        assert!(page.query_all("[role=navigation]").is_empty());
    }

    #[test]
    fn test_descendant_and_lists() {
        let page = page();
        assert_eq!(page.query_all("header nav").len(), 1);
        assert_eq!(page.query_all("header a").len(), 2);
        assert!(page.query_all("section a").is_empty());
        // a node matching two alternatives is returned once, in document order
        let both = page.query_all("h1, nav, .navbar");
        assert_eq!(both.len(), 2);
        assert!(both[0].is_tag("nav"));
        assert!(both[1].is_tag("h1"));
    }

    #[test]
    fn test_scoped_query_excludes_self() {
        let page = page();
        let nav = page.query_all("nav")[0];
        assert_eq!(nav.query_all("a").len(), 2);
        assert!(nav.query_all("nav").is_empty());
    }

    #[test]
    fn test_sibling_groups() {
        let page = page();
        let groups = page.query_siblings("a");
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].len(), 2);

        // header and section share the body, the h1 sits alone under section
        let groups = page.query_siblings("header, section, h1");
        let sizes: Vec<usize> = groups.iter().map(Vec::len).collect();
        assert_eq!(sizes, vec![2, 1]);

        assert!(page.query_siblings("body").is_empty());
        assert!(page.query_siblings("nav > a").is_empty());
    }

    #[test]
    fn test_text_content_normalized() {
        let page = page();
        assert_eq!(page.query_all("section")[0].text_content(), "Build faster");
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(matches!(
            Selector::parse("nav > a"),
            Err(TokenError::Selector { .. })
        ));
        assert!(Selector::parse("a,").is_err());
        assert!(Selector::parse("[class").is_err());
        assert!(Selector::parse("div.").is_err());
        assert!(page().query_all("nav > a").is_empty());
    }

    #[test]
    fn test_deserialize_snapshot() {
        let json = r#"{
            "tag": "body",
            "children": [{"tag": "form", "attributes": {"role": "search"},
                          "children": [{"tag": "input", "attributes": {"type": "search"}}]}]
        }"#;
        let snapshot: DomSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.query_all("form [type=search]").len(), 1);
    }
}
