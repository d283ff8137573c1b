//! Content cleaning: regex passes for text artifacts, structural removal for
//! boilerplate elements, then re-serialization of the body subtree.
//!
//! Share-button removal is scoped to the known entry-body containers; a
//! global purge of classes like `.share-btn` would also hit legitimate
//! content outside the main body.

use std::collections::HashSet;
use std::sync::LazyLock;

use ego_tree::{NodeId, NodeRef};
use regex::Regex;
use scraper::{Html, Node, Selector};

use crate::config::ParserConfig;
use crate::error::ParseError;

static COMMENT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<!--[\s\S]*?-->").unwrap());
static RANKING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[１-９一二三四五六七八九十]位：").unwrap());
static BODY_SEL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("body").unwrap());

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Cleans an extracted content fragment and returns it as HTML.
pub fn clean(content: &str, config: &ParserConfig) -> Result<String, ParseError> {
    if content.is_empty() {
        return Err(ParseError::EmptyContent);
    }

    // Text-level passes first: comments (best effort on malformed markers)
    // and the localized ranking artifact.
    let content = COMMENT_RE.replace_all(content, "");
    let content = RANKING_RE.replace_all(&content, "");

    let html = Html::parse_document(&content);
    let removed = removal_set(&html, config);

    let mut out = String::with_capacity(content.len());
    match html.select(&BODY_SEL).next() {
        Some(body) => serialize_children(*body, &removed, &mut out),
        // Fragment without a body subtree: serialize the whole document.
        None => serialize_children(html.tree.root(), &removed, &mut out),
    }

    if out.is_empty() {
        return Err(ParseError::EmptyContent);
    }
    Ok(out)
}

/// Node ids scheduled for removal: the global boilerplate selectors plus the
/// scoped ad/social selectors inside entry-body containers.
fn removal_set(html: &Html, config: &ParserConfig) -> HashSet<NodeId> {
    let mut removed = HashSet::new();
    for selector in &config.remove_selectors {
        if let Ok(sel) = Selector::parse(selector) {
            removed.extend(html.select(&sel).map(|el| el.id()));
        }
    }
    for (scope, children) in &config.scoped_remove {
        let Ok(scope_sel) = Selector::parse(scope) else {
            continue;
        };
        for container in html.select(&scope_sel) {
            for child in children {
                if let Ok(child_sel) = Selector::parse(child) {
                    removed.extend(container.select(&child_sel).map(|el| el.id()));
                }
            }
        }
    }
    removed
}

fn serialize_children(node: NodeRef<'_, Node>, removed: &HashSet<NodeId>, out: &mut String) {
    for child in node.children() {
        serialize_node(child, removed, out);
    }
}

fn serialize_node(node: NodeRef<'_, Node>, removed: &HashSet<NodeId>, out: &mut String) {
    match node.value() {
        Node::Element(element) => {
            if removed.contains(&node.id()) {
                return;
            }
            let name = element.name();
            out.push('<');
            out.push_str(name);
            for (key, value) in element.attrs() {
                out.push(' ');
                out.push_str(key);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            out.push('>');
            if VOID_ELEMENTS.contains(&name) {
                return;
            }
            serialize_children(node, removed, out);
            out.push_str("</");
            out.push_str(name);
            out.push('>');
        }
        Node::Text(text) => out.push_str(&escape_text(&text.text)),
        // Comments were stripped textually; drop any the parser synthesized,
        // along with doctypes and processing instructions.
        Node::Comment(_) | Node::Doctype(_) | Node::ProcessingInstruction(_) => {}
        Node::Document | Node::Fragment => serialize_children(node, removed, out),
    }
}

fn escape_text(s: &str) -> String {
    s.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(s: &str) -> String {
    s.replace('&', "&amp;").replace('"', "&quot;")
}
