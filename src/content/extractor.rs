use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use super::dom::{parse_document, DomNode};

/// Containers rendered on their own lines
const BLOCK_TAGS: &[&str] = &[
    "p", "div", "section", "article", "main", "ul", "ol", "pre", "table", "thead", "tbody",
    "tfoot", "tr", "figure", "figcaption", "dl", "dt", "dd", "details", "summary", "address",
    "form", "fieldset", "body",
];

const LINE_BREAK: &str = "\n";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentMetadata {
    pub word_count: usize,
    pub paragraph_count: usize,
    pub has_images: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractedContent {
    pub content: String,
    pub metadata: ContentMetadata,
    pub title: String,
}

/// Convert an HTML page into readable markdown-like text
pub fn extract_content(html: &str) -> ExtractedContent {
    let document = parse_document(html);

    let title = document
        .find_tag("title")
        .map(|node| node.text_content().trim().to_string())
        .unwrap_or_default();

    let root = select_content_root(&document);
    let image_count = root.count_descendants(&|node: &DomNode| node.tag() == Some("img"));

    let content = normalize_whitespace(&render(root));
    let word_count = content.split_whitespace().count();
    let paragraph_count = content.matches("\n\n").count() + 1;

    ExtractedContent {
        content,
        metadata: ContentMetadata {
            word_count,
            paragraph_count,
            has_images: image_count > 0,
        },
        title,
    }
}

/// First `article`, then `main`, `.content`, `#content`, falling back to `body`
fn select_content_root(document: &DomNode) -> &DomNode {
    document
        .find_tag("article")
        .or_else(|| document.find_tag("main"))
        .or_else(|| document.find_first(&|node: &DomNode| node.has_class("content")))
        .or_else(|| document.find_first(&|node: &DomNode| node.attr("id") == Some("content")))
        .or_else(|| document.find_tag("body"))
        .unwrap_or(document)
}

fn render(node: &DomNode) -> String {
    match node {
        DomNode::Text(text) => text.trim().to_string(),
        DomNode::Element(el) => {
            let inner = render_children(node);
            render_element(&el.tag, node, inner)
        }
    }
}

fn render_children(node: &DomNode) -> String {
    node.children()
        .iter()
        .map(render)
        .filter(|text| text == LINE_BREAK || !text.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn render_element(tag: &str, node: &DomNode, inner: String) -> String {
    if tag == "br" {
        return LINE_BREAK.to_string();
    }

    let trimmed = inner.trim();
    if tag == "a" {
        return match node.attr("href") {
            Some(href) if trimmed.is_empty() => format!("[{}]", href),
            Some(href) => format!("{} [{}]", trimmed, href),
            None => inner,
        };
    }
    if trimmed.is_empty() {
        return String::new();
    }

    match tag {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = tag[1..].parse::<usize>().unwrap_or(1);
            format!("\n{} {}\n", "#".repeat(level), trimmed)
        }
        "li" => format!("\n- {}", trimmed),
        "b" | "strong" => format!("**{}**", trimmed),
        "i" | "em" => format!("*{}*", trimmed),
        "blockquote" => format!("\n> {}\n", trimmed),
        "code" => format!("`{}`", trimmed),
        _ if BLOCK_TAGS.contains(&tag) => format!("\n{}\n", inner),
        _ => inner,
    }
}

fn blank_line_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n\s*\n").expect("static pattern"))
}

fn excess_newlines_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"\n{3,}").expect("static pattern"))
}

fn normalize_whitespace(text: &str) -> String {
    let text = blank_line_pattern().replace_all(text, "\n\n");
    let text = excess_newlines_pattern().replace_all(&text, "\n\n");
    text.trim().to_string()
}
