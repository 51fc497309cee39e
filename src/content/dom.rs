//! Owned document tree used by the extractor.
//!
//! Pages are parsed with `scraper` and copied into [`DomNode`], dropping
//! comments, doctypes and every element in [`STRIPPED_TAGS`] on the way.

use ego_tree::NodeRef;
use scraper::{Html, Node};

/// Elements removed at any depth before extraction
pub const STRIPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "nav", "footer", "header", "aside", "noscript", "link", "meta",
];

/// Nesting depth past which a subtree is flattened into its text
const MAX_DEPTH: usize = 256;

/// Tag given to the synthetic root returned by [`parse_document`]
pub const DOCUMENT_TAG: &str = "#document";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomNode {
    Text(String),
    Element(Element),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub children: Vec<DomNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind<'a> {
    Text,
    Element(&'a str),
}

impl DomNode {
    pub fn kind(&self) -> NodeKind<'_> {
        match self {
            DomNode::Text(_) => NodeKind::Text,
            DomNode::Element(el) => NodeKind::Element(&el.tag),
        }
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            DomNode::Element(el) => Some(&el.tag),
            DomNode::Text(_) => None,
        }
    }

    pub fn children(&self) -> &[DomNode] {
        match self {
            DomNode::Element(el) => &el.children,
            DomNode::Text(_) => &[],
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            DomNode::Element(el) => el
                .attrs
                .iter()
                .find(|(key, _)| key.eq_ignore_ascii_case(name))
                .map(|(_, value)| value.as_str()),
            DomNode::Text(_) => None,
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.attr("class")
            .map(|classes| classes.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    /// Concatenated text of every descendant text node
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            DomNode::Text(text) => out.push_str(text),
            DomNode::Element(el) => el.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// First node in document order (self included) matching `pred`
    pub fn find_first<F>(&self, pred: &F) -> Option<&DomNode>
    where
        F: Fn(&DomNode) -> bool,
    {
        if pred(self) {
            return Some(self);
        }
        self.children().iter().find_map(|child| child.find_first(pred))
    }

    /// Number of descendants (self excluded) matching `pred`
    pub fn count_descendants<F>(&self, pred: &F) -> usize
    where
        F: Fn(&DomNode) -> bool,
    {
        self.children()
            .iter()
            .map(|child| usize::from(pred(child)) + child.count_descendants(pred))
            .sum()
    }

    pub fn find_tag(&self, tag: &str) -> Option<&DomNode> {
        self.find_first(&|node: &DomNode| node.tag() == Some(tag))
    }
}

/// Parse a full HTML document into a [`DomNode`] rooted at [`DOCUMENT_TAG`]
pub fn parse_document(html: &str) -> DomNode {
    let document = Html::parse_document(html);
    let children = document
        .tree
        .root()
        .children()
        .filter_map(|child| convert(child, 0))
        .collect();

    DomNode::Element(Element {
        tag: DOCUMENT_TAG.to_string(),
        attrs: Vec::new(),
        children,
    })
}

fn is_stripped(node: &NodeRef<'_, Node>) -> bool {
    match node.value() {
        Node::Element(el) => STRIPPED_TAGS.contains(&el.name()),
        _ => false,
    }
}

fn convert(node: NodeRef<'_, Node>, depth: usize) -> Option<DomNode> {
    match node.value() {
        Node::Text(text) => Some(DomNode::Text(text.text.to_string())),
        Node::Element(element) => {
            if is_stripped(&node) {
                return None;
            }
            let children = if depth >= MAX_DEPTH {
                vec![DomNode::Text(flatten_text(node))]
            } else {
                node.children()
                    .filter_map(|child| convert(child, depth + 1))
                    .collect()
            };
            Some(DomNode::Element(Element {
                tag: element.name().to_ascii_lowercase(),
                attrs: element
                    .attrs()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect(),
                children,
            }))
        }
        _ => None,
    }
}

/// Text of a too-deep subtree, skipping anything under a stripped element
fn flatten_text(node: NodeRef<'_, Node>) -> String {
    let mut out = String::new();
    let mut stack = vec![node];
    while let Some(current) = stack.pop() {
        match current.value() {
            Node::Text(text) => {
                out.push_str(&text.text);
                out.push(' ');
            }
            Node::Element(_) if is_stripped(&current) => {}
            _ => stack.extend(current.children().rev()),
        }
    }
    out
}
