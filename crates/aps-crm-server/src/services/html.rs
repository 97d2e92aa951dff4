//! HTML helpers for email bodies and WordPress excerpts

use scraper::{Html, Node, Selector};

/// Elements whose boundaries separate words in rendered text
const BLOCK_ELEMENTS: &[&str] = &[
    "address", "article", "blockquote", "br", "dd", "div", "dl", "dt", "footer", "h1", "h2",
    "h3", "h4", "h5", "h6", "header", "hr", "li", "ol", "p", "pre", "section", "table", "td",
    "th", "tr", "ul",
];

const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "title"];

/// Distinct `cid:` names referenced by `<img>` tags, in document order
pub fn cid_references(html: &str) -> Vec<String> {
    let Ok(selector) = Selector::parse(r#"img[src^="cid:"]"#) else {
        return Vec::new();
    };
    let document = Html::parse_document(html);

    let mut names: Vec<String> = Vec::new();
    for img in document.select(&selector) {
        let Some(name) = img
            .value()
            .attr("src")
            .and_then(|src| src.strip_prefix("cid:"))
            .map(str::trim)
            .filter(|name| !name.is_empty())
        else {
            continue;
        };
        if !names.iter().any(|n| n == name) {
            names.push(name.to_string());
        }
    }
    names
}

/// Text content of an HTML fragment with whitespace collapsed
pub fn html_to_text(fragment: &str) -> String {
    let parsed = Html::parse_fragment(fragment);

    let mut raw = String::with_capacity(fragment.len());
    for node in parsed.root_element().descendants() {
        match node.value() {
            Node::Text(text) => {
                let hidden = node
                    .parent()
                    .and_then(|parent| parent.value().as_element().map(|e| e.name()))
                    .is_some_and(|name| HIDDEN_ELEMENTS.contains(&name));
                if !hidden {
                    raw.push_str(text);
                }
            }
            Node::Element(element) if BLOCK_ELEMENTS.contains(&element.name()) => raw.push(' '),
            _ => {}
        }
    }

    raw.split_whitespace().collect::<Vec<_>>().join(" ")
}
