//! # Presenter: Render, Export, Cite
//!
//! Pure formatting over [`AttributedNode`]s. Presenters never see the raw
//! store: whatever they receive has already passed enforcement, so the only
//! question left is whether a bundle is present.
//!
//! - With a bundle, every output carries license name, source link and
//!   creator, in that order.
//! - Without a bundle, no attribution block is emitted at all.
//! - JSON export is verbatim; attribution is never stripped.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::accessor::AttributedNode;

/// Citation format for [`export_citation`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CitationStyle {
    /// `"{creator}. {title}. Retrieved from {sourceLink}. Licensed under {licenseName}."`
    #[default]
    Apa,
    /// `"{creator}, \"{title}\", {sourceLink} ({licenseName})"`
    Inline,
}

impl CitationStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apa => "apa",
            Self::Inline => "inline",
        }
    }
}

/// `"apa"` selects APA; any other name selects the inline format.
impl From<&str> for CitationStyle {
    fn from(s: &str) -> Self {
        if s == "apa" {
            Self::Apa
        } else {
            Self::Inline
        }
    }
}

impl From<String> for CitationStyle {
    fn from(s: String) -> Self {
        Self::from(s.as_str())
    }
}

impl From<CitationStyle> for String {
    fn from(style: CitationStyle) -> Self {
        style.as_str().to_string()
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Render as an HTML fragment with an attribution footer for CC content.
///
/// The source link is an anchor only when it is an `http(s)` URL; any other
/// scheme is shown as text.
///
/// Text and attribute values are HTML-escaped.
pub fn render_html(node: &AttributedNode) -> String {
    let mut html = format!(
        "<div class=\"discourse-node\" data-id=\"{}\">\n",
        escape_html(node.id().as_str())
    );
    html.push_str(&format!("  <h3>{}</h3>\n", escape_html(node.title())));
    html.push_str(&format!(
        "  <div class=\"content\">{}</div>\n",
        escape_html(node.content())
    ));

    if let Some(attr) = node.attribution() {
        let source = if is_web_link(attr.source_link()) {
            let link = escape_html(attr.source_link());
            format!("<a href=\"{link}\">{link}</a>")
        } else {
            escape_html(attr.source_link())
        };
        html.push_str("  <div class=\"attribution-required\">\n");
        html.push_str(&format!(
            "    <p><strong>License:</strong> {}</p>\n",
            escape_html(attr.license_name())
        ));
        html.push_str(&format!(
            "    <p><strong>Source:</strong> {source}</p>\n"
        ));
        html.push_str(&format!(
            "    <p><strong>Creator:</strong> {}</p>\n",
            escape_html(attr.creator())
        ));
        html.push_str("  </div>\n");
    }

    html.push_str("</div>");
    html
}

/// Render as Markdown with an attribution section for CC content.
pub fn render_markdown(node: &AttributedNode) -> String {
    let mut md = format!("# {}\n\n{}\n\n", node.title(), node.content());

    if let Some(attr) = node.attribution() {
        md.push_str("---\n\n**Attribution Required**\n\n");
        md.push_str(&format!("- License: {}\n", attr.license_name()));
        if is_web_link(attr.source_link()) {
            md.push_str(&format!(
                "- Source: [{link}]({link})\n",
                link = attr.source_link()
            ));
        } else {
            md.push_str(&format!("- Source: {}\n", attr.source_link()));
        }
        md.push_str(&format!("- Creator: {}\n", attr.creator()));
    }

    md
}

/// Export nodes as pretty-printed JSON (two-space indent).
pub fn export_json(nodes: &[AttributedNode]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(nodes)
}

/// Format a citation for `node` in `style`.
///
/// Without a bundle the citation names only the title and says the source
/// is unavailable.
pub fn export_citation(node: &AttributedNode, style: CitationStyle) -> String {
    let Some(attr) = node.attribution() else {
        return format!("{} (source information not available)", node.title());
    };

    match style {
        CitationStyle::Apa => format!(
            "{}. {}. Retrieved from {}. Licensed under {}.",
            attr.creator(),
            node.title(),
            attr.source_link(),
            attr.license_name()
        ),
        CitationStyle::Inline => format!(
            "{}, \"{}\", {} ({})",
            attr.creator(),
            node.title(),
            attr.source_link(),
            attr.license_name()
        ),
    }
}

/// Only `http://` and `https://` links are rendered clickable.
fn is_web_link(link: &str) -> bool {
    let lower = link.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;

    fn cc_node(title: &str) -> AttributedNode {
        cc_node_linked(title, "L")
    }

    fn cc_node_linked(title: &str, link: &str) -> AttributedNode {
        let mut n = Node::new("pages:evidence-001");
        n.title = Some(title.to_string());
        n.content = Some("We observed 2x increase in migration speed...".to_string());
        n.license_name = Some("CC BY 4.0".to_string());
        n.source_link = Some(link.to_string());
        n.creator = Some("Jane Smith".to_string());
        AttributedNode::new(&n).unwrap()
    }

    fn plain_node() -> AttributedNode {
        let mut n = Node::new("pages:evidence-002");
        n.title = Some("Temperature affects enzyme activity".to_string());
        n.content = Some("Enzyme activity peaks at 37°C...".to_string());
        n.license_name = Some("All Rights Reserved".to_string());
        AttributedNode::new(&n).unwrap()
    }

    #[test]
    fn test_apa_citation_exact() {
        assert_eq!(
            export_citation(&cc_node("T"), CitationStyle::Apa),
            "Jane Smith. T. Retrieved from L. Licensed under CC BY 4.0."
        );
    }

    #[test]
    fn test_other_style_citation_exact() {
        assert_eq!(
            export_citation(&cc_node("T"), CitationStyle::from("mla")),
            "Jane Smith, \"T\", L (CC BY 4.0)"
        );
    }

    #[test]
    fn test_citation_without_bundle() {
        assert_eq!(
            export_citation(&plain_node(), CitationStyle::Apa),
            "Temperature affects enzyme activity (source information not available)"
        );
    }

    #[test]
    fn test_style_parsing() {
        assert_eq!(CitationStyle::from("apa"), CitationStyle::Apa);
        assert_eq!(CitationStyle::from("APA"), CitationStyle::Inline);
        assert_eq!(CitationStyle::from("chicago"), CitationStyle::Inline);
    }

    #[test]
    fn test_html_attribution_block_in_order() {
        let html = render_html(&cc_node_linked("Cell migration", "https://lab.example.com/d1"));
        let license = html.find("License:").unwrap();
        let source = html.find("Source:").unwrap();
        let creator = html.find("Creator:").unwrap();
        assert!(license < source && source < creator);
        assert!(html.contains(
            "<a href=\"https://lab.example.com/d1\">https://lab.example.com/d1</a>"
        ));
        assert!(html.contains("class=\"attribution-required\""));
        assert!(html.starts_with("<div class=\"discourse-node\" data-id=\"pages:evidence-001\">"));
        assert!(html.ends_with("</div>"));
    }

    #[test]
    fn test_html_without_bundle_has_no_block() {
        let html = render_html(&plain_node());
        assert!(!html.contains("attribution-required"));
        assert!(!html.contains("License:"));
        assert!(html.contains("<h3>Temperature affects enzyme activity</h3>"));
    }

    #[test]
    fn test_html_escapes_text() {
        let html = render_html(&cc_node("<script>alert(1)</script>"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_html_non_web_link_is_plain_text() {
        let html = render_html(&cc_node_linked("T", "javascript:alert(1)"));
        assert!(!html.contains("<a "));
        assert!(!html.contains("href"));
        assert!(html.contains("<p><strong>Source:</strong> javascript:alert(1)</p>"));

        let html = render_html(&cc_node_linked("T", "HTTPS://Example.com/x"));
        assert!(html.contains("<a href=\"HTTPS://Example.com/x\">"));
    }

    #[test]
    fn test_markdown_non_web_link_is_plain_text() {
        let md = render_markdown(&cc_node_linked("T", "javascript:alert(1)"));
        assert!(md.contains("- Source: javascript:alert(1)\n"));
        assert!(!md.contains("]("));
    }

    #[test]
    fn test_markdown_attribution_section() {
        let md = render_markdown(&cc_node_linked("Cell migration", "https://x.org/d"));
        assert!(md.starts_with("# Cell migration\n\n"));
        assert!(md.contains("**Attribution Required**"));
        assert!(md.contains(
            "- License: CC BY 4.0\n- Source: [https://x.org/d](https://x.org/d)\n- Creator: Jane Smith\n"
        ));
    }

    #[test]
    fn test_markdown_without_bundle() {
        let md = render_markdown(&plain_node());
        assert_eq!(
            md,
            "# Temperature affects enzyme activity\n\nEnzyme activity peaks at 37°C...\n\n"
        );
    }

    #[test]
    fn test_export_json_keeps_attribution() {
        let json = export_json(&[cc_node("T"), plain_node()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed[0]["_attribution"]["creator"], "Jane Smith");
        assert_eq!(parsed[0]["sourceLink"], "L");
        assert!(parsed[1].get("_attribution").is_none());
        assert!(json.contains("\n  {"));
    }

    #[test]
    fn test_export_json_empty() {
        assert_eq!(export_json(&[]).unwrap(), "[]");
    }
}
