//! HTML content extraction: readable text, a best-effort title, and
//! citation metadata markers.
//!
//! Walks the parsed DOM from the most specific content root available
//! (`article`, `main`, `[role=main]`, then `body`), skipping boilerplate
//! subtrees such as scripts, navigation and footers. Length limits are the
//! caller's concern: text is returned in full.

use crate::error::{Result, SearchError};
use crate::types::PageContent;
use scraper::{ElementRef, Html, Node, Selector};

/// Elements whose whole subtree is dropped from the extracted text.
const SKIPPED_ELEMENTS: &[&str] = &[
    "script", "style", "nav", "footer", "header", "aside", "noscript", "svg", "iframe", "template",
];

/// Elements that end a line of text when rendered.
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "section", "article", "main", "li", "ul", "ol", "h1", "h2", "h3", "h4", "h5", "h6",
    "blockquote", "pre", "tr", "table", "br", "figcaption", "dd", "dt",
];

/// Content roots in priority order.
const CONTENT_ROOTS: &[&str] = &["article", "main", "[role=\"main\"]", "body"];

/// Titles this short are usually site chrome ("Home", "Menu") and are skipped.
const MIN_TITLE_CHARS: usize = 6;

/// Strategies for finding a page title inside HTML, tried in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TitleStrategy {
    /// The `<title>` element.
    TitleTag,
    /// `<meta property="og:title" content="…">`.
    OpenGraph,
    /// `<meta name="title" content="…">`.
    MetaTitle,
    /// Text of the first `<h1>`.
    FirstHeading,
}

impl TitleStrategy {
    /// All strategies in the order they are attempted.
    pub const ORDER: [TitleStrategy; 4] = [
        Self::TitleTag,
        Self::OpenGraph,
        Self::MetaTitle,
        Self::FirstHeading,
    ];

    fn selector(self) -> &'static str {
        match self {
            Self::TitleTag => "title",
            Self::OpenGraph => "meta[property=\"og:title\"]",
            Self::MetaTitle => "meta[name=\"title\"]",
            Self::FirstHeading => "h1",
        }
    }

    fn apply(self, document: &Html) -> Option<String> {
        let selector = Selector::parse(self.selector()).ok()?;
        let element = document.select(&selector).next()?;
        let raw = match self {
            Self::TitleTag | Self::FirstHeading => element.text().collect::<String>(),
            Self::OpenGraph | Self::MetaTitle => element.value().attr("content")?.to_owned(),
        };
        let title = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        (title.chars().count() >= MIN_TITLE_CHARS).then_some(title)
    }
}

/// Extract readable text content, title and metadata markers from raw HTML.
///
/// # Errors
///
/// Returns [`SearchError::Parse`] if the page has no extractable body text.
pub fn extract_content(html: &str, url: &str) -> Result<PageContent> {
    let document = Html::parse_document(html);

    let text = normalise_whitespace(&extract_main_text(&document));
    if text.is_empty() {
        return Err(SearchError::Parse("no extractable content found".into()));
    }

    Ok(PageContent {
        url: url.to_owned(),
        title: find_title(&document),
        word_count: text.split_whitespace().count(),
        text,
        metadata_markers: metadata_markers(&document),
    })
}

/// Find a title in raw HTML without extracting the body.
///
/// Used when body extraction fails but the markup still names the page.
pub fn title_from_html(html: &str) -> Option<String> {
    find_title(&Html::parse_document(html))
}

fn find_title(document: &Html) -> Option<String> {
    TitleStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.apply(document))
}

/// Collect text from the first content root that yields any.
fn extract_main_text(document: &Html) -> String {
    for root in CONTENT_ROOTS {
        let Ok(selector) = Selector::parse(root) else {
            continue;
        };
        if let Some(element) = document.select(&selector).next() {
            let mut text = String::new();
            collect_text(element, &mut text);
            if !text.trim().is_empty() {
                return text;
            }
        }
    }
    String::new()
}

fn collect_text(element: ElementRef<'_>, out: &mut String) {
    for child in element.children() {
        match child.value() {
            Node::Text(text) => out.push_str(text),
            Node::Element(el) => {
                let name = el.name();
                if SKIPPED_ELEMENTS.contains(&name) {
                    continue;
                }
                if let Some(child_el) = ElementRef::wrap(child) {
                    collect_text(child_el, out);
                }
                out.push(if BLOCK_ELEMENTS.contains(&name) { '\n' } else { ' ' });
            }
            _ => {}
        }
    }
}

/// Names of scholarly metadata present in the markup, sorted and unique.
fn metadata_markers(document: &Html) -> Vec<String> {
    let mut markers = Vec::new();

    if let Ok(selector) = Selector::parse("meta[name]") {
        for meta in document.select(&selector) {
            let Some(name) = meta.value().attr("name") else {
                continue;
            };
            let name = name.to_ascii_lowercase();
            if name.starts_with("citation_")
                || name.starts_with("dc.")
                || name.starts_with("dcterms.")
                || name.starts_with("prism.")
            {
                markers.push(name);
            }
        }
    }

    if let Ok(selector) = Selector::parse("script[type=\"application/ld+json\"]") {
        if document.select(&selector).next().is_some() {
            markers.push("json-ld".to_owned());
        }
    }

    markers.sort();
    markers.dedup();
    markers
}

/// Collapse runs of spaces within lines and runs of blank lines to one.
fn normalise_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_blank = false;

    for line in text.lines() {
        let collapsed = line.split_whitespace().collect::<Vec<_>>().join(" ");
        if collapsed.is_empty() {
            pending_blank = true;
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if pending_blank {
                out.push('\n');
            }
        }
        pending_blank = false;
        out.push_str(&collapsed);
    }

    out
}
