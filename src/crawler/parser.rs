//! HTML parser for extracting hyperlinks
//!
//! Pulls the raw `href` value out of every anchor tag in a page body.
//! Resolution and same-site filtering happen in the engine, so values are
//! returned exactly as they appear in the markup.

use scraper::{Html, Selector};

/// Extracts every anchor-tag href from an HTML body
///
/// # Arguments
///
/// * `html` - The HTML content to parse
///
/// # Returns
///
/// Raw href attribute values, in document order
///
/// # Example
///
/// ```
/// use sitepulse::crawler::extract_links;
///
/// let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
/// assert_eq!(extract_links(html), vec!["/page".to_string()]);
/// ```
pub fn extract_links(html: &str) -> Vec<String> {
    let document = Html::parse_document(html);
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            if let Some(href) = element.value().attr("href") {
                links.push(href.to_string());
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_single_link() {
        let html = r#"<html><body><a href="/page">Link</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/page"]);
    }

    #[test]
    fn test_extract_multiple_links_in_document_order() {
        let html = r#"
            <html>
            <body>
                <a href="/page1">One</a>
                <a href="https://other.com/page2">Two</a>
                <a href="/page3">Three</a>
            </body>
            </html>
        "#;
        assert_eq!(
            extract_links(html),
            vec!["/page1", "https://other.com/page2", "/page3"]
        );
    }

    #[test]
    fn test_anchor_without_href_skipped() {
        let html = r#"<html><body><a name="top">Anchor</a><a href="/x">X</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/x"]);
    }

    #[test]
    fn test_hrefs_returned_raw() {
        // No resolution or filtering at this layer.
        let html = r##"<html><body>
            <a href="mailto:a@b.com">Mail</a>
            <a href="#section">Jump</a>
            <a href="page.html">Relative</a>
        </body></html>"##;
        assert_eq!(
            extract_links(html),
            vec!["mailto:a@b.com", "#section", "page.html"]
        );
    }

    #[test]
    fn test_links_with_extra_attributes() {
        let html = r#"<html><body><a class="nav" data-x="1" href="/about" target="_blank">About</a></body></html>"#;
        assert_eq!(extract_links(html), vec!["/about"]);
    }

    #[test]
    fn test_no_links() {
        let html = r#"<html><body><p>No links here</p></body></html>"#;
        assert!(extract_links(html).is_empty());
    }

    #[test]
    fn test_malformed_html_still_parses() {
        let html = r#"<body><a href="/only">Unclosed"#;
        assert_eq!(extract_links(html), vec!["/only"]);
    }
}
