use html5ever::parse_document;
use html5ever::tendril::{StrTendril, TendrilSink};
use markup5ever_rcdom::{Handle, NodeData, RcDom};
use pulldown_cmark::{Event, Parser, Tag};
use std::collections::HashSet;
use url::Url;

/// Extract every link target from a markdown document, resolved to absolute
/// URLs and deduplicated in first-seen order.
///
/// Relative references are resolved against the project's "blob" base, the
/// branch-qualified address under which the project's file tree lives:
/// `{project_base_url}/blob/{branch}/{reference}`. `mailto` references and
/// fragment-only references (which address the document itself) are dropped.
/// A single unparseable reference never aborts extraction.
pub fn extract_markdown_links(content: &str, project_base_url: &str, branch: &str) -> Vec<String> {
    let blob_base = format!("{}/blob/{}", project_base_url.trim_end_matches('/'), branch);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for event in Parser::new(content) {
        let raw = match event {
            Event::Start(Tag::Link(_, dest, _)) | Event::Start(Tag::Image(_, dest, _)) => {
                dest.to_string()
            }
            _ => continue,
        };
        if let Some(target) = resolve_markdown_reference(&raw, &blob_base) {
            if seen.insert(target.clone()) {
                links.push(target);
            }
        }
    }
    links
}

fn resolve_markdown_reference(raw: &str, blob_base: &str) -> Option<String> {
    if raw.is_empty() || raw.starts_with('#') || raw.starts_with("mailto") {
        return None;
    }
    let target = if raw.starts_with("http") {
        raw.to_string()
    } else {
        format!("{}/{}", blob_base, raw.trim_start_matches('/'))
    };
    match Url::parse(&target) {
        Ok(_) => Some(target),
        Err(e) => {
            debug!("skipping malformed reference {:?}: {}", raw, e);
            None
        }
    }
}

/// Extract the target of every anchor element with an `href` attribute from
/// an HTML page, deduplicated in first-seen order.
///
/// A root-relative href is rewritten against the page's own scheme and host;
/// anything that does not validate as an absolute URL afterwards is skipped.
pub fn extract_html_links(content: &str, base_url: &Url) -> Vec<String> {
    let tendril = StrTendril::from(content);
    let rc_dom = parse_document(RcDom::default(), Default::default()).one(tendril);

    let mut hrefs = Vec::new();
    walk_anchors(&mut hrefs, &rc_dom.document);

    let mut seen = HashSet::new();
    let mut links = Vec::new();
    for href in hrefs {
        if let Some(target) = resolve_html_reference(&href, base_url) {
            if seen.insert(target.clone()) {
                links.push(target);
            }
        }
    }
    links
}

/// Recursively collect `href` attribute values of anchor elements.
/// No extra exit condition is needed because the document is a tree.
fn walk_anchors(hrefs: &mut Vec<String>, node: &Handle) {
    if let NodeData::Element {
        ref name,
        ref attrs,
        ..
    } = node.data
    {
        if name.local.as_ref() == "a" {
            for attr in attrs.borrow().iter() {
                if attr.name.local.as_ref() == "href" {
                    hrefs.push(attr.value.to_string());
                }
            }
        }
    }

    for child in node.children.borrow().iter() {
        walk_anchors(hrefs, child);
    }
}

fn resolve_html_reference(href: &str, base_url: &Url) -> Option<String> {
    if href.starts_with("mailto") {
        return None;
    }
    let target = if href.starts_with('/') {
        format!("{}://{}{}", base_url.scheme(), base_url.host_str()?, href)
    } else {
        href.to_string()
    };
    match Url::parse(&target) {
        Ok(_) => Some(target),
        Err(e) => {
            debug!("skipping href {:?}: {}", href, e);
            None
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    const PROJECT_BASE_URL: &str = "https://github.com/user/project/";
    const BRANCH: &str = "main";

    fn markdown_links(content: &str) -> Vec<String> {
        extract_markdown_links(content, PROJECT_BASE_URL, BRANCH)
    }

    #[test]
    fn test_markdown_absolute_link() {
        let links = markdown_links("Content with a link to [Google](https://www.google.com)");
        assert_eq!(links, vec!["https://www.google.com".to_string()]);
    }

    #[test]
    fn test_markdown_two_links() {
        let links = markdown_links(
            "Links to [Google](https://www.google.com) and [GitHub](https://github.com)",
        );
        assert_eq!(
            links,
            vec![
                "https://www.google.com".to_string(),
                "https://github.com".to_string()
            ]
        );
    }

    #[test]
    fn test_markdown_no_links() {
        let links = markdown_links("Content without any links");
        assert!(links.is_empty());
    }

    #[test]
    fn test_markdown_relative_link() {
        let links = markdown_links("A relative link to [APITesterApp](/APITesterApp)");
        assert_eq!(
            links,
            vec!["https://github.com/user/project/blob/main/APITesterApp".to_string()]
        );
    }

    #[test]
    fn test_markdown_relative_link_without_slash() {
        let links = markdown_links("A relative link to [APITesterApp](APITesterApp)");
        assert_eq!(
            links,
            vec!["https://github.com/user/project/blob/main/APITesterApp".to_string()]
        );
    }

    #[test]
    fn test_markdown_relative_and_absolute_links() {
        let links =
            markdown_links("See [APITesterApp](/APITesterApp) and [GitHub](https://github.com)");
        assert_eq!(
            links,
            vec![
                "https://github.com/user/project/blob/main/APITesterApp".to_string(),
                "https://github.com".to_string()
            ]
        );
    }

    #[test]
    fn test_markdown_blob_base_resolution() {
        let links = extract_markdown_links(
            "[Google](https://www.google.com) and [Local](/Local)",
            "https://example.com/proj",
            "main",
        );
        assert_eq!(
            links,
            vec![
                "https://www.google.com".to_string(),
                "https://example.com/proj/blob/main/Local".to_string()
            ]
        );
    }

    #[test]
    fn test_markdown_duplicates_emitted_once() {
        let links = markdown_links(
            "[One](https://example.com/page) and [Two](https://example.com/page) again",
        );
        assert_eq!(links, vec!["https://example.com/page".to_string()]);
    }

    #[test]
    fn test_markdown_mailto_skipped() {
        let links = markdown_links("Get in touch - [Contact Us](mailto:test@test.com)");
        assert!(links.is_empty());
    }

    #[test]
    fn test_markdown_fragment_skipped() {
        let links = markdown_links("Jump to the [usage section](#usage)");
        assert!(links.is_empty());
    }

    #[test]
    fn test_markdown_image_target_extracted() {
        let links = markdown_links("![build badge](https://img.example.com/badge.svg)");
        assert_eq!(links, vec!["https://img.example.com/badge.svg".to_string()]);
    }

    #[test]
    fn test_html_anchor_links() {
        let base_url = Url::parse("https://example.org/start").unwrap();
        let input = r#"<html>
                <div class="row">
                    <a href="https://github.com/user/project/">project</a>
                    <a href="/docs">docs</a>
                </div>
            </html>"#;

        let links = extract_html_links(input, &base_url);
        assert_eq!(
            links,
            vec![
                "https://github.com/user/project/".to_string(),
                "https://example.org/docs".to_string()
            ]
        );
    }

    #[test]
    fn test_html_no_anchors() {
        let base_url = Url::parse("https://example.org").unwrap();
        let links = extract_html_links("<html><p>plain text</p></html>", &base_url);
        assert!(links.is_empty());
    }

    #[test]
    fn test_html_mailto_skipped() {
        let base_url = Url::parse("https://example.org").unwrap();
        let links = extract_html_links(
            r#"<a href="mailto:someone@example.org">mail</a>"#,
            &base_url,
        );
        assert!(links.is_empty());
    }

    #[test]
    fn test_html_invalid_href_skipped() {
        let base_url = Url::parse("https://example.org").unwrap();
        let input = r#"
            <a href="docs/readme">not absolute</a>
            <a href="https://example.org/valid">valid</a>
        "#;
        let links = extract_html_links(input, &base_url);
        assert_eq!(links, vec!["https://example.org/valid".to_string()]);
    }

    #[test]
    fn test_html_duplicates_emitted_once() {
        let base_url = Url::parse("https://example.org").unwrap();
        let input = r#"
            <a href="/page">one</a>
            <a href="/page">two</a>
        "#;
        let links = extract_html_links(input, &base_url);
        assert_eq!(links, vec!["https://example.org/page".to_string()]);
    }

    #[test]
    fn test_html_ignores_non_anchor_urls() {
        let base_url = Url::parse("https://example.org").unwrap();
        let input = r#"
            <img src="https://example.org/logo.png" />
            <a href="https://example.org/linked">linked</a>
        "#;
        let links = extract_html_links(input, &base_url);
        assert_eq!(links, vec!["https://example.org/linked".to_string()]);
    }
}
