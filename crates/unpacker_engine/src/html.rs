use scraper::{Html, Selector};
use url::Url;

/// Script references discovered in one packaged HTML document.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PageScripts {
    /// `<script src>` references, resolved relative to the page's location
    /// inside the package.
    pub external: Vec<String>,
    /// Inline `<script>` bodies, in document order.
    pub inline: Vec<String>,
}

/// Finds `<script src>` references and inline script bodies in an HTML
/// document. `page_path` is the document's own entry name, used as the base
/// for resolving relative `src` attributes.
pub fn extract_page_scripts(html: &str, page_path: &str) -> PageScripts {
    let document = Html::parse_document(html);
    let selector = match Selector::parse("script") {
        Ok(selector) => selector,
        Err(_) => return PageScripts::default(),
    };

    let mut scripts = PageScripts::default();
    for element in document.select(&selector) {
        if let Some(src) = element.value().attr("src") {
            let src = src.trim();
            if src.is_empty() {
                continue;
            }
            if let Some(resolved) = resolve_script_src(page_path, src) {
                scripts.external.push(resolved);
            }
        } else {
            let body: String = element.text().collect();
            if !body.trim().is_empty() {
                scripts.inline.push(body);
            }
        }
    }
    scripts
}

/// Strips `?query` and `#fragment` suffixes from a reference.
pub(crate) fn strip_query_and_fragment(reference: &str) -> &str {
    let reference = match reference.split_once('#') {
        Some((head, _)) => head,
        None => reference,
    };
    match reference.split_once('?') {
        Some((head, _)) => head,
        None => reference,
    }
}

/// Resolves a `src` reference against the page's location. Absolute URLs
/// pass through untouched so the skip-filter can reject external scripts by
/// prefix; everything else resolves to an entry name inside the package.
fn resolve_script_src(page_path: &str, src: &str) -> Option<String> {
    let src = strip_query_and_fragment(src);
    if src.is_empty() {
        return None;
    }
    if Url::parse(src).is_ok() {
        return Some(src.to_string());
    }
    let base = Url::parse("file:///").ok()?;
    let resolved = base.join(page_path).ok()?.join(src).ok()?;
    if resolved.host_str().is_some() {
        // Scheme-relative reference (`//host/...`): external, keep as-is.
        return Some(resolved.to_string());
    }
    Some(resolved.path().trim_start_matches('/').to_string())
}

#[cfg(test)]
mod tests {
    use super::{extract_page_scripts, strip_query_and_fragment};

    #[test]
    fn resolves_src_relative_to_page_directory() {
        let html = r#"<html><body><script src="js/bg.js"></script></body></html>"#;
        let scripts = extract_page_scripts(html, "html/background.html");
        assert_eq!(scripts.external, vec!["html/js/bg.js"]);
        assert!(scripts.inline.is_empty());
    }

    #[test]
    fn parent_references_resolve_within_the_package() {
        let html = r#"<script src="../shared/util.js"></script>"#;
        let scripts = extract_page_scripts(html, "pages/popup.html");
        assert_eq!(scripts.external, vec!["shared/util.js"]);
    }

    #[test]
    fn absolute_urls_pass_through() {
        let html = r#"<script src="https://cdn.example.com/lib.js"></script>"#;
        let scripts = extract_page_scripts(html, "bg.html");
        assert_eq!(scripts.external, vec!["https://cdn.example.com/lib.js"]);
    }

    #[test]
    fn query_and_fragment_are_stripped_from_src() {
        let html = r#"<script src="js/bg.js?v=3#main"></script>"#;
        let scripts = extract_page_scripts(html, "bg.html");
        assert_eq!(scripts.external, vec!["js/bg.js"]);
    }

    #[test]
    fn inline_bodies_are_captured_in_order() {
        let html = r#"
            <script>first();</script>
            <script src="a.js"></script>
            <script>   </script>
            <script>second();</script>
        "#;
        let scripts = extract_page_scripts(html, "bg.html");
        assert_eq!(scripts.inline, vec!["first();", "second();"]);
        assert_eq!(scripts.external, vec!["a.js"]);
    }

    #[test]
    fn empty_src_is_neither_external_nor_inline() {
        let html = r#"<script src=""></script>"#;
        let scripts = extract_page_scripts(html, "bg.html");
        assert!(scripts.external.is_empty());
        assert!(scripts.inline.is_empty());
    }

    #[test]
    fn strip_helper_handles_both_suffixes() {
        assert_eq!(strip_query_and_fragment("bg.html?x=1#top"), "bg.html");
        assert_eq!(strip_query_and_fragment("bg.html#top"), "bg.html");
        assert_eq!(strip_query_and_fragment("bg.html"), "bg.html");
    }
}
