use lazy_static::lazy_static;
use scraper::{Html, Selector};
use url::Url;

lazy_static! {
    static ref HREF_SELECTOR: Selector = Selector::parse("a[href]").unwrap();
}

/// Link discovery capability. Relative hrefs are resolved against `base`
/// (the page that contained them, not the seed). Best-effort on malformed
/// markup: returns whatever anchors can be found, never fails.
pub trait LinkExtractor: Send + Sync {
    fn extract_links(&self, page: &str, base: &Url) -> Vec<Url>;
}

/// Default extractor over html5ever's lenient parsing. Unresolvable hrefs
/// are skipped; scheme filtering is left to the caller.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl LinkExtractor for HtmlLinkExtractor {
    fn extract_links(&self, page: &str, base: &Url) -> Vec<Url> {
        let document = Html::parse_document(page);
        document
            .select(&HREF_SELECTOR)
            .filter_map(|a| a.value().attr("href"))
            .filter_map(|href| base.join(href).ok())
            .collect()
    }
}
