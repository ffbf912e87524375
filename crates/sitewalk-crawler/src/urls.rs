use url::Url;

/// Canonical identity of a page: scheme + authority + path, query and
/// fragment dropped.
pub fn normalize_url(url: &Url) -> Url {
    let mut url = url.clone();
    url.set_query(None);
    url.set_fragment(None);
    url
}

/// Same netloc check: host and port must match, scheme is ignored.
pub fn same_authority(a: &Url, b: &Url) -> bool {
    a.host_str() == b.host_str() && a.port() == b.port()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_strips_query_and_fragment() {
        let url = Url::parse("http://example.com/a/b?page=2#section").unwrap();
        assert_eq!(normalize_url(&url).as_str(), "http://example.com/a/b");
    }

    #[test]
    fn normalize_is_idempotent() {
        let url = Url::parse("https://example.com/path?q=1#frag").unwrap();
        let once = normalize_url(&url);
        assert_eq!(normalize_url(&once), once);
    }

    #[test]
    fn same_authority_ignores_scheme() {
        let http = Url::parse("http://example.com/a").unwrap();
        let https = Url::parse("https://example.com/b").unwrap();
        assert!(same_authority(&http, &https));
    }

    #[test]
    fn same_authority_compares_hosts_and_ports() {
        let a = Url::parse("http://example.com/").unwrap();
        let b = Url::parse("http://other.com/").unwrap();
        let c = Url::parse("http://example.com:8080/").unwrap();
        assert!(!same_authority(&a, &b));
        assert!(!same_authority(&a, &c));

        // Default ports are normalized away at parse time.
        let d = Url::parse("http://example.com:80/").unwrap();
        assert!(same_authority(&a, &d));
    }
}
