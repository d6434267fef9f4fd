//! URL helpers

use serde::Serialize;
use thiserror::Error;

use super::SiteConfig;

/// Errors building URLs
#[derive(Debug, Error)]
pub enum UrlError {
    /// The query can't be encoded as a flat `key=value` list
    #[error("couldn't build query string: {0}")]
    QueryString(#[from] serde_urlencoded::ser::Error),
}

/// Something reachable under an absolute path of the site
pub trait AbsoluteUrl {
    /// The path, starting with `/`
    fn absolute_url(&self) -> String;
}

/// Form-urlencode `query`.
///
/// Maps and structs give one pair per entry; a sequence of pairs can repeat
/// a key.
pub fn build_querystring<Q: Serialize + ?Sized>(query: &Q) -> Result<String, UrlError> {
    Ok(serde_urlencoded::to_string(query)?)
}

/// `url` followed by the query string built from `query`
pub fn with_querystring<Q: Serialize + ?Sized>(url: &str, query: &Q) -> Result<String, UrlError> {
    Ok(format!("{url}?{}", build_querystring(query)?))
}

/// Prefix `absolute_url` (which must start with `/`) with the site's protocol and domain
pub fn get_full_url(absolute_url: &str, site: &SiteConfig) -> String {
    format!("{}://{}{}", site.protocol, site.domain, absolute_url)
}

/// Full URL of `obj` on `site`
pub fn build_full_url(obj: &impl AbsoluteUrl, site: &SiteConfig) -> String {
    get_full_url(&obj.absolute_url(), site)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use testresult::TestResult;

    use super::*;

    struct Phone {
        slug: &'static str,
    }

    impl AbsoluteUrl for Phone {
        fn absolute_url(&self) -> String {
            format!("/phones/{}/", self.slug)
        }
    }

    #[test]
    fn test_build_querystring() -> TestResult {
        let query = BTreeMap::from([("next", "/a&b/")]);

        assert_eq!(build_querystring(&query)?, "next=%2Fa%26b%2F");

        Ok(())
    }

    #[test]
    fn test_build_querystring_repeated_keys() -> TestResult {
        let query = [("foo", "bar"), ("foo", ""), ("x", "y z")];

        assert_eq!(build_querystring(&query)?, "foo=bar&foo=&x=y+z");

        Ok(())
    }

    #[test]
    fn test_build_querystring_nested_values_fail() {
        let query = BTreeMap::from([("next", vec!["a", "b"])]);

        assert!(build_querystring(&query).is_err());
    }

    #[test]
    fn test_with_querystring() -> TestResult {
        let url = with_querystring("/plans/select-area/", &[("x", "y"), ("foo", "bar")])?;

        assert_eq!(url, "/plans/select-area/?x=y&foo=bar");

        Ok(())
    }

    #[test]
    fn test_get_full_url() {
        let site = SiteConfig::new("www.example.com");

        assert_eq!(
            get_full_url("/x/abc/?ksdfd", &site),
            "http://www.example.com/x/abc/?ksdfd"
        );
        assert_eq!(
            get_full_url("/", &site.with_protocol("https")),
            "https://www.example.com/"
        );
    }

    #[test]
    fn test_build_full_url() {
        let site = SiteConfig::new("www.example.com");
        let phone = Phone { slug: "alcatel-282" };

        assert_eq!(
            build_full_url(&phone, &site),
            "http://www.example.com/phones/alcatel-282/"
        );
    }
}
