use std::time::Duration;

pub const DEFAULT_RELEASE_HISTORY_BASE: &str = "http://updates.drupal.org/release-history";

/// How long a single feed request may take before the run gives up on it.
pub const FEED_TIMEOUT_MS: u64 = 10_000;

#[derive(thiserror::Error, Debug)]
pub enum FeedError {
    #[error("release feed request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("release feed is not well-formed XML: {0}")]
    Xml(#[from] roxmltree::Error),
}

fn feed_url(base: &str, module: &str, core_version: &str) -> String {
    format!("{}/{}/{}", base.trim_end_matches('/'), module, core_version)
}

/// Fetches the release-history document for one module/core-version pair.
/// Any transport failure or non-2xx status is an error; there is no retry.
pub fn fetch_release_feed(
    base: &str,
    module: &str,
    core_version: &str,
    timeout_ms: u64,
) -> Result<String, FeedError> {
    let client = reqwest::blocking::Client::builder()
        .timeout(Duration::from_millis(timeout_ms))
        .build()?;
    let resp = client
        .get(feed_url(base, module, core_version))
        .send()?
        .error_for_status()?;
    Ok(resp.text()?)
}

/// Text of the first `<tag>` element. The feed lists release tags newest
/// first, so the first one is the most recent release.
pub fn parse_first_tag(xml: &str) -> Result<Option<String>, FeedError> {
    let doc = roxmltree::Document::parse(xml)?;
    Ok(doc
        .descendants()
        .find(|n| n.has_tag_name("tag"))
        .and_then(|n| n.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty()))
}

#[cfg(test)]
mod tests {
    use super::{feed_url, parse_first_tag};

    #[test]
    fn url_is_keyed_by_module_and_core_version() {
        assert_eq!(
            feed_url("http://updates.example.org/release-history/", "views", "7.x"),
            "http://updates.example.org/release-history/views/7.x"
        );
    }

    #[test]
    fn first_tag_wins_when_several_are_listed() {
        let xml = r#"<project>
            <releases>
                <release><tag>DRUPAL-7--3-1</tag></release>
                <release><tag>DRUPAL-7--3-0</tag></release>
            </releases>
        </project>"#;
        assert_eq!(
            parse_first_tag(xml).expect("well-formed feed"),
            Some("DRUPAL-7--3-1".to_string())
        );
    }

    #[test]
    fn missing_tag_element_is_not_an_error() {
        let xml = "<project><releases/></project>";
        assert_eq!(parse_first_tag(xml).expect("well-formed feed"), None);
    }

    #[test]
    fn empty_tag_text_counts_as_no_release() {
        let xml = "<project><tag>  </tag></project>";
        assert_eq!(parse_first_tag(xml).expect("well-formed feed"), None);
    }

    #[test]
    fn malformed_document_is_fatal() {
        assert!(parse_first_tag("<project><tag>oops").is_err());
    }
}
