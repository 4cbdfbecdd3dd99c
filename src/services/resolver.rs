use crate::feed::{self, FeedError, FEED_TIMEOUT_MS};

/// Queries the release feed for each candidate core version in priority
/// order and returns the first published tag. `Ok(None)` means no candidate
/// has a release; feed transport or parse failures propagate, there is no
/// recovery path.
pub fn resolve_release_tag(
    feed_base: &str,
    module: &str,
    candidates: &[String],
) -> Result<Option<String>, FeedError> {
    for core_version in candidates {
        let body = feed::fetch_release_feed(feed_base, module, core_version, FEED_TIMEOUT_MS)?;
        if let Some(tag) = feed::parse_first_tag(&body)? {
            return Ok(Some(tag));
        }
    }
    Ok(None)
}
