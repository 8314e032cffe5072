//! Coupon extraction from a landing-page URL
use url::Url;

pub const COUPON_QUERY_ARG: &str = "coupon";

/// Returns the first non-empty `coupon` query argument of `href`.
///
/// AMP pages write query separators as `&amp;`; those are read as plain `&`.
pub fn coupon_from_url(href: &str) -> Option<String> {
    let href = href.replace("&amp;", "&");
    let url = match Url::parse(&href) {
        Ok(url) => url,
        Err(err) => {
            tracing::debug!(error = %err, "ignoring unparsable url");
            return None;
        }
    };

    url.query_pairs()
        .find(|(key, value)| key == COUPON_QUERY_ARG && !value.is_empty())
        .map(|(_, value)| value.into_owned())
}
