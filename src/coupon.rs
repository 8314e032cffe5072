//! Marketing coupon memory
//!
//! A coupon arriving in a landing-page URL is remembered for a week so that a
//! later checkout can apply it. Codes are kept as a JSON object of
//! `code -> last seen (epoch millis)` under a single storage key that nothing
//! else touches.
//!
//! Reads and writes prune entries older than [`RETENTION_WINDOW`]. Recall then
//! picks the most recently seen code and only surfaces it if its partner prefix
//! is on [`COUPON_CODE_WHITELIST`]. A code failing the whitelist stays stored
//! until it ages out, so extending the whitelist later makes it recallable.
//!
//! There is no locking across processes: two writers racing on the same backing
//! store resolve last-write-wins and one of them may lose its prune or upsert.
use super::error::StoreError;
use super::query::coupon_from_url;
use super::storage::KeyValueStore;
use super::time::TimeStamp;
use chrono::TimeDelta;
use std::collections::BTreeMap;

pub const MARKETING_COUPONS_KEY: &str = "marketing-coupons";

pub const RETENTION_WINDOW: TimeDelta = TimeDelta::days(7);

/// Partner prefixes whose coupons may be surfaced. Matched exactly and case-sensitively
/// against the text before the first `_` of a code.
pub const COUPON_CODE_WHITELIST: &[&str] = &[
    "ALT",
    "FIVERR",
    "GENEA",
    "KITVISA",
    "LINKEDIN",
    "PATREON",
    "ROCKETLAWYER",
    "SAFE",
    "SBDC",
    "TXAM",
];

type CouponMap = BTreeMap<String, i64>;

/// The partner prefix of `code`: everything before the first `_`.
///
/// A code without `_` has no partner prefix and is never whitelist-eligible.
pub fn partner_prefix(code: &str) -> Option<&str> {
    code.split_once('_').map(|(prefix, _)| prefix)
}

pub fn is_whitelisted(code: &str) -> bool {
    partner_prefix(code).is_some_and(|prefix| COUPON_CODE_WHITELIST.contains(&prefix))
}

pub struct CouponStore<S> {
    storage: S,
}

impl<S: KeyValueStore> CouponStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Record that `code` was seen at `now`, then prune and persist.
    ///
    /// An empty code is a no-op and leaves storage untouched.
    pub fn remember(&self, code: &str, now: TimeStamp) -> Result<(), StoreError> {
        if code.is_empty() {
            return Ok(());
        }

        let mut coupons = self.load()?;
        tracing::debug!(?coupons, "found coupons in storage");

        coupons.insert(code.to_owned(), now.as_millis());
        prune(&mut coupons, now);

        tracing::debug!(?coupons, "storing coupons");
        self.save(&coupons)
    }

    /// Remember the `coupon` query argument of `href`, if there is one.
    pub fn remember_from_url(&self, href: &str, now: TimeStamp) -> Result<(), StoreError> {
        match coupon_from_url(href) {
            Some(code) => self.remember(&code, now),
            None => Ok(()),
        }
    }

    /// The coupon to apply, if any.
    ///
    /// Prunes expired entries (persisting the result), selects the most recently
    /// seen remaining code and returns it only when its partner prefix is
    /// whitelisted. When two codes share the newest timestamp, which one is
    /// selected is unspecified.
    pub fn recall(&self, now: TimeStamp) -> Result<Option<String>, StoreError> {
        let mut coupons = self.load()?;
        if coupons.is_empty() {
            tracing::debug!("no coupons found in storage");
            return Ok(None);
        }
        tracing::debug!(?coupons, "found coupons in storage");

        prune(&mut coupons, now);
        let most_recent = coupons
            .iter()
            .max_by_key(|(_, seen_at)| **seen_at)
            .map(|(code, _)| code.clone());

        tracing::debug!(?coupons, "storing coupons");
        self.save(&coupons)?;

        match most_recent {
            Some(code) if is_whitelisted(&code) => {
                tracing::debug!(%code, "returning coupon code");
                Ok(Some(code))
            }
            Some(code) => {
                tracing::debug!(%code, "most recent coupon is not whitelisted");
                Ok(None)
            }
            None => {
                tracing::debug!("all remembered coupons expired");
                Ok(None)
            }
        }
    }

    fn load(&self) -> Result<CouponMap, StoreError> {
        let Some(raw) = self.storage.get(MARKETING_COUPONS_KEY)? else {
            return Ok(CouponMap::new());
        };

        // `null` parses as no coupons
        match serde_json::from_str::<Option<CouponMap>>(&raw) {
            Ok(coupons) => Ok(coupons.unwrap_or_default()),
            Err(err) => {
                tracing::warn!(error = %err, "discarding corrupt coupon state");
                Ok(CouponMap::new())
            }
        }
    }

    fn save(&self, coupons: &CouponMap) -> Result<(), StoreError> {
        // a map of strings to integers always serialises
        let raw = serde_json::to_string(coupons).unwrap_or_else(|_| String::from("{}"));
        self.storage.set(MARKETING_COUPONS_KEY, &raw)
    }
}

/// Drop every entry last seen more than [`RETENTION_WINDOW`] before `now`.
fn prune(coupons: &mut CouponMap, now: TimeStamp) {
    let now = now.as_millis();
    let window = RETENTION_WINDOW.num_milliseconds();
    coupons.retain(|_, seen_at| now.saturating_sub(*seen_at) <= window);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;

    fn at(millis: i64) -> TimeStamp {
        TimeStamp::from_millis(millis).unwrap()
    }

    fn stored(storage: &MemoryStorage) -> Option<CouponMap> {
        storage
            .get(MARKETING_COUPONS_KEY)
            .unwrap()
            .map(|raw| serde_json::from_str(&raw).unwrap())
    }

    const T0: i64 = 1_700_000_000_000;

    #[test]
    fn prefix_is_text_before_first_underscore() {
        assert_eq!(partner_prefix("SAFE_10_OFF"), Some("SAFE"));
        assert_eq!(partner_prefix("_LEADING"), Some(""));
        assert_eq!(partner_prefix("NOPREFIX"), None);
    }

    #[test]
    fn whitelist_is_exact_and_case_sensitive() {
        assert!(is_whitelisted("LINKEDIN_2024"));
        assert!(!is_whitelisted("linkedin_2024"));
        assert!(!is_whitelisted("LINKED_2024"));
        assert!(!is_whitelisted("SAFE"));
        assert!(!is_whitelisted("_SAFE"));
    }

    #[test]
    fn remember_refreshes_an_existing_code() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store.remember("SAFE_1", at(T0)).unwrap();
        store.remember("SAFE_1", at(T0 + 5_000)).unwrap();

        let coupons = stored(&storage).unwrap();
        assert_eq!(coupons.len(), 1);
        assert_eq!(coupons["SAFE_1"], T0 + 5_000);
    }

    #[test]
    fn remember_prunes_expired_codes() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store.remember("ALT_OLD", at(T0)).unwrap();
        let later = at(T0) + RETENTION_WINDOW + TimeDelta::milliseconds(1);
        store.remember("ALT_NEW", later).unwrap();

        let coupons = stored(&storage).unwrap();
        assert_eq!(coupons.keys().collect::<Vec<_>>(), vec!["ALT_NEW"]);
    }

    #[test]
    fn entry_exactly_one_window_old_is_kept() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store.remember("TXAM_1", at(T0)).unwrap();

        let edge = at(T0) + RETENTION_WINDOW;
        assert_eq!(store.recall(edge).unwrap().as_deref(), Some("TXAM_1"));
    }

    #[test]
    fn recall_on_absent_state_does_not_write() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        assert_eq!(store.recall(at(T0)).unwrap(), None);
        assert_eq!(storage.get(MARKETING_COUPONS_KEY).unwrap(), None);
    }

    #[test]
    fn recall_on_empty_map_does_not_write() {
        let storage = MemoryStorage::new();
        storage.set(MARKETING_COUPONS_KEY, "null").unwrap();
        let store = CouponStore::new(&storage);

        assert_eq!(store.recall(at(T0)).unwrap(), None);
        assert_eq!(
            storage.get(MARKETING_COUPONS_KEY).unwrap().as_deref(),
            Some("null")
        );
    }

    #[test]
    fn recall_persists_pruning_even_when_nothing_is_returned() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store.remember("SAFE_1", at(T0)).unwrap();
        let expired = at(T0) + RETENTION_WINDOW + TimeDelta::milliseconds(1);

        assert_eq!(store.recall(expired).unwrap(), None);
        assert_eq!(stored(&storage).unwrap(), CouponMap::new());
    }

    #[test]
    fn code_without_separator_is_not_returned() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store.remember("SAFE", at(T0)).unwrap();

        assert_eq!(store.recall(at(T0 + 1)).unwrap(), None);
        assert!(stored(&storage).unwrap().contains_key("SAFE"));
    }

    #[test]
    fn non_numeric_timestamps_count_as_corrupt() {
        let storage = MemoryStorage::new();
        storage
            .set(MARKETING_COUPONS_KEY, r#"{"SAFE_1":"yesterday"}"#)
            .unwrap();
        let store = CouponStore::new(&storage);

        assert_eq!(store.recall(at(T0)).unwrap(), None);
    }

    #[test]
    fn remember_from_url_stores_the_query_coupon() {
        let storage = MemoryStorage::new();
        let store = CouponStore::new(&storage);

        store
            .remember_from_url("https://shop.example/?coupon=GENEA_7", at(T0))
            .unwrap();
        store
            .remember_from_url("https://shop.example/?utm_source=mail", at(T0 + 1))
            .unwrap();

        assert_eq!(store.recall(at(T0 + 2)).unwrap().as_deref(), Some("GENEA_7"));
    }
}
