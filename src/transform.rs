//! Origin tagging for items leaving the storefront
use super::action::{CartItem, ExtraValue};

/// Marker identifying this storefront as the origin of a cart item.
pub const STORE_CONTEXT: &str = "calypstore";
pub const CONTEXT_KEY: &str = "context";

/// Returns a copy of `item` whose `extra.context` is the storefront marker. Every
/// other field and every other `extra` key is carried over unchanged.
pub fn tag_origin(item: &CartItem) -> CartItem {
    let mut tagged = item.clone();
    tagged.extra.insert(
        CONTEXT_KEY.to_owned(),
        ExtraValue::Text(STORE_CONTEXT.to_owned()),
    );
    tagged
}
