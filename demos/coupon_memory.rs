//! Walks a landing URL through coupon memory and into the cart.
//!
//! ```sh
//! STOREFRONT_LOG=storefront_cart=debug cargo run --example coupon_memory -- \
//!     "https://shop.example/plans?coupon=SAFE_WELCOME"
//! ```
use std::sync::Arc;

use storefront_cart::{
    CartActions, CartItem, CouponStore, Dispatcher, TimeStamp, config::load_config,
    journal::ActionJournal,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_filter.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();
    tracing::info!(env = %config.env, db = %config.db_path.display(), "starting");

    let (db, storage) = config.open_storage()?;
    let coupons = CouponStore::new(storage);
    let journal = Arc::new(ActionJournal::open(&db)?);
    let dispatcher = Arc::new(Dispatcher::builder().register(journal.clone()).build());
    let cart = CartActions::new(dispatcher);

    if let Some(href) = std::env::args().nth(1) {
        coupons.remember_from_url(&href, TimeStamp::now())?;
    }

    cart.add_item(&CartItem::new("personal-bundle"));
    match coupons.recall(TimeStamp::now())? {
        Some(code) => cart.apply_coupon(code),
        None => tracing::info!("no remembered coupon to apply"),
    }

    for entry in journal.entries()? {
        println!(
            "{} {} {}",
            entry.recorded_at.to_datetime_utc().to_rfc3339(),
            entry.action.kind(),
            serde_json::to_string(&entry.action)?
        );
    }

    db.flush()?;
    Ok(())
}
