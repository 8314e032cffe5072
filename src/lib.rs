//! Cart action dispatch and marketing coupon memory for the storefront.
//!
//! View code mutates the cart through [`cart::CartActions`], which builds typed
//! [`action::Action`]s and hands them to a [`dispatcher::Dispatcher`]. Independently,
//! [`coupon::CouponStore`] remembers coupon codes seen in landing-page URLs and
//! decides which one, if any, checkout should apply.
pub mod action;
pub mod cart;
pub mod config;
pub mod coupon;
pub mod dispatcher;
pub mod error;
pub mod journal;
pub mod query;
pub mod storage;
pub mod time;
pub mod transform;

pub use action::{Action, ActionType, CartItem, Envelope, Source};
pub use cart::CartActions;
pub use coupon::CouponStore;
pub use dispatcher::{Consumer, Dispatcher};
pub use storage::{KeyValueStore, MemoryStorage, SledStorage};
pub use time::TimeStamp;
